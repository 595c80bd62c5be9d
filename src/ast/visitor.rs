use super::{NodeId, NodeKind, SyntaxKind, SyntaxTree};
use crate::parser::lexer::Token;

/// Preorder iterator over a subtree, tokens included
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Preorder<'a> {
    pub fn new(tree: &'a SyntaxTree, start: NodeId) -> Self {
        Self { tree, stack: vec![start] }
    }

    /// Do not descend into the children of the node returned last
    pub fn skip_subtree(&mut self, node: NodeId) {
        let count = self.tree.children(node).len();
        let keep = self.stack.len().saturating_sub(count);
        self.stack.truncate(keep);
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack.extend(self.tree.children(node).iter().rev().copied());
        Some(node)
    }
}

/// Event emitted by [`walk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent {
    Enter(NodeId),
    Leave(NodeId),
}

/// Visitor over interior nodes and significant tokens
///
/// Returning `false` from [`enter_node`](Self::enter_node) skips the
/// node's children; [`leave_node`](Self::leave_node) is still called.
pub trait TreeVisitor {
    fn enter_node(&mut self, _tree: &SyntaxTree, _node: NodeId, _kind: NodeKind) -> bool {
        true
    }

    fn leave_node(&mut self, _tree: &SyntaxTree, _node: NodeId, _kind: NodeKind) {}

    fn visit_token(&mut self, _tree: &SyntaxTree, _node: NodeId, _token: Token) {}
}

/// Drive `visitor` over the subtree at `start`; trivia is not reported
pub fn walk<V: TreeVisitor + ?Sized>(tree: &SyntaxTree, start: NodeId, visitor: &mut V) {
    let mut events = vec![WalkEvent::Enter(start)];
    while let Some(event) = events.pop() {
        match event {
            WalkEvent::Enter(node) => match tree.kind(node) {
                SyntaxKind::Token(token) => {
                    if !token.is_trivia() {
                        visitor.visit_token(tree, node, token);
                    }
                }
                SyntaxKind::Node(kind) => {
                    events.push(WalkEvent::Leave(node));
                    if visitor.enter_node(tree, node, kind) {
                        events.extend(tree.children(node).iter().rev().map(|&c| WalkEvent::Enter(c)));
                    }
                }
            },
            WalkEvent::Leave(node) => {
                if let Some(kind) = tree.node_kind(node) {
                    visitor.leave_node(tree, node, kind);
                }
            }
        }
    }
}
