use super::{NodeData, NodeId, NodeKind, SyntaxKind, SyntaxTree};
use crate::parser::lexer::Token;

/// Position inside the currently open node, used to wrap already-built
/// children into a node discovered later (binary operators, postfix forms)
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    depth: usize,
    position: usize,
}

/// Bottom-up builder for [`SyntaxTree`]
///
/// Nodes are opened with [`start_node`](Self::start_node), filled with tokens
/// and child nodes, and closed with [`finish_node`](Self::finish_node).
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    stack: Vec<(NodeKind, Vec<NodeId>)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&mut self, kind: NodeKind) {
        self.stack.push((kind, Vec::new()));
    }

    pub fn token(&mut self, token: Token, text: &str) {
        let id = self.alloc(SyntaxKind::Token(token), Vec::new(), text.to_string());
        if let Some((_, children)) = self.stack.last_mut() {
            children.push(id);
        }
    }

    /// Close the innermost open node and attach it to its parent
    pub fn finish_node(&mut self) -> Option<NodeId> {
        let (kind, children) = self.stack.pop()?;
        let id = self.alloc(SyntaxKind::Node(kind), children, String::new());
        let child_ids = self.nodes[id.index()].children.clone();
        for child in child_ids {
            self.nodes[child.index()].parent = Some(id);
        }
        if let Some((_, siblings)) = self.stack.last_mut() {
            siblings.push(id);
        }
        Some(id)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            depth: self.stack.len(),
            position: self.stack.last().map_or(0, |(_, children)| children.len()),
        }
    }

    /// Open a node that adopts every child added since `checkpoint`
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        debug_assert_eq!(checkpoint.depth, self.stack.len(), "checkpoint from another node");
        let adopted = match self.stack.last_mut() {
            Some((_, children)) if checkpoint.position <= children.len() => {
                children.split_off(checkpoint.position)
            }
            _ => Vec::new(),
        };
        self.stack.push((kind, adopted));
    }

    /// Number of nodes currently open
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Freeze the builder into a tree rooted at `root`
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        debug_assert!(self.stack.is_empty(), "unfinished nodes left on the builder stack");
        SyntaxTree::from_parts(self.nodes, root)
    }

    fn alloc(&mut self, kind: SyntaxKind, children: Vec<NodeId>, text: String) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData { kind, parent: None, children, text });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_wraps_previous_children() {
        let mut builder = TreeBuilder::new();
        builder.start_node(NodeKind::ExprStmt);
        let checkpoint = builder.checkpoint();
        builder.start_node(NodeKind::NameRef);
        builder.token(Token::Identifier, "a");
        builder.finish_node();
        builder.start_node_at(checkpoint, NodeKind::PostfixExpr);
        builder.token(Token::Inc, "++");
        builder.finish_node();
        builder.token(Token::Semicolon, ";");
        let root = builder.finish_node().expect("root");
        let tree = builder.finish(root);

        assert_eq!(tree.text(root), "a++;");
        let postfix = tree.children(root)[0];
        assert!(tree.is_kind(postfix, NodeKind::PostfixExpr));
        assert!(tree.is_kind(tree.children(postfix)[0], NodeKind::NameRef));
        assert_eq!(tree.parent(postfix), Some(root));
    }
}
