//! Concrete syntax tree for Java sources
//!
//! The tree is a single-writer arena of indexed nodes. Interior nodes carry a
//! [`NodeKind`]; leaves carry a lexer [`Token`] together with its text,
//! including whitespace and comments, so rendering the root reproduces the
//! parsed source byte for byte.
//!
//! Mutation is expressed as "detach the subtree at an index, attach a new
//! subtree in its slot". Detached nodes stay in the arena but are no longer
//! reachable from the root; every mutation bumps the tree revision.

mod builder;
mod nodes;
mod printer;
mod visitor;

pub use builder::{Checkpoint, TreeBuilder};
pub use nodes::*;
pub use printer::TreePrinter;
pub use visitor::{walk, Preorder, TreeVisitor, WalkEvent};

use std::fmt;

use crate::error::{Error, Result};
use crate::parser::lexer::Token;
use crate::parser::span::{LineIndex, Span};

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kinds of interior nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    /// Root of a parsed statement fragment
    Fragment,
    PackageDecl,
    ImportDecl,

    // Declarations
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    RecordDecl,
    AnnotationTypeDecl,
    ClassBody,
    EnumConstant,
    FieldDecl,
    MethodDecl,
    ConstructorDecl,
    Initializer,
    ParameterList,
    Parameter,
    Modifiers,
    Annotation,
    AnnotationArgs,
    TypeParams,
    TypeParam,
    TypeRef,
    TypeArgs,
    Wildcard,
    VarDeclarator,

    // Statements
    Block,
    LocalVarDecl,
    ExprStmt,
    IfStmt,
    WhileStmt,
    DoWhileStmt,
    ForStmt,
    ForInit,
    ForUpdate,
    ForEachStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    ThrowStmt,
    TryStmt,
    ResourceSpec,
    Resource,
    CatchClause,
    FinallyClause,
    SwitchStmt,
    SwitchLabel,
    AssertStmt,
    SynchronizedStmt,
    LabeledStmt,
    EmptyStmt,

    // Expressions
    Literal,
    NameRef,
    ThisExpr,
    SuperExpr,
    ParenExpr,
    FieldAccess,
    MethodCall,
    ArgList,
    ArrayAccess,
    NewExpr,
    NewArrayExpr,
    ArrayInit,
    BinaryExpr,
    UnaryExpr,
    PostfixExpr,
    AssignExpr,
    ConditionalExpr,
    CastExpr,
    InstanceOfExpr,
    LambdaExpr,
    LambdaParams,
    MethodRef,
    ClassLiteral,
}

impl NodeKind {
    /// Node kinds that can stand where a statement is expected
    pub fn is_statement(self) -> bool {
        matches!(self,
            NodeKind::Block | NodeKind::LocalVarDecl | NodeKind::ExprStmt |
            NodeKind::IfStmt | NodeKind::WhileStmt | NodeKind::DoWhileStmt |
            NodeKind::ForStmt | NodeKind::ForEachStmt | NodeKind::ReturnStmt |
            NodeKind::BreakStmt | NodeKind::ContinueStmt | NodeKind::ThrowStmt |
            NodeKind::TryStmt | NodeKind::SwitchStmt | NodeKind::AssertStmt |
            NodeKind::SynchronizedStmt | NodeKind::LabeledStmt | NodeKind::EmptyStmt |
            NodeKind::ClassDecl | NodeKind::InterfaceDecl | NodeKind::EnumDecl |
            NodeKind::RecordDecl
        )
    }

    pub fn is_expression(self) -> bool {
        matches!(self,
            NodeKind::Literal | NodeKind::NameRef | NodeKind::ThisExpr |
            NodeKind::SuperExpr | NodeKind::ParenExpr | NodeKind::FieldAccess |
            NodeKind::MethodCall | NodeKind::ArrayAccess | NodeKind::NewExpr |
            NodeKind::NewArrayExpr | NodeKind::ArrayInit | NodeKind::BinaryExpr |
            NodeKind::UnaryExpr | NodeKind::PostfixExpr | NodeKind::AssignExpr |
            NodeKind::ConditionalExpr | NodeKind::CastExpr | NodeKind::InstanceOfExpr |
            NodeKind::LambdaExpr | NodeKind::MethodRef | NodeKind::ClassLiteral
        )
    }

    pub fn is_type_decl(self) -> bool {
        matches!(self,
            NodeKind::ClassDecl | NodeKind::InterfaceDecl |
            NodeKind::EnumDecl | NodeKind::RecordDecl | NodeKind::AnnotationTypeDecl
        )
    }

    /// Members whose bodies own local variables
    pub fn is_code_owner(self) -> bool {
        matches!(self,
            NodeKind::MethodDecl | NodeKind::ConstructorDecl |
            NodeKind::Initializer | NodeKind::FieldDecl | NodeKind::EnumConstant
        )
    }
}

/// Kind discriminant of any node: interior node or token leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Node(NodeKind),
    Token(Token),
}

impl SyntaxKind {
    pub fn node_kind(self) -> Option<NodeKind> {
        match self {
            SyntaxKind::Node(kind) => Some(kind),
            SyntaxKind::Token(_) => None,
        }
    }

    pub fn token(self) -> Option<Token> {
        match self {
            SyntaxKind::Token(token) => Some(token),
            SyntaxKind::Node(_) => None,
        }
    }

    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Token(token) if token.is_trivia())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Token text; empty for interior nodes
    pub(crate) text: String,
}

/// Arena-backed syntax tree
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    revision: u64,
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<NodeData>, root: NodeId) -> Self {
        Self { nodes, root, revision: 0 }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Incremented by every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `id` names a slot of this arena (attached or not)
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.data(id).kind
    }

    pub fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.kind(id).node_kind()
    }

    pub fn token_kind(&self, id: NodeId) -> Option<Token> {
        self.kind(id).token()
    }

    pub fn is_kind(&self, id: NodeId, kind: NodeKind) -> bool {
        self.node_kind(id) == Some(kind)
    }

    pub fn is_token(&self, id: NodeId, token: Token) -> bool {
        self.token_kind(id) == Some(token)
    }

    pub fn is_trivia(&self, id: NodeId) -> bool {
        self.kind(id).is_trivia()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Children that are interior nodes
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.node_kind(child).is_some())
    }

    /// Children without whitespace and comments
    pub fn significant_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| !self.is_trivia(child))
    }

    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&child| self.is_kind(child, kind))
    }

    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.is_kind(child, kind))
    }

    pub fn child_token(&self, id: NodeId, token: Token) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&child| self.is_token(child, token))
    }

    /// Text of a token leaf
    pub fn token_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            SyntaxKind::Token(_) => Some(&self.data(id).text),
            SyntaxKind::Node(_) => None,
        }
    }

    /// Rendered text of a node: the concatenation of its leaves
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_text(id, &mut out);
        out
    }

    pub fn write_text(&self, id: NodeId, out: &mut String) {
        let data = self.data(id);
        if data.kind.token().is_some() {
            out.push_str(&data.text);
            return;
        }
        for &child in &data.children {
            self.write_text(child, out);
        }
    }

    /// Length in bytes of the rendered node
    pub fn text_len(&self, id: NodeId) -> usize {
        let data = self.data(id);
        match data.kind {
            SyntaxKind::Token(_) => data.text.len(),
            SyntaxKind::Node(_) => data.children.iter().map(|&child| self.text_len(child)).sum(),
        }
    }

    /// Text of the whole tree
    pub fn source(&self) -> String {
        self.text(self.root)
    }

    /// The node itself followed by its parents up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: Some(id) }
    }

    /// Preorder traversal of the subtree rooted at `id`, including `id`
    pub fn descendants(&self, id: NodeId) -> Preorder<'_> {
        Preorder::new(self, id)
    }

    /// First leaf that is not trivia
    pub fn first_token(&self, id: NodeId) -> Option<NodeId> {
        self.descendants(id)
            .find(|&node| matches!(self.kind(node), SyntaxKind::Token(token) if !token.is_trivia()))
    }

    /// Last leaf that is not trivia
    pub fn last_token(&self, id: NodeId) -> Option<NodeId> {
        self.descendants(id)
            .filter(|&node| matches!(self.kind(node), SyntaxKind::Token(token) if !token.is_trivia()))
            .last()
    }

    /// Reachable from the root through parent links
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.ancestors(id).last() == Some(self.root)
    }

    /// Byte offset of the node's first character in the rendered tree
    pub fn offset_of(&self, id: NodeId) -> Option<usize> {
        if !self.is_attached(id) {
            return None;
        }
        let mut offset = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            for &sibling in self.children(parent) {
                if sibling == current {
                    break;
                }
                offset += self.text_len(sibling);
            }
            current = parent;
        }
        Some(offset)
    }

    /// Byte range `start..end` of the rendered node
    pub fn text_range(&self, id: NodeId) -> Option<(usize, usize)> {
        let start = self.offset_of(id)?;
        Some((start, start + self.text_len(id)))
    }

    /// Line/column span of the node
    pub fn span(&self, id: NodeId) -> Option<Span> {
        let (start, end) = self.text_range(id)?;
        let index = LineIndex::new(&self.source());
        Some(index.span(start, end))
    }

    /// Leaf covering the byte offset; an offset on a boundary belongs to the following leaf
    pub fn token_at_offset(&self, offset: usize) -> Option<NodeId> {
        let mut current = self.root;
        let mut start = 0;
        loop {
            if self.kind(current).token().is_some() {
                return Some(current);
            }
            let mut next = None;
            for &child in self.children(current) {
                let len = self.text_len(child);
                if offset < start + len {
                    next = Some(child);
                    break;
                }
                start += len;
            }
            current = next?;
        }
    }

    /// Leading whitespace of the line the node starts on
    pub fn line_indent(&self, id: NodeId) -> String {
        let Some(offset) = self.offset_of(id) else {
            return String::new();
        };
        let source = self.source();
        let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
        source[line_start..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    /// Parse `text` as one statement and substitute it for `target`
    ///
    /// The substitution is atomic: if the text does not parse, or `target`
    /// is no longer attached, the tree is left exactly as it was.
    pub fn replace_with_text(&mut self, target: NodeId, text: &str) -> Result<NodeId> {
        self.check_replaceable(target)?;
        let fragment = crate::parser::parse_statement(text).map_err(|e| {
            Error::rewrite_rejected(format!("replacement text does not parse: {}", e))
        })?;
        let statement = fragment
            .fragment_statement()
            .ok_or_else(|| Error::rewrite_rejected("replacement text is not a single statement"))?;
        self.replace_with_subtree(target, &fragment, statement)
    }

    /// Copy the subtree `source_node` of `source` into this arena in place of `target`
    ///
    /// `target` is detached but keeps its arena slot, so ids held elsewhere
    /// still report [`Error::StaleNode`]. Call [`compact`](Self::compact) to
    /// reclaim the slots once no such ids are needed.
    pub fn replace_with_subtree(
        &mut self,
        target: NodeId,
        source: &SyntaxTree,
        source_node: NodeId,
    ) -> Result<NodeId> {
        self.check_replaceable(target)?;
        let parent = self.parent(target).ok_or(Error::StaleNode { node: target })?;
        let slot = self
            .children(parent)
            .iter()
            .position(|&child| child == target)
            .ok_or(Error::StaleNode { node: target })?;

        let new_node = self.graft(source, source_node, parent);
        self.nodes[parent.index()].children[slot] = new_node;
        self.nodes[target.index()].parent = None;
        self.revision += 1;
        log::debug!(
            "replaced {} with {} under {} (revision {})",
            target, new_node, parent, self.revision
        );
        Ok(new_node)
    }

    /// Slots in the arena, detached subtrees included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drop detached subtrees from the arena
    ///
    /// Ids are renumbered in preorder, so the revision moves on and every id
    /// taken before the call must be looked up again.
    pub fn compact(&mut self) {
        let live: Vec<NodeId> = self.descendants(self.root).collect();
        if live.len() == self.nodes.len() {
            return;
        }
        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (index, &old) in live.iter().enumerate() {
            remap[old.index()] = Some(NodeId::new(index));
        }
        let nodes = live
            .iter()
            .map(|&old| {
                let data = &self.nodes[old.index()];
                NodeData {
                    kind: data.kind,
                    parent: data.parent.and_then(|parent| remap[parent.index()]),
                    children: data.children.iter().filter_map(|child| remap[child.index()]).collect(),
                    text: data.text.clone(),
                }
            })
            .collect();
        log::debug!("compacted arena from {} to {} nodes", self.nodes.len(), live.len());
        self.nodes = nodes;
        self.root = NodeId::new(0);
        self.revision += 1;
    }

    /// Root statement of a tree produced by [`crate::parser::parse_statement`]
    pub fn fragment_statement(&self) -> Option<NodeId> {
        if !self.is_kind(self.root, NodeKind::Fragment) {
            return None;
        }
        let mut statements = self.child_nodes(self.root);
        let statement = statements.next()?;
        if statements.next().is_some() {
            return None;
        }
        Some(statement)
    }

    fn check_replaceable(&self, target: NodeId) -> Result<()> {
        if target == self.root || !self.is_attached(target) {
            return Err(Error::StaleNode { node: target });
        }
        match self.node_kind(target) {
            Some(kind) if kind.is_statement() => Ok(()),
            _ => Err(Error::rewrite_rejected(format!(
                "{} is not a statement and cannot be replaced by one",
                target
            ))),
        }
    }

    fn graft(&mut self, source: &SyntaxTree, source_node: NodeId, parent: NodeId) -> NodeId {
        let data = source.data(source_node);
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind: data.kind,
            parent: Some(parent),
            children: Vec::with_capacity(data.children.len()),
            text: data.text.clone(),
        });
        for &child in &data.children {
            let copied = self.graft(source, child, id);
            self.nodes[id.index()].children.push(copied);
        }
        id
    }
}

/// Iterator over a node and its ancestors
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
