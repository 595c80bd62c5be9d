use super::visitor::{walk, TreeVisitor};
use super::{NodeId, NodeKind, SyntaxTree};
use crate::parser::lexer::Token;

/// Syntax tree printer for debugging and `jrewrite parse`
pub struct TreePrinter {
    indent_level: usize,
    output: String,
    show_ids: bool,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            output: String::new(),
            show_ids: false,
        }
    }

    /// Prefix every line with the arena index of the node
    pub fn with_ids(mut self) -> Self {
        self.show_ids = true;
        self
    }

    pub fn print(&mut self, tree: &SyntaxTree, node: NodeId) -> String {
        self.output.clear();
        self.indent_level = 0;
        walk(tree, node, self);
        std::mem::take(&mut self.output)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
    }

    fn writeln(&mut self, id: NodeId, s: &str) {
        self.write_indent();
        if self.show_ids {
            self.output.push_str(&format!("{} ", id));
        }
        self.output.push_str(s);
        self.output.push('\n');
    }
}

impl Default for TreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeVisitor for TreePrinter {
    fn enter_node(&mut self, _tree: &SyntaxTree, node: NodeId, kind: NodeKind) -> bool {
        self.writeln(node, &format!("{:?}", kind));
        self.indent_level += 2;
        true
    }

    fn leave_node(&mut self, _tree: &SyntaxTree, _node: NodeId, _kind: NodeKind) {
        self.indent_level = self.indent_level.saturating_sub(2);
    }

    fn visit_token(&mut self, tree: &SyntaxTree, node: NodeId, token: Token) {
        let text = tree.token_text(node).unwrap_or_default();
        self.writeln(node, &format!("{:?} {:?}", token, text));
    }
}
