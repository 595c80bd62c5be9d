use crate::ast::{NodeId, NodeKind, SyntaxTree};
use crate::consts::{ARRAY_LENGTH_FIELD, LIST_ELEMENT_ACCESSOR, LIST_SIZE_ACCESSOR};
use crate::resolve::IterationKind;

/// Pieces of the indexed loop that replaces a for-each loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedLoop {
    pub kind: IterationKind,
    pub index_type: String,
    pub index_name: String,
    /// Iterated expression, already parenthesized where member access needs it
    pub container: String,
    /// `final` and annotations of the loop variable
    pub modifiers: Option<String>,
    pub element_type: String,
    pub element_name: String,
    /// C-style dimensions written after the variable name
    pub element_dims: usize,
}

impl IndexedLoop {
    fn bound(&self) -> String {
        match self.kind {
            IterationKind::Array => format!("{}.{}", self.container, ARRAY_LENGTH_FIELD),
            IterationKind::List => format!("{}.{}()", self.container, LIST_SIZE_ACCESSOR),
        }
    }

    fn element_access(&self) -> String {
        match self.kind {
            IterationKind::Array => format!("{}[{}]", self.container, self.index_name),
            IterationKind::List => format!("{}.{}({})", self.container, LIST_ELEMENT_ACCESSOR, self.index_name),
        }
    }
}

/// `for (int i = 0; i < c.length; i++)`
pub fn loop_header(shape: &IndexedLoop) -> String {
    let i = &shape.index_name;
    format!(
        "for ({} {} = 0; {} < {}; {}++)",
        shape.index_type,
        i,
        i,
        shape.bound(),
        i
    )
}

/// `T x = c[i];` or `T x = c.get(i);`
pub fn element_binding(shape: &IndexedLoop) -> String {
    let mut binding = String::new();
    if let Some(modifiers) = shape.modifiers.as_deref().filter(|m| !m.is_empty()) {
        binding.push_str(modifiers);
        binding.push(' ');
    }
    binding.push_str(&shape.element_type);
    binding.push(' ');
    binding.push_str(&shape.element_name);
    for _ in 0..shape.element_dims {
        binding.push_str("[]");
    }
    binding.push_str(" = ");
    binding.push_str(&shape.element_access());
    binding.push(';');
    binding
}

/// Full replacement statement with `body` as the statements after the binding
pub fn synthesize_loop(shape: &IndexedLoop, body: &str) -> String {
    let mut text = loop_header(shape);
    text.push_str(" {\n");
    text.push_str(&element_binding(shape));
    text.push('\n');
    let body = body.trim();
    if !body.is_empty() {
        text.push_str(body);
        text.push('\n');
    }
    text.push('}');
    text
}

/// Text of the iterated expression, usable as the receiver of `.length` or `[i]`
pub(crate) fn container_text(tree: &SyntaxTree, expr: NodeId) -> String {
    let text = tree.text(expr).trim().to_string();
    let primary = matches!(
        tree.node_kind(expr),
        Some(
            NodeKind::NameRef
                | NodeKind::FieldAccess
                | NodeKind::MethodCall
                | NodeKind::ArrayAccess
                | NodeKind::ParenExpr
                | NodeKind::ThisExpr
                | NodeKind::NewExpr
        )
    );
    if primary {
        text
    } else {
        format!("({})", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: IterationKind) -> IndexedLoop {
        IndexedLoop {
            kind,
            index_type: "int".to_string(),
            index_name: "i".to_string(),
            container: "items".to_string(),
            modifiers: None,
            element_type: "String".to_string(),
            element_name: "s".to_string(),
            element_dims: 0,
        }
    }

    #[test]
    fn test_array_pieces() {
        let shape = shape(IterationKind::Array);
        assert_eq!(loop_header(&shape), "for (int i = 0; i < items.length; i++)");
        assert_eq!(element_binding(&shape), "String s = items[i];");
    }

    #[test]
    fn test_list_pieces() {
        let shape = shape(IterationKind::List);
        assert_eq!(loop_header(&shape), "for (int i = 0; i < items.size(); i++)");
        assert_eq!(element_binding(&shape), "String s = items.get(i);");
    }

    #[test]
    fn test_modifiers_and_dims_carry_over() {
        let shape = IndexedLoop {
            modifiers: Some("final".to_string()),
            element_type: "int".to_string(),
            element_name: "row".to_string(),
            element_dims: 1,
            ..shape(IterationKind::Array)
        };
        assert_eq!(element_binding(&shape), "final int row[] = items[i];");
    }

    #[test]
    fn test_empty_body_has_only_binding() {
        let text = synthesize_loop(&shape(IterationKind::Array), "  \n ");
        assert_eq!(text, "for (int i = 0; i < items.length; i++) {\nString s = items[i];\n}");
    }

    #[test]
    fn test_conditional_receiver_is_parenthesized() {
        let tree = crate::parser::parse_statement("f(flag ? xs : ys);").expect("parse");
        let conditional = tree
            .descendants(tree.root())
            .find(|&id| tree.is_kind(id, NodeKind::ConditionalExpr))
            .expect("conditional");
        assert_eq!(container_text(&tree, conditional), "(flag ? xs : ys)");
    }
}
