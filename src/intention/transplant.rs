use crate::ast::{NodeId, NodeKind, SyntaxTree};
use crate::parser::lexer::Token;

/// Statements of a loop body, ready to follow the element binding
///
/// A block yields everything between its braces, comments and line breaks
/// included; any other statement yields its own text. `None` when the block
/// does not start with `{` and end with `}`.
pub fn transplant_body(tree: &SyntaxTree, body: NodeId) -> Option<String> {
    if !tree.is_kind(body, NodeKind::Block) {
        return Some(tree.text(body));
    }
    let children = tree.children(body);
    let (first, last) = (*children.first()?, *children.last()?);
    if children.len() < 2 || !tree.is_token(first, Token::LBrace) || !tree.is_token(last, Token::RBrace) {
        log::warn!("block {} is not delimited by braces, leaving loop as is", body);
        return None;
    }
    let mut text = String::new();
    for &child in &children[1..children.len() - 1] {
        tree.write_text(child, &mut text);
    }
    Some(text)
}

/// Comments inside `stmt` that are not part of any subtree in `copied`
///
/// They sit between header tokens or between `)` and the body. Line
/// comments come back without their line break.
pub fn loose_comments(tree: &SyntaxTree, stmt: NodeId, copied: &[NodeId]) -> Vec<String> {
    tree.descendants(stmt)
        .filter(|&id| tree.token_kind(id).map_or(false, |token| token.is_comment()))
        .filter(|&id| {
            !tree
                .ancestors(id)
                .take_while(|&ancestor| ancestor != stmt)
                .any(|ancestor| copied.contains(&ancestor))
        })
        .filter_map(|id| tree.token_text(id).map(|text| text.trim_end().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statement;

    fn body_of(tree: &SyntaxTree) -> NodeId {
        let stmt = tree.fragment_statement().expect("statement");
        *tree.child_nodes(stmt).collect::<Vec<_>>().last().expect("body")
    }

    #[test]
    fn test_block_loses_only_its_braces() {
        let tree = parse_statement("for (int x : xs) {\n    a(x);\n    // note\n    b();\n}").expect("parse");
        let text = transplant_body(&tree, body_of(&tree)).expect("body");
        assert_eq!(text, "\n    a(x);\n    // note\n    b();\n");
    }

    #[test]
    fn test_single_statement_is_verbatim() {
        let tree = parse_statement("for (int x : xs) use( x );").expect("parse");
        assert_eq!(transplant_body(&tree, body_of(&tree)).as_deref(), Some("use( x );"));
    }

    #[test]
    fn test_comments_outside_copied_parts() {
        let tree = parse_statement("for (int x : xs) /* a */ // b\n{ /* inside */ }").expect("parse");
        let stmt = tree.fragment_statement().expect("statement");
        let body = body_of(&tree);
        assert_eq!(loose_comments(&tree, stmt, &[body]), vec!["/* a */", "// b"]);
        assert_eq!(loose_comments(&tree, stmt, &[]).len(), 3);
    }

    #[test]
    fn test_empty_block() {
        let tree = parse_statement("for (int x : xs) {}").expect("parse");
        assert_eq!(transplant_body(&tree, body_of(&tree)).as_deref(), Some(""));
    }
}
