use jrewrite::ast::{AstNode, Block, ForEachStmt, NodeId, NodeKind, SyntaxTree, TreeBuilder};
use jrewrite::intention::{Intention, ReplaceForEachWithIndexedFor};
use jrewrite::parser::parse_java;
use jrewrite::{Config, Error, IntentionOutcome, SkipReason};

const SOURCE: &str = r#"class A {
    void m(int[] xs) {
        for (int x : xs) {
            use(x);
        }
    }
}
"#;

#[test]
fn unparsable_replacement_leaves_tree_unchanged() {
    let mut tree = parse_java(SOURCE).expect("Failed to parse");
    let target = tree
        .descendants(tree.root())
        .find(|&id| tree.is_kind(id, NodeKind::ForEachStmt))
        .expect("for-each loop");
    let revision = tree.revision();

    // `int int i = 0` cannot parse as a loop initializer
    let config = Config { index_type: "int int".to_string(), ..Config::default() };
    let result = ReplaceForEachWithIndexedFor::new().invoke(&mut tree, target, &config);

    assert!(matches!(result, Err(Error::RewriteRejected { .. })), "got {:?}", result);
    assert!(result.unwrap_err().is_rewrite_failure());
    assert_eq!(tree.source(), SOURCE);
    assert_eq!(tree.revision(), revision);
    assert!(tree.is_attached(target));
}

#[test]
fn second_rewrite_of_the_same_loop_is_stale() {
    let mut tree = parse_java(SOURCE).expect("Failed to parse");
    let target = tree
        .descendants(tree.root())
        .find(|&id| tree.is_kind(id, NodeKind::ForEachStmt))
        .expect("for-each loop");
    let intention = ReplaceForEachWithIndexedFor::new();
    let config = Config::default();

    let first = intention.invoke(&mut tree, target, &config).expect("first rewrite");
    assert!(first.is_rewritten());
    let after_first = tree.source();

    let second = intention.invoke(&mut tree, target, &config);
    assert!(matches!(second, Err(Error::StaleNode { node }) if node == target));
    assert_eq!(tree.source(), after_first);
}

#[test]
fn replace_with_text_is_atomic() {
    let mut tree = parse_java(SOURCE).expect("Failed to parse");
    let target = tree
        .descendants(tree.root())
        .find(|&id| tree.is_kind(id, NodeKind::ForEachStmt))
        .expect("for-each loop");

    assert!(matches!(tree.replace_with_text(target, "use(x)"), Err(Error::RewriteRejected { .. })));
    assert!(matches!(tree.replace_with_text(target, "a(); b();"), Err(Error::RewriteRejected { .. })));
    let root = tree.root();
    assert!(matches!(tree.replace_with_text(root, "a();"), Err(Error::StaleNode { .. })));
    assert_eq!(tree.source(), SOURCE);

    let node = tree.replace_with_text(target, "use(xs);").expect("replace");
    assert!(tree.is_kind(node, NodeKind::ExprStmt));
    assert!(!tree.is_attached(target));
    assert_eq!(
        tree.source(),
        "class A {\n    void m(int[] xs) {\n        use(xs);\n    }\n}\n"
    );
}

#[test]
fn rewritten_node_is_an_indexed_for_statement() {
    let mut tree = parse_java(SOURCE).expect("Failed to parse");
    let target = tree
        .descendants(tree.root())
        .find(|&id| tree.is_kind(id, NodeKind::ForEachStmt))
        .expect("for-each loop");
    let outcome = ReplaceForEachWithIndexedFor::new()
        .invoke(&mut tree, target, &Config::default())
        .expect("rewrite");
    let IntentionOutcome::Rewritten { node, .. } = outcome else {
        panic!("expected a rewrite");
    };
    assert!(tree.is_kind(node, NodeKind::ForStmt));
    assert!(tree.is_attached(node));
    assert!(!tree
        .descendants(tree.root())
        .any(|id| tree.is_kind(id, NodeKind::ForEachStmt)));
}

fn first_foreach(tree: &SyntaxTree) -> ForEachStmt {
    tree.descendants(tree.root())
        .find_map(|id| ForEachStmt::cast(tree, id))
        .expect("for-each loop")
}

/// Copy the subtree at `id` into `builder`, leaving out everything in `omit`
fn rebuild(tree: &SyntaxTree, id: NodeId, omit: &[NodeId], builder: &mut TreeBuilder) -> Option<NodeId> {
    let Some(kind) = tree.node_kind(id) else {
        builder.token(tree.token_kind(id).expect("token"), tree.token_text(id).expect("token text"));
        return None;
    };
    builder.start_node(kind);
    for &child in tree.children(id) {
        if !omit.contains(&child) {
            rebuild(tree, child, omit, builder);
        }
    }
    builder.finish_node()
}

fn rebuilt_without(tree: &SyntaxTree, omit: &[NodeId]) -> SyntaxTree {
    let mut builder = TreeBuilder::new();
    let root = rebuild(tree, tree.root(), omit, &mut builder).expect("root node");
    builder.finish(root)
}

/// Invoke the rewrite on the first loop and check the tree did not change
fn skipped_without_change(mut tree: SyntaxTree) -> IntentionOutcome {
    let target = first_foreach(&tree).syntax();
    let (text, revision) = (tree.source(), tree.revision());
    let outcome = ReplaceForEachWithIndexedFor::new()
        .invoke(&mut tree, target, &Config::default())
        .expect("rewrite");
    assert_eq!(tree.source(), text);
    assert_eq!(tree.revision(), revision);
    assert!(tree.is_attached(target));
    outcome
}

#[test]
fn block_without_braces_is_left_alone() {
    let tree = parse_java(SOURCE).expect("Failed to parse");
    let body = first_foreach(&tree).body(&tree).expect("body");
    let block = Block::cast(&tree, body).expect("block");
    let braces = [block.l_brace(&tree).expect("{"), block.r_brace(&tree).expect("}")];

    let broken = rebuilt_without(&tree, &braces);
    assert!(!broken.source().contains("{\n            use(x);"));
    assert_eq!(skipped_without_change(broken), IntentionOutcome::Skipped(SkipReason::MalformedBlock));
}

#[test]
fn loop_without_body_is_left_alone() {
    let tree = parse_java(SOURCE).expect("Failed to parse");
    let body = first_foreach(&tree).body(&tree).expect("body");

    let broken = rebuilt_without(&tree, &[body]);
    assert_eq!(skipped_without_change(broken), IntentionOutcome::Skipped(SkipReason::MissingBody));
}

#[test]
fn loop_variable_without_type_is_left_alone() {
    let tree = parse_java(SOURCE).expect("Failed to parse");
    let parameter = first_foreach(&tree).parameter(&tree).expect("parameter");
    let type_ref = parameter.type_ref(&tree).expect("type").syntax();

    let broken = rebuilt_without(&tree, &[type_ref]);
    assert_eq!(
        skipped_without_change(broken),
        IntentionOutcome::Skipped(SkipReason::UnresolvedElementType)
    );
}
