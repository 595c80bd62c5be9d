use std::collections::HashSet;

use crate::ast::{NodeId, NodeKind, SyntaxTree};
use crate::config::Config;
use crate::consts::{JAVA_RESERVED_WORDS, NAMING_MAX_CANDIDATES};
use crate::error::{Error, Result};
use crate::parser::lexer::Token;
use crate::resolve::{declared_names, enclosing_type_decls, field_bindings};

/// Names a new local variable at `context` must not take
///
/// That is every variable declared in the enclosing methods, constructors,
/// initializers or field initializers, the fields of every enclosing type,
/// and every identifier written inside `context` itself.
pub fn names_in_scope(tree: &SyntaxTree, context: NodeId) -> HashSet<String> {
    let mut taken = HashSet::new();

    let owners: Vec<NodeId> = tree
        .ancestors(context)
        .filter(|&ancestor| tree.node_kind(ancestor).map_or(false, NodeKind::is_code_owner))
        .collect();
    if owners.is_empty() {
        taken.extend(declared_names(tree, tree.root()));
    }
    for owner in owners {
        taken.extend(declared_names(tree, owner));
    }

    for decl in enclosing_type_decls(tree, context) {
        taken.extend(field_bindings(tree, decl).into_iter().map(|binding| binding.name));
    }

    taken.extend(
        tree.descendants(context)
            .filter(|&node| tree.is_token(node, Token::Identifier))
            .filter_map(|node| tree.token_text(node))
            .map(str::to_string),
    );
    taken
}

/// First free name of the form `<prefix><base><n><suffix>`, trying no number, then 1, 2, ...
pub fn suggest_unique_name(tree: &SyntaxTree, base: &str, context: NodeId, config: &Config) -> Result<String> {
    let taken = names_in_scope(tree, context);
    for n in 0..NAMING_MAX_CANDIDATES {
        let number = if n == 0 { String::new() } else { n.to_string() };
        let candidate = format!("{}{}{}{}", config.local_prefix, base, number, config.local_suffix);
        if !taken.contains(&candidate) && !JAVA_RESERVED_WORDS.contains(&candidate.as_str()) {
            log::debug!("picked index name '{}' after {} candidates", candidate, n + 1);
            return Ok(candidate);
        }
    }
    Err(Error::rewrite_rejected(format!(
        "no free variable name derived from '{}'",
        base
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_java;

    fn foreach(tree: &SyntaxTree) -> NodeId {
        tree.descendants(tree.root())
            .find(|&id| tree.is_kind(id, NodeKind::ForEachStmt))
            .expect("for-each loop")
    }

    #[test]
    fn test_free_base_name_is_kept() {
        let tree = parse_java("class A { void m(int[] xs) { for (int x : xs) {} } }").expect("parse");
        let name = suggest_unique_name(&tree, "i", foreach(&tree), &Config::default()).expect("name");
        assert_eq!(name, "i");
    }

    #[test]
    fn test_collisions_bump_the_number() {
        let source = "class A { int i1; void m(int[] xs) { int i = 0; for (int x : xs) { use(i2); } } }";
        let tree = parse_java(source).expect("parse");
        let name = suggest_unique_name(&tree, "i", foreach(&tree), &Config::default()).expect("name");
        assert_eq!(name, "i3");
    }

    #[test]
    fn test_affixes_from_config() {
        let tree = parse_java("class A { void m(int[] xs) { for (int x : xs) {} } }").expect("parse");
        let config = Config { local_prefix: "l".to_string(), ..Config::default() };
        let name = suggest_unique_name(&tree, "Idx", foreach(&tree), &config).expect("name");
        assert_eq!(name, "lIdx");
    }

    #[test]
    fn test_reserved_words_are_skipped() {
        let tree = parse_java("class A { void m(int[] xs) { for (int x : xs) {} } }").expect("parse");
        let name = suggest_unique_name(&tree, "do", foreach(&tree), &Config::default()).expect("name");
        assert_eq!(name, "do1");
    }
}
