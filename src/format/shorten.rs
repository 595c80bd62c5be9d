use std::collections::{HashMap, HashSet};

use crate::ast::{AstNode, CompilationUnit, NodeKind, SyntaxTree, TypeDecl};
use crate::consts::IMPLICIT_IMPORT_PACKAGE;
use crate::parser::lexer::Token;
use crate::parser::parse_statement;

/// Names that can be written unqualified inside one compilation unit
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    package: Option<String>,
    /// Simple name to fully-qualified name of single-type imports
    single: HashMap<String, String>,
    /// Packages imported on demand
    on_demand: Vec<String>,
    /// Types declared in the unit itself
    local_types: HashSet<String>,
}

impl ImportContext {
    pub fn from_tree(tree: &SyntaxTree) -> Self {
        let mut context = Self::default();
        let Some(unit) = CompilationUnit::cast(tree, tree.root()) else {
            return context;
        };
        context.package = unit.package_name(tree);
        for import in unit.imports(tree) {
            if import.is_static(tree) {
                continue;
            }
            let path = import.path(tree);
            if import.is_wildcard(tree) {
                context.on_demand.push(path);
            } else if let Some(simple) = path.rsplit('.').next() {
                context.single.insert(simple.to_string(), path.clone());
            }
        }
        for node in tree.descendants(tree.root()) {
            if let Some(name) = TypeDecl::cast(tree, node).and_then(|decl| decl.name(tree)) {
                context.local_types.insert(name);
            }
        }
        context
    }

    /// Fully-qualified name a single-type import binds to `simple`
    pub fn single_import(&self, simple: &str) -> Option<&str> {
        self.single.get(simple).map(String::as_str)
    }

    /// Whether `qualified` may be written as its last segment
    pub fn can_shorten(&self, qualified: &str) -> bool {
        let Some((package, simple)) = qualified.rsplit_once('.') else {
            return false;
        };
        if let Some(imported) = self.single.get(simple) {
            return imported == qualified;
        }
        let same_package = self.package.as_deref() == Some(package);
        if same_package {
            return true;
        }
        if self.local_types.contains(simple) {
            return false;
        }
        package == IMPLICIT_IMPORT_PACKAGE || self.on_demand.iter().any(|p| p == package)
    }
}

/// Drop package qualifiers from type references in `text` where the unit's imports allow it
///
/// Only the leading package segments are removed, so `java.util.Map.Entry`
/// becomes `Map.Entry` when `java.util.Map` is visible. Text that does not
/// parse as a statement is returned unchanged.
pub fn shorten_references(text: &str, context: &ImportContext) -> String {
    let Ok(fragment) = parse_statement(text) else {
        return text.to_string();
    };

    let mut cuts: Vec<(usize, usize)> = Vec::new();
    for node in fragment.descendants(fragment.root()) {
        if !fragment.is_kind(node, NodeKind::TypeRef) {
            continue;
        }
        let idents: Vec<_> = fragment
            .children(node)
            .iter()
            .copied()
            .filter(|&child| fragment.is_token(child, Token::Identifier))
            .collect();
        let segments: Vec<&str> = idents
            .iter()
            .filter_map(|&id| fragment.token_text(id))
            .collect();
        let Some(class_index) = segments
            .iter()
            .position(|segment| segment.starts_with(|c: char| c.is_uppercase()))
        else {
            continue;
        };
        if class_index == 0 {
            continue;
        }
        let qualified = segments[..=class_index].join(".");
        if !context.can_shorten(&qualified) {
            continue;
        }
        let (Some(start), Some(end)) = (
            fragment.offset_of(idents[0]),
            fragment.offset_of(idents[class_index]),
        ) else {
            continue;
        };
        log::debug!("shortening {} to {}", qualified, segments[class_index]);
        cuts.push((start, end));
    }

    let mut result = fragment.source();
    cuts.sort_unstable();
    for (start, end) in cuts.into_iter().rev() {
        result.replace_range(start..end, "");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_java;

    fn context(source: &str) -> ImportContext {
        ImportContext::from_tree(&parse_java(source).expect("parse"))
    }

    #[test]
    fn test_imported_and_implicit_types_are_shortened() {
        let ctx = context("package app;\nimport java.util.List;\nimport java.util.concurrent.*;\nclass A {}");
        let text = "java.util.List<java.lang.String> xs = new java.util.concurrent.CopyOnWriteArrayList<>();";
        assert_eq!(
            shorten_references(text, &ctx),
            "List<String> xs = new CopyOnWriteArrayList<>();"
        );
    }

    #[test]
    fn test_conflicting_import_keeps_qualifier() {
        let ctx = context("import java.awt.List;\nclass A {}");
        let text = "java.util.List<String> xs = null;";
        assert_eq!(shorten_references(text, &ctx), text);
    }

    #[test]
    fn test_nested_type_keeps_outer_class() {
        let ctx = context("import java.util.Map;\nclass A {}");
        let text = "java.util.Map.Entry<String, Integer> e = null;";
        assert_eq!(shorten_references(text, &ctx), "Map.Entry<String, Integer> e = null;");
    }

    #[test]
    fn test_same_package_and_local_shadowing() {
        let ctx = context("package app.model;\nclass String {}");
        assert!(ctx.can_shorten("app.model.Item"));
        assert!(!ctx.can_shorten("java.lang.String"));
    }
}
