use crate::ast::{AstNode, ForEachStmt, NodeId, SyntaxTree};
use crate::config::Config;
use crate::parser::lexer::Token;
use crate::resolve::{IterationKind, TypeResolver};

/// Decides whether an intention applies to an element
pub trait ElementPredicate {
    fn satisfied_by(&self, tree: &SyntaxTree, element: NodeId, config: &Config) -> bool;
}

/// Accepts for-each loops over arrays and indexable lists
///
/// The element may be the loop statement itself or its `for` keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedForEachPredicate;

impl IndexedForEachPredicate {
    /// Loop statement addressed by `element`
    pub fn foreach_of(tree: &SyntaxTree, element: NodeId) -> Option<ForEachStmt> {
        if !tree.contains(element) {
            return None;
        }
        if let Some(stmt) = ForEachStmt::cast(tree, element) {
            return Some(stmt);
        }
        if tree.is_token(element, Token::For) {
            return ForEachStmt::cast(tree, tree.parent(element)?);
        }
        None
    }

    /// Loop and iteration kind, with an already built resolver
    pub fn classify(&self, resolver: &TypeResolver<'_>, tree: &SyntaxTree, element: NodeId) -> Option<(ForEachStmt, IterationKind)> {
        let stmt = Self::foreach_of(tree, element)?;
        let value = stmt.iterated_value(tree)?;
        let kind = resolver.iteration_kind(value)?;
        Some((stmt, kind))
    }
}

impl ElementPredicate for IndexedForEachPredicate {
    fn satisfied_by(&self, tree: &SyntaxTree, element: NodeId, config: &Config) -> bool {
        if Self::foreach_of(tree, element).is_none() {
            return false;
        }
        let resolver = TypeResolver::new(tree, config);
        self.classify(&resolver, tree, element).is_some()
    }
}
