//! Structural rewrites offered on a single syntax element
//!
//! An [`Intention`] pairs an [`ElementPredicate`], which decides whether the
//! rewrite applies to an element, with the rewrite itself. Rewrites that
//! cannot proceed on well-formed but unexpected input report a
//! [`SkipReason`] and leave the tree alone; failures of the tree mutation
//! itself surface as errors.

mod foreach_indexed;
mod naming;
mod predicate;
mod synthesize;
mod transplant;

pub use foreach_indexed::ReplaceForEachWithIndexedFor;
pub use naming::{names_in_scope, suggest_unique_name};
pub use predicate::{ElementPredicate, IndexedForEachPredicate};
pub use synthesize::{element_binding, loop_header, synthesize_loop, IndexedLoop};
pub use transplant::{loose_comments, transplant_body};

use std::fmt;

use crate::ast::{NodeId, SyntaxTree};
use crate::config::Config;
use crate::error::{Error, Result};

/// Result of invoking an intention
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentionOutcome {
    /// The element was replaced by `node`
    Rewritten { node: NodeId, index_name: String },
    /// Nothing was changed
    Skipped(SkipReason),
}

impl IntentionOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, IntentionOutcome::Rewritten { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The element is not something this intention rewrites
    NotApplicable,
    MissingIteratedValue,
    MissingBody,
    /// The loop variable has no usable declared type
    UnresolvedElementType,
    /// A block body that is not delimited by its braces
    MalformedBlock,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NotApplicable => "not applicable",
            SkipReason::MissingIteratedValue => "loop has no iterated value",
            SkipReason::MissingBody => "loop has no body",
            SkipReason::UnresolvedElementType => "loop variable type is unknown",
            SkipReason::MalformedBlock => "loop body block is malformed",
        };
        f.write_str(text)
    }
}

/// A rewrite offered on one syntax element
pub trait Intention {
    /// Human readable name of the rewrite
    fn name(&self) -> &'static str;

    fn predicate(&self) -> &dyn ElementPredicate;

    /// Perform the rewrite; called only for attached elements
    fn process(&self, tree: &mut SyntaxTree, element: NodeId, config: &Config) -> Result<IntentionOutcome>;

    fn is_available(&self, tree: &SyntaxTree, element: NodeId, config: &Config) -> bool {
        tree.is_attached(element) && self.predicate().satisfied_by(tree, element, config)
    }

    /// Rewrite `element` if the predicate holds
    ///
    /// An element that is no longer part of the tree yields
    /// [`Error::StaleNode`]; an element the predicate rejects is skipped.
    fn invoke(&self, tree: &mut SyntaxTree, element: NodeId, config: &Config) -> Result<IntentionOutcome> {
        if !tree.is_attached(element) {
            return Err(Error::StaleNode { node: element });
        }
        if !self.predicate().satisfied_by(tree, element, config) {
            log::debug!("{}: {} does not qualify", self.name(), element);
            return Ok(IntentionOutcome::Skipped(SkipReason::NotApplicable));
        }
        self.process(tree, element, config)
    }
}
