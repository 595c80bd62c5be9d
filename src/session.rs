//! Editing session over one Java source file
//!
//! A [`Document`] owns the syntax tree of a file and serializes every
//! rewrite through `&mut self`. Loops are addressed by [`Anchor`]s that
//! remember the tree revision they were looked up in, so an anchor taken
//! before a rewrite is refused afterwards instead of touching the wrong node.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::ast::{AstNode, ForEachStmt, NodeId, NodeKind, SyntaxTree};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::intention::{Intention, IntentionOutcome, IndexedForEachPredicate, ReplaceForEachWithIndexedFor, SkipReason};
use crate::parser::span::{LineIndex, Location};
use crate::parser::parse_java;
use crate::resolve::{IterationKind, TypeResolver};

/// A node as seen at one revision of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub node: NodeId,
    pub revision: u64,
}

/// A for-each loop the rewrite can be applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleLoop {
    pub anchor: Anchor,
    pub kind: IterationKind,
    /// Position of the `for` keyword
    pub location: Location,
}

pub struct Document {
    path: Option<PathBuf>,
    tree: SyntaxTree,
    config: Config,
    intention: ReplaceForEachWithIndexedFor,
}

impl Document {
    pub fn parse(source: &str, config: Config) -> Result<Self> {
        config.validate()?;
        let tree = parse_java(source)?;
        Ok(Self {
            path: None,
            tree,
            config,
            intention: ReplaceForEachWithIndexedFor::new(),
        })
    }

    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let mut document = Self::parse(&source, config)?;
        document.path = Some(path.to_path_buf());
        log::debug!("opened {}", path.display());
        Ok(document)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current source text
    pub fn text(&self) -> String {
        self.tree.source()
    }

    pub fn revision(&self) -> u64 {
        self.tree.revision()
    }

    fn anchor(&self, node: NodeId) -> Anchor {
        Anchor {
            node,
            revision: self.tree.revision(),
        }
    }

    /// Every for-each loop in the file that can be rewritten, in source order
    pub fn eligible_loops(&self) -> Vec<EligibleLoop> {
        let resolver = TypeResolver::new(&self.tree, &self.config);
        let predicate = IndexedForEachPredicate;
        let lines = LineIndex::new(&self.tree.source());
        self.tree
            .descendants(self.tree.root())
            .filter(|&node| self.tree.is_kind(node, NodeKind::ForEachStmt))
            .filter_map(|node| {
                let (_, kind) = predicate.classify(&resolver, &self.tree, node)?;
                let location = lines.location(self.tree.offset_of(node)?);
                Some(EligibleLoop {
                    anchor: self.anchor(node),
                    kind,
                    location,
                })
            })
            .collect()
    }

    /// Rewrite the loop an anchor points at
    ///
    /// Fails with [`Error::StaleNode`] when the tree has changed since the
    /// anchor was taken.
    pub fn apply(&mut self, anchor: Anchor) -> Result<IntentionOutcome> {
        if anchor.revision != self.tree.revision() {
            return Err(Error::StaleNode { node: anchor.node });
        }
        self.intention.invoke(&mut self.tree, anchor.node, &self.config)
    }

    /// Rewrite the innermost for-each loop whose header contains a 1-indexed position
    pub fn rewrite_at(&mut self, line: usize, column: usize) -> Result<IntentionOutcome> {
        let source = self.tree.source();
        let Some(offset) = LineIndex::new(&source).offset(line, column) else {
            return Ok(IntentionOutcome::Skipped(SkipReason::NotApplicable));
        };
        let target = self
            .tree
            .descendants(self.tree.root())
            .filter_map(|node| ForEachStmt::cast(&self.tree, node))
            .filter_map(|stmt| Some((stmt, stmt.header_range(&self.tree)?)))
            .filter(|&(_, (start, end))| start <= offset && offset < end)
            .max_by_key(|&(_, (start, _))| start)
            .map(|(stmt, _)| stmt.syntax());
        match target {
            Some(node) => self.intention.invoke(&mut self.tree, node, &self.config),
            None => {
                log::debug!("no for-each loop header at {}:{}", line, column);
                Ok(IntentionOutcome::Skipped(SkipReason::NotApplicable))
            }
        }
    }

    /// Rewrite every eligible loop, outer loops first
    ///
    /// Loops nested in a rewritten body are picked up again after the
    /// rewrite. Stops at the first failed substitution. Replaced loops stay
    /// in the arena until [`compact`](Self::compact) is called.
    pub fn rewrite_all(&mut self) -> Result<Vec<IntentionOutcome>> {
        let mut outcomes = Vec::new();
        let mut skipped: HashSet<NodeId> = HashSet::new();
        loop {
            let next = self
                .eligible_loops()
                .into_iter()
                .find(|eligible| !skipped.contains(&eligible.anchor.node));
            let Some(eligible) = next else {
                break;
            };
            let outcome = self.apply(eligible.anchor)?;
            if !outcome.is_rewritten() {
                skipped.insert(eligible.anchor.node);
            }
            outcomes.push(outcome);
        }
        log::info!(
            "rewrote {} of {} loops",
            outcomes.iter().filter(|o| o.is_rewritten()).count(),
            outcomes.len()
        );
        Ok(outcomes)
    }

    /// Reclaim the arena slots of replaced loops
    ///
    /// Every anchor and node id handed out before, including those inside
    /// earlier outcomes, is stale afterwards.
    pub fn compact(&mut self) {
        self.tree.compact();
    }

    /// Write the current text back to the file the document was opened from
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "document has no file path"))
        })?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.text())?;
        log::debug!("wrote {}", path.as_ref().display());
        Ok(())
    }
}
