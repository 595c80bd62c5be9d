use crate::ast::{AstNode, NodeId, SyntaxTree};
use crate::config::Config;
use crate::error::Result;
use crate::format::{detect_line_ending, reformat_statement, shorten_references, ImportContext};
use crate::resolve::TypeResolver;

use super::naming::suggest_unique_name;
use super::predicate::{ElementPredicate, IndexedForEachPredicate};
use super::synthesize::{container_text, synthesize_loop, IndexedLoop};
use super::transplant::{loose_comments, transplant_body};
use super::{Intention, IntentionOutcome, SkipReason};

/// What a rewrite would do to the tree
enum Plan {
    Replace {
        target: NodeId,
        index_name: String,
        text: String,
    },
    Skip(SkipReason),
}

/// Replace a for-each loop over an array or list with an indexed `for` loop
///
/// ```text
/// for (String s : names) {          for (int i = 0; i < names.size(); i++) {
///     print(s);               =>        String s = names.get(i);
/// }                                     print(s);
///                                   }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceForEachWithIndexedFor {
    predicate: IndexedForEachPredicate,
}

impl ReplaceForEachWithIndexedFor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replacement text for the loop at `element`, or why there is none
    fn plan(&self, tree: &SyntaxTree, element: NodeId, config: &Config) -> Result<Plan> {
        let resolver = TypeResolver::new(tree, config);
        let Some((stmt, kind)) = self.predicate.classify(&resolver, tree, element) else {
            return Ok(Plan::Skip(SkipReason::NotApplicable));
        };

        let Some(value) = stmt.iterated_value(tree) else {
            return Ok(Plan::Skip(SkipReason::MissingIteratedValue));
        };
        let Some(parameter) = stmt.parameter(tree) else {
            return Ok(Plan::Skip(SkipReason::UnresolvedElementType));
        };
        let element_type = parameter
            .type_ref(tree)
            .map(|ty| tree.text(ty.syntax()).trim().to_string())
            .unwrap_or_default();
        let Some(element_name) = parameter.name(tree) else {
            return Ok(Plan::Skip(SkipReason::UnresolvedElementType));
        };
        if element_type.is_empty() {
            return Ok(Plan::Skip(SkipReason::UnresolvedElementType));
        }
        let Some(body) = stmt.body(tree) else {
            return Ok(Plan::Skip(SkipReason::MissingBody));
        };
        let Some(mut body_text) = transplant_body(tree, body) else {
            return Ok(Plan::Skip(SkipReason::MalformedBlock));
        };

        let mut copied = vec![body, value];
        copied.extend(parameter.type_ref(tree).map(|ty| ty.syntax()));
        copied.extend(parameter.modifiers(tree));
        let comments = loose_comments(tree, stmt.syntax(), &copied);
        if !comments.is_empty() {
            body_text = format!("{}\n{}", comments.join("\n"), body_text.trim_start());
        }

        let index_name = suggest_unique_name(tree, &config.index_name, stmt.syntax(), config)?;
        let shape = IndexedLoop {
            kind,
            index_type: config.index_type.clone(),
            index_name: index_name.clone(),
            container: container_text(tree, value),
            modifiers: parameter
                .modifiers(tree)
                .map(|modifiers| tree.text(modifiers).trim().to_string()),
            element_type,
            element_name,
            element_dims: parameter.extra_dims(tree),
        };
        let mut text = synthesize_loop(&shape, &body_text);
        if config.shorten_references {
            text = shorten_references(&text, &ImportContext::from_tree(tree));
        }
        let text = reformat_statement(
            &text,
            &tree.line_indent(stmt.syntax()),
            detect_line_ending(&tree.source()),
            config,
        );
        Ok(Plan::Replace { target: stmt.syntax(), index_name, text })
    }
}

impl Intention for ReplaceForEachWithIndexedFor {
    fn name(&self) -> &'static str {
        "Replace for-each loop with indexed for loop"
    }

    fn predicate(&self) -> &dyn ElementPredicate {
        &self.predicate
    }

    fn process(&self, tree: &mut SyntaxTree, element: NodeId, config: &Config) -> Result<IntentionOutcome> {
        match self.plan(tree, element, config)? {
            Plan::Replace { target, index_name, text } => self.substitute(tree, target, index_name, &text),
            Plan::Skip(reason) => {
                log::debug!("skipping {}: {}", element, reason);
                Ok(IntentionOutcome::Skipped(reason))
            }
        }
    }
}

impl ReplaceForEachWithIndexedFor {
    /// Swap the loop for its replacement text in one tree mutation
    pub fn substitute(
        &self,
        tree: &mut SyntaxTree,
        target: NodeId,
        index_name: String,
        text: &str,
    ) -> Result<IntentionOutcome> {
        let node = tree.replace_with_text(target, text)?;
        log::info!("rewrote for-each loop {} as indexed loop {} using '{}'", target, node, index_name);
        Ok(IntentionOutcome::Rewritten { node, index_name })
    }
}
