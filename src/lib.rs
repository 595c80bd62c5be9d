//! jrewrite: structural loop rewriter for Java sources
//!
//! Rewrites `for (T x : values)` loops over arrays and lists into indexed
//! `for` loops, keeping comments, formatting and the loop variable's
//! declared type intact.
//!
//! ## Architecture
//!
//! - **parser**: Lossless lexing and recursive-descent parsing of Java into a syntax tree
//! - **ast**: Arena syntax tree with typed views, traversal and in-place substitution
//! - **resolve**: Local static typing of expressions (arrays, lists, declared types)
//! - **format**: Re-indentation and qualified-name shortening of synthesized text
//! - **intention**: Loop matcher, index naming, synthesis, body transplant and substitution
//! - **session**: A file being edited, with revision-checked loop anchors
//! - **bin**: Command-line interface
//!
//! ## Rewrite Flow
//!
//! ```text
//! Java Source → Parser → SyntaxTree → Predicate → Name → Synthesize → Transplant
//!                                                                        ↓
//!                             SyntaxTree ← Substitute ← Reformat ← Shorten
//! ```

pub mod ast;
pub mod config;
pub mod consts;
pub mod error;
pub mod format;
pub mod intention;
pub mod parser;
pub mod resolve;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use intention::{Intention, IntentionOutcome, ReplaceForEachWithIndexedFor, SkipReason};
pub use session::{Anchor, Document, EligibleLoop};

/// Rewrite every eligible for-each loop in `source` and return the new text
pub fn rewrite_source(source: &str, config: &Config) -> Result<String> {
    let mut document = Document::parse(source, config.clone())?;
    document.rewrite_all()?;
    Ok(document.text())
}

/// Rewrite a file in place, returning how many loops were replaced
pub fn rewrite_file(path: impl AsRef<std::path::Path>, config: &Config) -> Result<usize> {
    let mut document = Document::open(path, config.clone())?;
    let rewritten = document
        .rewrite_all()?
        .iter()
        .filter(|outcome| outcome.is_rewritten())
        .count();
    if rewritten > 0 {
        document.save()?;
    }
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_source_without_loops_is_identity() {
        let source = "class A {\n    int f() { return 1; }\n}\n";
        assert_eq!(rewrite_source(source, &Config::default()).expect("rewrite"), source);
    }
}
