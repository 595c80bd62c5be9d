//! Reformat and shorten services for synthesized statements
//!
//! Both work on text before it is handed to the tree, so a rewrite mutates
//! the tree exactly once.

mod reformat;
mod shorten;

pub use reformat::{detect_line_ending, reformat_statement};
pub use shorten::{shorten_references, ImportContext};
