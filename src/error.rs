use thiserror::Error;

use crate::ast::NodeId;

/// Result type for jrewrite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the rewrite engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Lexical error: {message}")]
    Lexical { message: String },

    /// The tree refused the replacement text; the target node is untouched
    #[error("Rewrite rejected: {message}")]
    RewriteRejected { message: String },

    /// The node is no longer part of the tree, or the tree changed since it was looked up
    #[error("Stale node {node}: the tree changed since it was looked up")]
    StaleNode { node: NodeId },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a parse error with location information
    pub fn parse_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a lexical error
    pub fn lexical_error(message: impl Into<String>) -> Self {
        Self::Lexical { message: message.into() }
    }

    /// Create a rejected-rewrite error
    pub fn rewrite_rejected(message: impl Into<String>) -> Self {
        Self::RewriteRejected { message: message.into() }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// True for failures that leave the tree exactly as it was
    pub fn is_rewrite_failure(&self) -> bool {
        matches!(self, Error::RewriteRejected { .. } | Error::StaleNode { .. })
    }
}
