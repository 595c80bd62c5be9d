//! Rewrite configuration
//!
//! Code style and naming conventions applied when synthesizing a
//! replacement loop. Defaults follow the usual Java conventions and can be
//! overridden from the environment (`JREWRITE_*`) or the command line.

use crate::consts::{DEFAULT_INDENT_SIZE, DEFAULT_INDEX_NAME, DEFAULT_INDEX_TYPE};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base name handed to the unique-name service for the loop counter
    pub index_name: String,
    /// Declared type of the loop counter
    pub index_type: String,
    /// Prefix required for local variable names by the code style
    pub local_prefix: String,
    /// Suffix required for local variable names by the code style
    pub local_suffix: String,
    /// Spaces per indentation level
    pub indent_size: usize,
    /// Indent with tabs instead of spaces
    pub use_tabs: bool,
    /// Extra simple or qualified type names treated as indexable lists
    pub extra_list_types: Vec<String>,
    /// Replace fully-qualified type references with simple names where safe
    pub shorten_references: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            index_type: DEFAULT_INDEX_TYPE.to_string(),
            local_prefix: String::new(),
            local_suffix: String::new(),
            indent_size: DEFAULT_INDENT_SIZE,
            use_tabs: false,
            extra_list_types: Vec::new(),
            shorten_references: true,
        }
    }
}

impl Config {
    /// Defaults overridden by any `JREWRITE_*` variables present in the environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("JREWRITE_INDEX_NAME") {
            config.index_name = name;
        }
        if let Ok(ty) = std::env::var("JREWRITE_INDEX_TYPE") {
            config.index_type = ty;
        }
        if let Ok(prefix) = std::env::var("JREWRITE_LOCAL_PREFIX") {
            config.local_prefix = prefix;
        }
        if let Ok(suffix) = std::env::var("JREWRITE_LOCAL_SUFFIX") {
            config.local_suffix = suffix;
        }
        if let Ok(indent) = std::env::var("JREWRITE_INDENT") {
            config.indent_size = indent.trim().parse().map_err(|_| {
                Error::config_error(format!("JREWRITE_INDENT must be a number, got '{}'", indent))
            })?;
        }
        if let Ok(tabs) = std::env::var("JREWRITE_USE_TABS") {
            config.use_tabs = matches!(tabs.trim(), "1" | "true" | "yes");
        }
        if let Ok(types) = std::env::var("JREWRITE_LIST_TYPES") {
            config.extra_list_types = types
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that could never produce a usable identifier
    pub fn validate(&self) -> Result<()> {
        if self.index_name.is_empty() {
            return Err(Error::config_error("index name must not be empty"));
        }
        if self.index_type.trim().is_empty() {
            return Err(Error::config_error("index type must not be empty"));
        }
        let affixes = format!("{}{}", self.local_prefix, self.local_suffix);
        if !affixes.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            return Err(Error::config_error(format!(
                "local variable prefix/suffix may only contain identifier characters, got '{}'",
                affixes
            )));
        }
        Ok(())
    }

    /// One level of indentation as text
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.indent_unit(), "    ");
    }

    #[test]
    fn test_invalid_affix_rejected() {
        let config = Config { local_prefix: "my-".to_string(), ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tab_indent_unit() {
        let config = Config { use_tabs: true, ..Config::default() };
        assert_eq!(config.indent_unit(), "\t");
    }
}
