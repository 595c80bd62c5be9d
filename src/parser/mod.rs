//! Parser module for Java sources
//!
//! This module handles lexical analysis and parsing of `.java` files into a
//! lossless [`SyntaxTree`].

pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, LexicalToken, Token};
pub use parser::Parser;
pub use span::{LineIndex, Location, Span};

use crate::ast::SyntaxTree;
use crate::error::Result;

/// Parse a Java compilation unit
pub fn parse_java(source: &str) -> Result<SyntaxTree> {
    Ok(parser::parse(source)?)
}

/// Parse text that must hold exactly one statement
pub fn parse_statement(source: &str) -> Result<SyntaxTree> {
    Ok(parser::parse_fragment(source)?)
}

/// Parse multiple Java sources
pub fn parse_java_files(sources: &[&str]) -> Result<Vec<SyntaxTree>> {
    let mut trees = Vec::new();
    for source in sources {
        trees.push(parse_java(source)?);
    }
    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, CompilationUnit};

    #[test]
    fn test_parse_simple_class() {
        let source = r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

        let tree = parse_java(source).expect("Failed to parse");
        let unit = CompilationUnit::cast(&tree, tree.root()).expect("compilation unit");
        assert_eq!(unit.type_decls(&tree).len(), 1);
        assert_eq!(unit.package_name(&tree).as_deref(), Some("com.example"));
    }

    #[test]
    fn test_parse_with_imports() {
        let source = r#"
package com.example;

import java.util.List;
import java.util.ArrayList;

public class TestClass {
    private List<String> items = new ArrayList<>();
}
"#;

        let tree = parse_java(source).expect("Failed to parse");
        let unit = CompilationUnit::cast(&tree, tree.root()).expect("compilation unit");
        let imports = unit.imports(&tree);
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].path(&tree), "java.util.List");
        assert!(!imports[0].is_wildcard(&tree));
    }
}
