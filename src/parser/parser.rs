//! Recursive descent parser for Java sources
//!
//! The parser walks the significant tokens and feeds a [`TreeBuilder`].
//! Whitespace and comments are attached to whichever node is open when the
//! next significant token or node starts, so every node begins and ends
//! on a significant token and no source byte is lost.

use super::error::{ParseError, ParseResult};
use super::lexer::{Lexer, LexicalToken, Token};
use super::span::Location;
use crate::ast::{Checkpoint, NodeKind, SyntaxTree, TreeBuilder};
use crate::consts::PARSER_MAX_GAS;

/// Parser for Java sources
pub struct Parser {
    /// Every token, trivia included
    tokens: Vec<LexicalToken>,
    /// Indices of the non-trivia tokens in `tokens`
    significant: Vec<usize>,
    /// Cursor into `significant`
    current: usize,
    /// Number of entries of `tokens` already handed to the builder
    emitted: usize,
    builder: TreeBuilder,
    gas: usize,
}

impl Parser {
    /// Create a new parser from source code
    pub fn new(source: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(source)
            .tokenize_lossless()
            .map_err(|message| ParseError::LexicalError {
                message,
                location: Location::start(),
            })?;
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.token.is_trivia())
            .map(|(index, _)| index)
            .collect();

        Ok(Self {
            tokens,
            significant,
            current: 0,
            emitted: 0,
            builder: TreeBuilder::new(),
            gas: PARSER_MAX_GAS,
        })
    }

    /// Parse a whole compilation unit
    pub fn parse(mut self) -> ParseResult<SyntaxTree> {
        self.builder.start_node(NodeKind::CompilationUnit);

        if self.is_package_decl_start() {
            self.parse_package_decl()?;
        }
        while self.check(Token::Import) {
            self.parse_import_decl()?;
        }
        while !self.is_at_end() {
            self.tick()?;
            if self.match_token(Token::Semicolon) {
                continue;
            }
            self.parse_type_decl()?;
        }

        self.finish_root()
    }

    /// Parse exactly one statement; the root of the tree is a `Fragment`
    pub fn parse_statement_fragment(mut self) -> ParseResult<SyntaxTree> {
        self.builder.start_node(NodeKind::Fragment);
        if self.is_at_end() {
            return Err(self.error_expected("statement"));
        }
        self.parse_block_statement()?;
        if !self.is_at_end() {
            return Err(self.error_expected("end of statement"));
        }
        self.finish_root()
    }

    fn finish_root(mut self) -> ParseResult<SyntaxTree> {
        self.flush_trivia();
        let root = self
            .builder
            .finish_node()
            .ok_or_else(|| ParseError::invalid_syntax("empty syntax tree", Location::start()))?;
        Ok(self.builder.finish(root))
    }

    // Token cursor

    fn is_at_end(&self) -> bool {
        self.current >= self.significant.len()
    }

    fn peek_token_type(&self, n: usize) -> Option<Token> {
        self.significant
            .get(self.current + n)
            .map(|&index| self.tokens[index].token)
    }

    fn check(&self, token_type: Token) -> bool {
        self.peek_token_type(0) == Some(token_type)
    }

    fn check_any(&self, token_types: &[Token]) -> bool {
        self.peek_token_type(0).map_or(false, |token| token_types.contains(&token))
    }

    fn peek_lexeme(&self, n: usize) -> Option<&str> {
        self.significant
            .get(self.current + n)
            .map(|&index| self.tokens[index].lexeme())
    }

    fn current_location(&self) -> Location {
        match self.significant.get(self.current) {
            Some(&index) => self.tokens[index].location(),
            None => self
                .tokens
                .last()
                .map(|token| {
                    let mut end = token.location();
                    for ch in token.lexeme().chars() {
                        end.advance(ch);
                    }
                    end
                })
                .unwrap_or_else(Location::start),
        }
    }

    /// Hand pending whitespace and comments to the node that is open now
    fn flush_trivia(&mut self) {
        let target = self
            .significant
            .get(self.current)
            .copied()
            .unwrap_or(self.tokens.len());
        while self.emitted < target {
            let token = &self.tokens[self.emitted];
            self.builder.token(token.token, &token.lexeme);
            self.emitted += 1;
        }
    }

    fn advance(&mut self) {
        self.flush_trivia();
        if let Some(&index) = self.significant.get(self.current) {
            let token = &self.tokens[index];
            self.builder.token(token.token, &token.lexeme);
            self.emitted = index + 1;
            self.current += 1;
        }
    }

    fn match_token(&mut self, token_type: Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, token_type: Token, expected: &str) -> ParseResult<()> {
        if self.check(token_type) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(expected))
        }
    }

    fn error_expected(&self, expected: &str) -> ParseError {
        match self.peek_lexeme(0) {
            Some(found) => ParseError::unexpected_token(expected, found, self.current_location()),
            None => ParseError::unexpected_end_of_input(expected, self.current_location()),
        }
    }

    fn tick(&mut self) -> ParseResult<()> {
        if self.gas == 0 {
            return Err(ParseError::invalid_syntax(
                "parser step limit exceeded",
                self.current_location(),
            ));
        }
        self.gas -= 1;
        Ok(())
    }

    // Builder plumbing

    fn start_node(&mut self, kind: NodeKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: NodeKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    /// Split `>>`, `>>>` and friends so the first `>` can close a type argument list
    fn split_angle(&mut self) {
        let Some(&index) = self.significant.get(self.current) else {
            return;
        };
        let rest = match self.tokens[index].token {
            Token::RShift => Token::Gt,
            Token::URShift => Token::RShift,
            Token::Ge => Token::Assign,
            Token::RShiftAssign => Token::Ge,
            Token::URShiftAssign => Token::RShiftAssign,
            _ => return,
        };
        let location = self.tokens[index].location();
        let rest_lexeme = self.tokens[index].lexeme()[1..].to_string();
        let mut rest_location = location;
        rest_location.advance('>');

        self.tokens[index] = LexicalToken::new(Token::Gt, ">".to_string(), location);
        self.tokens
            .insert(index + 1, LexicalToken::new(rest, rest_lexeme, rest_location));
        for later in self.significant[self.current + 1..].iter_mut() {
            *later += 1;
        }
        self.significant.insert(self.current + 1, index + 1);
    }

    fn consume_gt(&mut self) -> ParseResult<()> {
        self.split_angle();
        self.consume(Token::Gt, "'>'")
    }

    // Lookahead

    fn lookahead_annotation(&self, i: &mut usize) -> bool {
        if self.peek_token_type(*i) != Some(Token::At)
            || self.peek_token_type(*i + 1) != Some(Token::Identifier)
        {
            return false;
        }
        *i += 2;
        while self.peek_token_type(*i) == Some(Token::Dot)
            && self.peek_token_type(*i + 1) == Some(Token::Identifier)
        {
            *i += 2;
        }
        if self.peek_token_type(*i) == Some(Token::LParen) {
            return self.lookahead_balanced(i, Token::LParen, Token::RParen);
        }
        true
    }

    /// Skip a balanced `open ... close` group starting at `i`
    fn lookahead_balanced(&self, i: &mut usize, open: Token, close: Token) -> bool {
        let mut depth = 0usize;
        loop {
            match self.peek_token_type(*i) {
                Some(token) if token == open => depth += 1,
                Some(token) if token == close => {
                    depth -= 1;
                    if depth == 0 {
                        *i += 1;
                        return true;
                    }
                }
                Some(_) => {}
                None => return false,
            }
            *i += 1;
        }
    }

    fn lookahead_modifiers(&self, i: &mut usize) {
        loop {
            match self.peek_token_type(*i) {
                Some(Token::At) if self.peek_token_type(*i + 1) != Some(Token::Interface) => {
                    if !self.lookahead_annotation(i) {
                        return;
                    }
                }
                Some(token) if token.is_modifier() && token != Token::Default => *i += 1,
                _ => return,
            }
        }
    }

    // Lookahead: parse a type reference without consuming tokens
    fn lookahead_type_ref(&self, i: &mut usize) -> bool {
        while self.peek_token_type(*i) == Some(Token::At) {
            if !self.lookahead_annotation(i) {
                return false;
            }
        }
        match self.peek_token_type(*i) {
            Some(token) if token.is_primitive_type() => *i += 1,
            Some(Token::Identifier) => {
                *i += 1;
                loop {
                    if self.peek_token_type(*i) == Some(Token::Lt) && !self.lookahead_type_args(i) {
                        return false;
                    }
                    if self.peek_token_type(*i) == Some(Token::Dot)
                        && self.peek_token_type(*i + 1) == Some(Token::Identifier)
                    {
                        *i += 2;
                        continue;
                    }
                    break;
                }
            }
            _ => return false,
        }
        while self.peek_token_type(*i) == Some(Token::LBracket)
            && self.peek_token_type(*i + 1) == Some(Token::RBracket)
        {
            *i += 2;
        }
        true
    }

    fn lookahead_type_args(&self, i: &mut usize) -> bool {
        let mut depth: isize = 0;
        loop {
            match self.peek_token_type(*i) {
                Some(Token::Lt) => depth += 1,
                Some(Token::Gt) => depth -= 1,
                Some(Token::RShift) => depth -= 2,
                Some(Token::URShift) => depth -= 3,
                Some(token) if token.is_primitive_type() => {}
                Some(
                    Token::Identifier | Token::Dot | Token::Comma | Token::Question |
                    Token::Extends | Token::Super | Token::LBracket | Token::RBracket |
                    Token::Amp | Token::At,
                ) => {}
                _ => return false,
            }
            *i += 1;
            if depth <= 0 {
                return true;
            }
        }
    }

    fn is_package_decl_start(&self) -> bool {
        let mut i = 0;
        while self.peek_token_type(i) == Some(Token::At) {
            if !self.lookahead_annotation(&mut i) {
                return false;
            }
        }
        self.peek_token_type(i) == Some(Token::Package)
    }

    fn is_local_var_decl_start(&self) -> bool {
        let mut i = 0;
        self.lookahead_modifiers(&mut i);
        if !self.lookahead_type_ref(&mut i) {
            return false;
        }
        self.peek_token_type(i) == Some(Token::Identifier)
            && matches!(
                self.peek_token_type(i + 1),
                Some(Token::Assign | Token::Semicolon | Token::Comma | Token::LBracket)
            )
    }

    fn is_local_type_decl_start(&self) -> bool {
        let mut i = 0;
        self.lookahead_modifiers(&mut i);
        match self.peek_token_type(i) {
            Some(Token::Class | Token::Interface) => true,
            Some(Token::Enum) => self.peek_token_type(i + 1) == Some(Token::Identifier),
            Some(Token::Identifier) => self.is_record_start(i),
            _ => false,
        }
    }

    /// `record Name(` or `record Name<`; `record` is otherwise an ordinary identifier
    fn is_record_start(&self, i: usize) -> bool {
        self.peek_lexeme(i) == Some("record")
            && self.peek_token_type(i + 1) == Some(Token::Identifier)
            && matches!(self.peek_token_type(i + 2), Some(Token::LParen | Token::Lt))
    }

    /// After `for (`: `Type name :`
    fn is_foreach_header(&self) -> bool {
        let mut i = 0;
        self.lookahead_modifiers(&mut i);
        if !self.lookahead_type_ref(&mut i) {
            return false;
        }
        self.peek_token_type(i) == Some(Token::Identifier)
            && self.peek_token_type(i + 1) == Some(Token::Colon)
    }

    fn is_lambda_start(&self) -> bool {
        match self.peek_token_type(0) {
            Some(Token::Identifier) => self.peek_token_type(1) == Some(Token::Arrow),
            Some(Token::LParen) => {
                let mut i = 0;
                self.lookahead_balanced(&mut i, Token::LParen, Token::RParen)
                    && self.peek_token_type(i) == Some(Token::Arrow)
            }
            _ => false,
        }
    }

    fn is_cast_start(&self) -> bool {
        let mut i = 1;
        let primitive = self.peek_token_type(1).map_or(false, |t| t.is_primitive_type());
        if !self.lookahead_type_ref(&mut i) {
            return false;
        }
        while self.peek_token_type(i) == Some(Token::Amp) {
            i += 1;
            if !self.lookahead_type_ref(&mut i) {
                return false;
            }
        }
        if self.peek_token_type(i) != Some(Token::RParen) {
            return false;
        }
        if primitive {
            return true;
        }
        match self.peek_token_type(i + 1) {
            Some(token) if token.is_literal() => true,
            Some(
                Token::Identifier | Token::LParen | Token::Bang | Token::Tilde |
                Token::This | Token::Super | Token::New,
            ) => true,
            _ => false,
        }
    }

    fn at_modifier(&self) -> bool {
        match self.peek_token_type(0) {
            Some(Token::At) => self.peek_token_type(1) != Some(Token::Interface),
            Some(Token::Default) => !matches!(
                self.peek_token_type(1),
                Some(Token::Colon | Token::Arrow)
            ),
            Some(token) => token.is_modifier(),
            None => false,
        }
    }

    // Declarations

    fn parse_package_decl(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::PackageDecl);
        while self.check(Token::At) {
            self.parse_annotation()?;
        }
        self.consume(Token::Package, "'package'")?;
        self.parse_qualified_name()?;
        self.consume(Token::Semicolon, "';'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_import_decl(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ImportDecl);
        self.consume(Token::Import, "'import'")?;
        self.match_token(Token::Static);
        self.consume(Token::Identifier, "identifier")?;
        while self.match_token(Token::Dot) {
            if self.match_token(Token::Star) {
                break;
            }
            self.consume(Token::Identifier, "identifier")?;
        }
        self.consume(Token::Semicolon, "';'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_qualified_name(&mut self) -> ParseResult<()> {
        self.consume(Token::Identifier, "identifier")?;
        while self.check(Token::Dot) && self.peek_token_type(1) == Some(Token::Identifier) {
            self.advance();
            self.advance();
        }
        Ok(())
    }

    fn parse_modifiers(&mut self) -> ParseResult<bool> {
        if !self.at_modifier() {
            return Ok(false);
        }
        self.start_node(NodeKind::Modifiers);
        while self.at_modifier() {
            if self.check(Token::At) {
                self.parse_annotation()?;
            } else {
                self.advance();
            }
        }
        self.finish_node();
        Ok(true)
    }

    fn parse_annotation(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::Annotation);
        self.consume(Token::At, "'@'")?;
        self.parse_qualified_name()?;
        if self.check(Token::LParen) {
            self.start_node(NodeKind::AnnotationArgs);
            self.advance();
            if !self.check(Token::RParen) {
                loop {
                    if self.check(Token::Identifier) && self.peek_token_type(1) == Some(Token::Assign) {
                        self.advance();
                        self.advance();
                    }
                    self.parse_element_value()?;
                    if !self.match_token(Token::Comma) {
                        break;
                    }
                }
            }
            self.consume(Token::RParen, "')'")?;
            self.finish_node();
        }
        self.finish_node();
        Ok(())
    }

    fn parse_element_value(&mut self) -> ParseResult<()> {
        if self.check(Token::At) {
            self.parse_annotation()
        } else if self.check(Token::LBrace) {
            self.start_node(NodeKind::ArrayInit);
            self.advance();
            while !self.check(Token::RBrace) && !self.is_at_end() {
                self.parse_element_value()?;
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
            self.consume(Token::RBrace, "'}'")?;
            self.finish_node();
            Ok(())
        } else {
            self.parse_conditional()
        }
    }

    fn parse_type_decl(&mut self) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.parse_modifiers()?;
        self.parse_type_decl_after_modifiers(checkpoint)
    }

    fn parse_type_decl_after_modifiers(&mut self, checkpoint: Checkpoint) -> ParseResult<()> {
        match self.peek_token_type(0) {
            Some(Token::Class) => {
                self.start_node_at(checkpoint, NodeKind::ClassDecl);
                self.advance();
                self.consume(Token::Identifier, "class name")?;
                if self.check(Token::Lt) {
                    self.parse_type_params()?;
                }
                if self.match_token(Token::Extends) {
                    self.parse_type_ref()?;
                }
                if self.match_token(Token::Implements) {
                    self.parse_type_list()?;
                }
                self.parse_class_body()?;
            }
            Some(Token::Interface) => {
                self.start_node_at(checkpoint, NodeKind::InterfaceDecl);
                self.advance();
                self.consume(Token::Identifier, "interface name")?;
                if self.check(Token::Lt) {
                    self.parse_type_params()?;
                }
                if self.match_token(Token::Extends) {
                    self.parse_type_list()?;
                }
                self.parse_class_body()?;
            }
            Some(Token::Enum) => {
                self.start_node_at(checkpoint, NodeKind::EnumDecl);
                self.advance();
                self.consume(Token::Identifier, "enum name")?;
                if self.match_token(Token::Implements) {
                    self.parse_type_list()?;
                }
                self.parse_enum_body()?;
            }
            Some(Token::Identifier) if self.is_record_start(0) => {
                self.start_node_at(checkpoint, NodeKind::RecordDecl);
                self.advance();
                self.consume(Token::Identifier, "record name")?;
                if self.check(Token::Lt) {
                    self.parse_type_params()?;
                }
                self.parse_parameter_list()?;
                if self.match_token(Token::Implements) {
                    self.parse_type_list()?;
                }
                self.parse_class_body()?;
            }
            Some(Token::At) if self.peek_token_type(1) == Some(Token::Interface) => {
                self.start_node_at(checkpoint, NodeKind::AnnotationTypeDecl);
                self.advance();
                self.advance();
                self.consume(Token::Identifier, "annotation type name")?;
                self.parse_class_body()?;
            }
            _ => return Err(self.error_expected("type declaration")),
        }
        self.finish_node();
        Ok(())
    }

    fn parse_type_list(&mut self) -> ParseResult<()> {
        self.parse_type_ref()?;
        while self.match_token(Token::Comma) {
            self.parse_type_ref()?;
        }
        Ok(())
    }

    fn parse_type_params(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::TypeParams);
        self.consume(Token::Lt, "'<'")?;
        loop {
            self.start_node(NodeKind::TypeParam);
            while self.check(Token::At) {
                self.parse_annotation()?;
            }
            self.consume(Token::Identifier, "type parameter name")?;
            if self.match_token(Token::Extends) {
                self.parse_type_ref()?;
                while self.match_token(Token::Amp) {
                    self.parse_type_ref()?;
                }
            }
            self.finish_node();
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        self.consume_gt()?;
        self.finish_node();
        Ok(())
    }

    fn parse_class_body(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ClassBody);
        self.consume(Token::LBrace, "'{'")?;
        while !self.check(Token::RBrace) && !self.is_at_end() {
            self.tick()?;
            self.parse_class_member()?;
        }
        self.consume(Token::RBrace, "'}'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_enum_body(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ClassBody);
        self.consume(Token::LBrace, "'{'")?;
        while self.check(Token::Identifier) || self.check(Token::At) {
            self.start_node(NodeKind::EnumConstant);
            self.parse_modifiers()?;
            self.consume(Token::Identifier, "enum constant")?;
            if self.check(Token::LParen) {
                self.parse_arguments()?;
            }
            if self.check(Token::LBrace) {
                self.parse_class_body()?;
            }
            self.finish_node();
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        if self.match_token(Token::Semicolon) {
            while !self.check(Token::RBrace) && !self.is_at_end() {
                self.tick()?;
                self.parse_class_member()?;
            }
        }
        self.consume(Token::RBrace, "'}'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_class_member(&mut self) -> ParseResult<()> {
        if self.match_token(Token::Semicolon) {
            return Ok(());
        }
        if self.check(Token::LBrace)
            || (self.check(Token::Static) && self.peek_token_type(1) == Some(Token::LBrace))
        {
            self.start_node(NodeKind::Initializer);
            self.match_token(Token::Static);
            self.parse_block()?;
            self.finish_node();
            return Ok(());
        }

        let checkpoint = self.checkpoint();
        self.parse_modifiers()?;

        match self.peek_token_type(0) {
            Some(Token::Class | Token::Interface | Token::Enum) => {
                return self.parse_type_decl_after_modifiers(checkpoint);
            }
            Some(Token::At) if self.peek_token_type(1) == Some(Token::Interface) => {
                return self.parse_type_decl_after_modifiers(checkpoint);
            }
            Some(Token::Identifier) if self.is_record_start(0) => {
                return self.parse_type_decl_after_modifiers(checkpoint);
            }
            _ => {}
        }

        if self.check(Token::Lt) {
            self.parse_type_params()?;
        }

        if self.check(Token::Identifier) && self.peek_token_type(1) == Some(Token::LParen) {
            self.start_node_at(checkpoint, NodeKind::ConstructorDecl);
            self.advance();
            self.parse_parameter_list()?;
            self.parse_throws()?;
            self.parse_block()?;
            self.finish_node();
            return Ok(());
        }

        // compact record constructor
        if self.check(Token::Identifier) && self.peek_token_type(1) == Some(Token::LBrace) {
            self.start_node_at(checkpoint, NodeKind::ConstructorDecl);
            self.advance();
            self.parse_block()?;
            self.finish_node();
            return Ok(());
        }

        let mut i = 0;
        if !self.lookahead_type_ref(&mut i) {
            return Err(self.error_expected("class member"));
        }
        let is_method = self.peek_token_type(i) == Some(Token::Identifier)
            && self.peek_token_type(i + 1) == Some(Token::LParen);

        if is_method {
            self.start_node_at(checkpoint, NodeKind::MethodDecl);
            self.parse_type_ref()?;
            self.consume(Token::Identifier, "method name")?;
            self.parse_parameter_list()?;
            while self.check(Token::LBracket) && self.peek_token_type(1) == Some(Token::RBracket) {
                self.advance();
                self.advance();
            }
            self.parse_throws()?;
            if self.match_token(Token::Default) {
                self.parse_element_value()?;
            }
            if self.check(Token::LBrace) {
                self.parse_block()?;
            } else {
                self.consume(Token::Semicolon, "';' or method body")?;
            }
        } else {
            self.start_node_at(checkpoint, NodeKind::FieldDecl);
            self.parse_type_ref()?;
            self.parse_var_declarators()?;
            self.consume(Token::Semicolon, "';'")?;
        }
        self.finish_node();
        Ok(())
    }

    fn parse_throws(&mut self) -> ParseResult<()> {
        if self.match_token(Token::Throws) {
            self.parse_type_list()?;
        }
        Ok(())
    }

    fn parse_parameter_list(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ParameterList);
        self.consume(Token::LParen, "'('")?;
        if !self.check(Token::RParen) {
            loop {
                self.parse_formal_parameter()?;
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.consume(Token::RParen, "')'")?;
        self.finish_node();
        Ok(())
    }

    /// `[modifiers] Type [...] name [[]]`; also the receiver form `Type this`
    fn parse_formal_parameter(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::Parameter);
        self.parse_modifiers()?;
        self.parse_type_ref()?;
        self.match_token(Token::Ellipsis);
        if !self.match_token(Token::This) {
            self.consume(Token::Identifier, "parameter name")?;
        }
        while self.check(Token::LBracket) && self.peek_token_type(1) == Some(Token::RBracket) {
            self.advance();
            self.advance();
        }
        self.finish_node();
        Ok(())
    }

    fn parse_var_declarators(&mut self) -> ParseResult<()> {
        loop {
            self.start_node(NodeKind::VarDeclarator);
            self.consume(Token::Identifier, "variable name")?;
            while self.check(Token::LBracket) && self.peek_token_type(1) == Some(Token::RBracket) {
                self.advance();
                self.advance();
            }
            if self.match_token(Token::Assign) {
                if self.check(Token::LBrace) {
                    self.parse_array_init()?;
                } else {
                    self.parse_expression()?;
                }
            }
            self.finish_node();
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        Ok(())
    }

    // Types

    fn parse_type_ref(&mut self) -> ParseResult<()> {
        self.parse_type_ref_with_dims(true)
    }

    fn parse_type_ref_with_dims(&mut self, dims: bool) -> ParseResult<()> {
        self.start_node(NodeKind::TypeRef);
        while self.check(Token::At) {
            self.parse_annotation()?;
        }
        match self.peek_token_type(0) {
            Some(token) if token.is_primitive_type() => self.advance(),
            Some(Token::Identifier) => {
                self.advance();
                loop {
                    if self.check(Token::Lt) {
                        self.parse_type_args()?;
                    }
                    if self.check(Token::Dot) && self.peek_token_type(1) == Some(Token::Identifier) {
                        self.advance();
                        self.advance();
                        continue;
                    }
                    break;
                }
            }
            _ => return Err(self.error_expected("type")),
        }
        if dims {
            while self.check(Token::LBracket) && self.peek_token_type(1) == Some(Token::RBracket) {
                self.advance();
                self.advance();
            }
        }
        self.finish_node();
        Ok(())
    }

    fn parse_type_args(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::TypeArgs);
        self.consume(Token::Lt, "'<'")?;
        if !self.check_any(&[Token::Gt, Token::RShift, Token::URShift]) {
            loop {
                if self.check(Token::Question) {
                    self.start_node(NodeKind::Wildcard);
                    self.advance();
                    if self.match_token(Token::Extends) || self.match_token(Token::Super) {
                        self.parse_type_ref()?;
                    }
                    self.finish_node();
                } else {
                    self.parse_type_ref()?;
                }
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.consume_gt()?;
        self.finish_node();
        Ok(())
    }

    // Statements

    fn parse_block(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::Block);
        self.consume(Token::LBrace, "'{'")?;
        while !self.check(Token::RBrace) && !self.is_at_end() {
            self.parse_block_statement()?;
        }
        self.consume(Token::RBrace, "'}'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_block_statement(&mut self) -> ParseResult<()> {
        self.tick()?;
        if self.is_local_type_decl_start() {
            return self.parse_type_decl();
        }
        if self.is_local_var_decl_start() {
            return self.parse_local_var_decl(true);
        }
        self.parse_statement()
    }

    fn parse_local_var_decl(&mut self, with_semicolon: bool) -> ParseResult<()> {
        self.start_node(NodeKind::LocalVarDecl);
        self.parse_modifiers()?;
        self.parse_type_ref()?;
        self.parse_var_declarators()?;
        if with_semicolon {
            self.consume(Token::Semicolon, "';'")?;
        }
        self.finish_node();
        Ok(())
    }

    fn parse_statement(&mut self) -> ParseResult<()> {
        self.tick()?;
        match self.peek_token_type(0) {
            Some(Token::LBrace) => self.parse_block(),
            Some(Token::Semicolon) => self.parse_simple(NodeKind::EmptyStmt, |_| Ok(())),
            Some(Token::If) => self.parse_if_stmt(),
            Some(Token::While) => self.parse_while_stmt(),
            Some(Token::Do) => self.parse_do_while_stmt(),
            Some(Token::For) => self.parse_for_stmt(),
            Some(Token::Try) => self.parse_try_stmt(),
            Some(Token::Switch) => self.parse_switch_stmt(),
            Some(Token::Return) => self.parse_simple(NodeKind::ReturnStmt, |p| {
                p.advance();
                if !p.check(Token::Semicolon) {
                    p.parse_expression()?;
                }
                Ok(())
            }),
            Some(Token::Break) => self.parse_jump(NodeKind::BreakStmt),
            Some(Token::Continue) => self.parse_jump(NodeKind::ContinueStmt),
            Some(Token::Throw) => self.parse_simple(NodeKind::ThrowStmt, |p| {
                p.advance();
                p.parse_expression()
            }),
            Some(Token::Assert) => self.parse_simple(NodeKind::AssertStmt, |p| {
                p.advance();
                p.parse_expression()?;
                if p.match_token(Token::Colon) {
                    p.parse_expression()?;
                }
                Ok(())
            }),
            Some(Token::Synchronized) => {
                self.start_node(NodeKind::SynchronizedStmt);
                self.advance();
                self.parse_paren_condition()?;
                self.parse_block()?;
                self.finish_node();
                Ok(())
            }
            Some(Token::Identifier) if self.peek_token_type(1) == Some(Token::Colon) => {
                self.start_node(NodeKind::LabeledStmt);
                self.advance();
                self.advance();
                self.parse_statement()?;
                self.finish_node();
                Ok(())
            }
            Some(_) => self.parse_simple(NodeKind::ExprStmt, |p| p.parse_expression()),
            None => Err(self.error_expected("statement")),
        }
    }

    /// A statement made of `body` followed by `;`
    fn parse_simple<F>(&mut self, kind: NodeKind, body: F) -> ParseResult<()>
    where
        F: FnOnce(&mut Self) -> ParseResult<()>,
    {
        self.start_node(kind);
        body(self)?;
        self.consume(Token::Semicolon, "';'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_jump(&mut self, kind: NodeKind) -> ParseResult<()> {
        self.parse_simple(kind, |p| {
            p.advance();
            p.match_token(Token::Identifier);
            Ok(())
        })
    }

    fn parse_paren_condition(&mut self) -> ParseResult<()> {
        self.consume(Token::LParen, "'('")?;
        self.parse_expression()?;
        self.consume(Token::RParen, "')'")
    }

    fn parse_if_stmt(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::IfStmt);
        self.consume(Token::If, "'if'")?;
        self.parse_paren_condition()?;
        self.parse_statement()?;
        if self.match_token(Token::Else) {
            self.parse_statement()?;
        }
        self.finish_node();
        Ok(())
    }

    fn parse_while_stmt(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::WhileStmt);
        self.consume(Token::While, "'while'")?;
        self.parse_paren_condition()?;
        self.parse_statement()?;
        self.finish_node();
        Ok(())
    }

    fn parse_do_while_stmt(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::DoWhileStmt);
        self.consume(Token::Do, "'do'")?;
        self.parse_statement()?;
        self.consume(Token::While, "'while'")?;
        self.parse_paren_condition()?;
        self.consume(Token::Semicolon, "';'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_for_stmt(&mut self) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.consume(Token::For, "'for'")?;
        self.consume(Token::LParen, "'('")?;

        if self.is_foreach_header() {
            self.start_node_at(checkpoint, NodeKind::ForEachStmt);
            self.parse_formal_parameter()?;
            self.consume(Token::Colon, "':'")?;
            self.parse_expression()?;
            self.consume(Token::RParen, "')'")?;
            self.parse_statement()?;
            self.finish_node();
            return Ok(());
        }

        self.start_node_at(checkpoint, NodeKind::ForStmt);
        if !self.check(Token::Semicolon) {
            self.start_node(NodeKind::ForInit);
            if self.is_local_var_decl_start() {
                self.parse_local_var_decl(false)?;
            } else {
                self.parse_expression_list()?;
            }
            self.finish_node();
        }
        self.consume(Token::Semicolon, "';'")?;
        if !self.check(Token::Semicolon) {
            self.parse_expression()?;
        }
        self.consume(Token::Semicolon, "';'")?;
        if !self.check(Token::RParen) {
            self.start_node(NodeKind::ForUpdate);
            self.parse_expression_list()?;
            self.finish_node();
        }
        self.consume(Token::RParen, "')'")?;
        self.parse_statement()?;
        self.finish_node();
        Ok(())
    }

    fn parse_expression_list(&mut self) -> ParseResult<()> {
        self.parse_expression()?;
        while self.match_token(Token::Comma) {
            self.parse_expression()?;
        }
        Ok(())
    }

    fn parse_try_stmt(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::TryStmt);
        self.consume(Token::Try, "'try'")?;
        if self.check(Token::LParen) {
            self.parse_resource_spec()?;
        }
        self.parse_block()?;
        while self.check(Token::Catch) {
            self.start_node(NodeKind::CatchClause);
            self.advance();
            self.consume(Token::LParen, "'('")?;
            self.start_node(NodeKind::Parameter);
            self.parse_modifiers()?;
            self.parse_type_ref()?;
            while self.match_token(Token::Pipe) {
                self.parse_type_ref()?;
            }
            self.consume(Token::Identifier, "exception name")?;
            self.finish_node();
            self.consume(Token::RParen, "')'")?;
            self.parse_block()?;
            self.finish_node();
        }
        if self.check(Token::Finally) {
            self.start_node(NodeKind::FinallyClause);
            self.advance();
            self.parse_block()?;
            self.finish_node();
        }
        self.finish_node();
        Ok(())
    }

    fn parse_resource_spec(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ResourceSpec);
        self.consume(Token::LParen, "'('")?;
        while !self.check(Token::RParen) && !self.is_at_end() {
            self.start_node(NodeKind::Resource);
            let mut i = 0;
            self.lookahead_modifiers(&mut i);
            let declares = self.lookahead_type_ref(&mut i)
                && self.peek_token_type(i) == Some(Token::Identifier)
                && self.peek_token_type(i + 1) == Some(Token::Assign);
            if declares {
                self.parse_modifiers()?;
                self.parse_type_ref()?;
                self.advance();
                self.advance();
            }
            self.parse_expression()?;
            self.finish_node();
            if !self.match_token(Token::Semicolon) {
                break;
            }
        }
        self.consume(Token::RParen, "')'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_switch_stmt(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::SwitchStmt);
        self.consume(Token::Switch, "'switch'")?;
        self.parse_paren_condition()?;
        self.consume(Token::LBrace, "'{'")?;
        while !self.check(Token::RBrace) && !self.is_at_end() {
            let is_label = self.check(Token::Case)
                || (self.check(Token::Default)
                    && matches!(self.peek_token_type(1), Some(Token::Colon | Token::Arrow)));
            if is_label {
                self.start_node(NodeKind::SwitchLabel);
                if self.match_token(Token::Case) {
                    self.parse_conditional()?;
                    while self.match_token(Token::Comma) {
                        self.parse_conditional()?;
                    }
                } else {
                    self.advance();
                }
                if !self.match_token(Token::Arrow) {
                    self.consume(Token::Colon, "':' or '->'")?;
                }
                self.finish_node();
            } else {
                self.parse_block_statement()?;
            }
        }
        self.consume(Token::RBrace, "'}'")?;
        self.finish_node();
        Ok(())
    }

    // Expressions

    fn parse_expression(&mut self) -> ParseResult<()> {
        self.tick()?;
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseResult<()> {
        if self.is_lambda_start() {
            return self.parse_lambda();
        }
        let checkpoint = self.checkpoint();
        self.parse_conditional()?;
        if self.peek_token_type(0).map_or(false, |t| t.is_assignment_operator()) {
            self.start_node_at(checkpoint, NodeKind::AssignExpr);
            self.advance();
            self.parse_assignment()?;
            self.finish_node();
        }
        Ok(())
    }

    fn parse_conditional(&mut self) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.parse_binary(1)?;
        if self.check(Token::Question) {
            self.start_node_at(checkpoint, NodeKind::ConditionalExpr);
            self.advance();
            self.parse_expression()?;
            self.consume(Token::Colon, "':'")?;
            if self.is_lambda_start() {
                self.parse_lambda()?;
            } else {
                self.parse_conditional()?;
            }
            self.finish_node();
        }
        Ok(())
    }

    fn binary_precedence(token: Token) -> Option<u8> {
        let precedence = match token {
            Token::PipePipe => 1,
            Token::AndAnd => 2,
            Token::Pipe => 3,
            Token::Caret => 4,
            Token::Amp => 5,
            Token::Eq | Token::Ne => 6,
            Token::Lt | Token::Gt | Token::Le | Token::Ge | Token::InstanceOf => 7,
            Token::LShift | Token::RShift | Token::URShift => 8,
            Token::Plus | Token::Minus => 9,
            Token::Star | Token::Slash | Token::Percent => 10,
            _ => return None,
        };
        Some(precedence)
    }

    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.parse_unary()?;
        loop {
            let Some(token) = self.peek_token_type(0) else {
                break;
            };
            let Some(precedence) = Self::binary_precedence(token) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            if token == Token::InstanceOf {
                self.start_node_at(checkpoint, NodeKind::InstanceOfExpr);
                self.advance();
                self.match_token(Token::Final);
                self.parse_type_ref()?;
                self.match_token(Token::Identifier);
                self.finish_node();
                continue;
            }
            self.start_node_at(checkpoint, NodeKind::BinaryExpr);
            self.advance();
            self.parse_binary(precedence + 1)?;
            self.finish_node();
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> ParseResult<()> {
        match self.peek_token_type(0) {
            Some(Token::Plus | Token::Minus | Token::Bang | Token::Tilde | Token::Inc | Token::Dec) => {
                self.start_node(NodeKind::UnaryExpr);
                self.advance();
                self.parse_unary()?;
                self.finish_node();
                Ok(())
            }
            Some(Token::LParen) if self.is_cast_start() => {
                self.start_node(NodeKind::CastExpr);
                self.advance();
                self.parse_type_ref()?;
                while self.match_token(Token::Amp) {
                    self.parse_type_ref()?;
                }
                self.consume(Token::RParen, "')'")?;
                if self.is_lambda_start() {
                    self.parse_lambda()?;
                } else {
                    self.parse_unary()?;
                }
                self.finish_node();
                Ok(())
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.parse_primary()?;
        loop {
            match self.peek_token_type(0) {
                Some(Token::Dot) => match self.peek_token_type(1) {
                    Some(Token::Identifier) => {
                        let is_call = self.peek_token_type(2) == Some(Token::LParen);
                        let kind = if is_call { NodeKind::MethodCall } else { NodeKind::FieldAccess };
                        self.start_node_at(checkpoint, kind);
                        self.advance();
                        self.advance();
                        if is_call {
                            self.parse_arguments()?;
                        }
                        self.finish_node();
                    }
                    Some(Token::Lt) => {
                        self.start_node_at(checkpoint, NodeKind::MethodCall);
                        self.advance();
                        self.parse_type_args()?;
                        self.consume(Token::Identifier, "method name")?;
                        self.parse_arguments()?;
                        self.finish_node();
                    }
                    Some(Token::Class) => {
                        self.start_node_at(checkpoint, NodeKind::ClassLiteral);
                        self.advance();
                        self.advance();
                        self.finish_node();
                    }
                    Some(Token::This) => {
                        self.start_node_at(checkpoint, NodeKind::ThisExpr);
                        self.advance();
                        self.advance();
                        self.finish_node();
                    }
                    Some(Token::Super) => {
                        self.start_node_at(checkpoint, NodeKind::SuperExpr);
                        self.advance();
                        self.advance();
                        self.finish_node();
                    }
                    Some(Token::New) => {
                        self.start_node_at(checkpoint, NodeKind::NewExpr);
                        self.advance();
                        self.advance();
                        self.parse_type_ref_with_dims(false)?;
                        self.parse_arguments()?;
                        if self.check(Token::LBrace) {
                            self.parse_class_body()?;
                        }
                        self.finish_node();
                    }
                    _ => {
                        self.advance();
                        return Err(self.error_expected("member name"));
                    }
                },
                Some(Token::LBracket) => {
                    self.start_node_at(checkpoint, NodeKind::ArrayAccess);
                    self.advance();
                    self.parse_expression()?;
                    self.consume(Token::RBracket, "']'")?;
                    self.finish_node();
                }
                Some(Token::Inc | Token::Dec) => {
                    self.start_node_at(checkpoint, NodeKind::PostfixExpr);
                    self.advance();
                    self.finish_node();
                }
                Some(Token::DoubleColon) => {
                    self.start_node_at(checkpoint, NodeKind::MethodRef);
                    self.parse_method_ref_tail()?;
                    self.finish_node();
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn parse_method_ref_tail(&mut self) -> ParseResult<()> {
        self.consume(Token::DoubleColon, "'::'")?;
        if self.match_token(Token::New) {
            return Ok(());
        }
        if self.check(Token::Lt) {
            self.parse_type_args()?;
        }
        self.consume(Token::Identifier, "method name")
    }

    fn parse_primary(&mut self) -> ParseResult<()> {
        match self.peek_token_type(0) {
            Some(token) if token.is_literal() => {
                self.start_node(NodeKind::Literal);
                self.advance();
                self.finish_node();
                Ok(())
            }
            Some(Token::Identifier) => {
                if self.peek_token_type(1) == Some(Token::LParen) {
                    self.start_node(NodeKind::MethodCall);
                    self.advance();
                    self.parse_arguments()?;
                    self.finish_node();
                } else if self.peek_token_type(1) == Some(Token::LBracket)
                    && self.peek_token_type(2) == Some(Token::RBracket)
                {
                    self.parse_type_primary()?;
                } else {
                    self.start_node(NodeKind::NameRef);
                    self.advance();
                    self.finish_node();
                }
                Ok(())
            }
            Some(keyword @ (Token::This | Token::Super)) => {
                if self.peek_token_type(1) == Some(Token::LParen) {
                    self.start_node(NodeKind::MethodCall);
                    self.advance();
                    self.parse_arguments()?;
                } else {
                    let kind = if keyword == Token::This { NodeKind::ThisExpr } else { NodeKind::SuperExpr };
                    self.start_node(kind);
                    self.advance();
                }
                self.finish_node();
                Ok(())
            }
            Some(Token::LParen) => {
                self.start_node(NodeKind::ParenExpr);
                self.advance();
                self.parse_expression()?;
                self.consume(Token::RParen, "')'")?;
                self.finish_node();
                Ok(())
            }
            Some(Token::New) => self.parse_new(),
            Some(token) if token.is_primitive_type() => self.parse_type_primary(),
            _ => Err(self.error_expected("expression")),
        }
    }

    /// `int.class`, `String[].class`, `int[]::new`
    fn parse_type_primary(&mut self) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.parse_type_ref()?;
        if self.check(Token::Dot) && self.peek_token_type(1) == Some(Token::Class) {
            self.start_node_at(checkpoint, NodeKind::ClassLiteral);
            self.advance();
            self.advance();
            self.finish_node();
            Ok(())
        } else if self.check(Token::DoubleColon) {
            self.start_node_at(checkpoint, NodeKind::MethodRef);
            self.parse_method_ref_tail()?;
            self.finish_node();
            Ok(())
        } else {
            Err(self.error_expected("'.class' or '::'"))
        }
    }

    fn parse_new(&mut self) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        self.consume(Token::New, "'new'")?;
        if self.check(Token::Lt) {
            self.parse_type_args()?;
        }
        self.parse_type_ref_with_dims(false)?;

        if self.check(Token::LBracket) {
            self.start_node_at(checkpoint, NodeKind::NewArrayExpr);
            while self.match_token(Token::LBracket) {
                if !self.check(Token::RBracket) {
                    self.parse_expression()?;
                }
                self.consume(Token::RBracket, "']'")?;
            }
            if self.check(Token::LBrace) {
                self.parse_array_init()?;
            }
        } else {
            self.start_node_at(checkpoint, NodeKind::NewExpr);
            self.parse_arguments()?;
            if self.check(Token::LBrace) {
                self.parse_class_body()?;
            }
        }
        self.finish_node();
        Ok(())
    }

    fn parse_array_init(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ArrayInit);
        self.consume(Token::LBrace, "'{'")?;
        while !self.check(Token::RBrace) && !self.is_at_end() {
            if self.check(Token::LBrace) {
                self.parse_array_init()?;
            } else {
                self.parse_expression()?;
            }
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        self.consume(Token::RBrace, "'}'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_arguments(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::ArgList);
        self.consume(Token::LParen, "'('")?;
        if !self.check(Token::RParen) {
            self.parse_expression_list()?;
        }
        self.consume(Token::RParen, "')'")?;
        self.finish_node();
        Ok(())
    }

    fn parse_lambda(&mut self) -> ParseResult<()> {
        self.start_node(NodeKind::LambdaExpr);
        self.start_node(NodeKind::LambdaParams);
        if !self.match_token(Token::Identifier) {
            self.consume(Token::LParen, "'('")?;
            if !self.check(Token::RParen) {
                loop {
                    let inferred = self.check(Token::Identifier)
                        && matches!(self.peek_token_type(1), Some(Token::Comma | Token::RParen));
                    if inferred {
                        self.advance();
                    } else {
                        self.parse_formal_parameter()?;
                    }
                    if !self.match_token(Token::Comma) {
                        break;
                    }
                }
            }
            self.consume(Token::RParen, "')'")?;
        }
        self.finish_node();
        self.consume(Token::Arrow, "'->'")?;
        if self.check(Token::LBrace) {
            self.parse_block()?;
        } else {
            self.parse_expression()?;
        }
        self.finish_node();
        Ok(())
    }
}

/// Parse a compilation unit
pub fn parse(source: &str) -> ParseResult<SyntaxTree> {
    Parser::new(source)?.parse()
}

/// Parse a single statement into a `Fragment`-rooted tree
pub fn parse_fragment(source: &str) -> ParseResult<SyntaxTree> {
    Parser::new(source)?.parse_statement_fragment()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tree: &SyntaxTree) -> Vec<NodeKind> {
        tree.descendants(tree.root())
            .filter_map(|id| tree.node_kind(id))
            .collect()
    }

    #[test]
    fn test_round_trip_keeps_every_byte() {
        let source = "package a.b;\n\nimport java.util.*;\n\n// top\nclass A {\n    int[] xs = {1, 2};\n    void m() { for (int x : xs) { /* c */ use(x); } }\n}\n";
        let tree = parse(source).expect("parse");
        assert_eq!(tree.source(), source);
    }

    #[test]
    fn test_foreach_and_for_are_distinguished() {
        let tree = parse_fragment("for (String s : names) use(s);").expect("parse");
        assert!(kinds(&tree).contains(&NodeKind::ForEachStmt));
        let tree = parse_fragment("for (int i = 0; i < n; i++) use(i);").expect("parse");
        let found = kinds(&tree);
        assert!(found.contains(&NodeKind::ForStmt));
        assert!(!found.contains(&NodeKind::ForEachStmt));
    }

    #[test]
    fn test_nested_generics_split_shift() {
        let source = "Map<String, List<Integer>> m = new HashMap<>();";
        let tree = parse_fragment(source).expect("parse");
        assert_eq!(tree.source(), source);
        let statement = tree.fragment_statement().expect("one statement");
        assert!(tree.is_kind(statement, NodeKind::LocalVarDecl));
    }

    #[test]
    fn test_shift_operator_still_parses() {
        let tree = parse_fragment("x = a >> 2 >>> b;").expect("parse");
        assert!(kinds(&tree).contains(&NodeKind::BinaryExpr));
    }

    #[test]
    fn test_cast_and_parenthesized_expression() {
        let tree = parse_fragment("y = (String) o;").expect("parse");
        assert!(kinds(&tree).contains(&NodeKind::CastExpr));
        let tree = parse_fragment("y = (a) - b;").expect("parse");
        let found = kinds(&tree);
        assert!(found.contains(&NodeKind::ParenExpr));
        assert!(!found.contains(&NodeKind::CastExpr));
    }

    #[test]
    fn test_lambda_and_method_reference() {
        let tree = parse_fragment("list.forEach(x -> { print(x); });").expect("parse");
        assert!(kinds(&tree).contains(&NodeKind::LambdaExpr));
        let tree = parse_fragment("list.forEach(System.out::println);").expect("parse");
        assert!(kinds(&tree).contains(&NodeKind::MethodRef));
    }

    #[test]
    fn test_fragment_rejects_two_statements() {
        assert!(parse_fragment("a(); b();").is_err());
        assert!(parse_fragment("").is_err());
    }

    #[test]
    fn test_unbalanced_input_is_an_error() {
        assert!(parse("class A { void m() { for (int x : xs) { }").is_err());
    }

    #[test]
    fn test_trivia_attaches_outside_nodes() {
        let tree = parse_fragment("{ // lead\n  a(); // tail\n}").expect("parse");
        let block = tree.fragment_statement().expect("block");
        let statement = tree.child_of_kind(block, NodeKind::ExprStmt).expect("statement");
        assert_eq!(tree.text(statement), "a();");
    }
}
