use logos::Logos;
use super::span::Location;

/// Token types for Java source
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("abstract")]
    Abstract,
    #[token("final")]
    Final,
    #[token("native")]
    Native,
    #[token("synchronized")]
    Synchronized,
    #[token("transient")]
    Transient,
    #[token("volatile")]
    Volatile,
    #[token("strictfp")]
    Strictfp,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("super")]
    Super,
    #[token("instanceof")]
    InstanceOf,
    #[token("void")]
    Void,
    #[token("boolean")]
    Boolean,
    #[token("byte")]
    Byte,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("char")]
    Char,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("throws")]
    Throws,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Operators
    #[token("=")]
    Assign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("%=")]
    ModAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("<<=")]
    LShiftAssign,
    #[token(">>=")]
    RShiftAssign,
    #[token(">>>=")]
    URShiftAssign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token(">>>")]
    URShift,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    PipePipe,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("::")]
    DoubleColon,
    #[token("->")]
    Arrow,

    // Separators
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,

    // Literals
    #[regex(r#""([^"\\\n]|\\u[0-9a-fA-F]{4}|\\.)*""#)]
    #[token("\"\"\"", text_block)]
    StringLiteral,
    #[regex(r"'([^'\\\n]|\\u[0-9a-fA-F]{4}|\\.)'")]
    CharLiteral,
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"0[bB][01_]+[lL]?")]
    #[regex(r"[0-9][0-9_]*[lL]?")]
    IntegerLiteral,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    FloatLiteral,

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Identifier,

    // Comments and whitespace are kept: the syntax tree is lossless
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r\f]+", priority = 2)]
    Whitespace,

    // Unicode BOM (Byte Order Mark) - treat as ignorable whitespace
    #[token("\u{FEFF}")]
    Bom,
}

/// Consume a text block up to and including its closing `"""`
///
/// A run of more than three quotes closes on its last three.
fn text_block(lex: &mut logos::Lexer<Token>) -> bool {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' if rest[i..].starts_with("\"\"\"") => {
                let mut end = i + 3;
                while bytes.get(end) == Some(&b'"') {
                    end += 1;
                }
                lex.bump(end);
                return true;
            }
            _ => i += 1,
        }
    }
    false
}

impl Token {
    /// Whitespace, comments and the BOM carry no syntax
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Bom | Token::LineComment | Token::BlockComment)
    }

    /// Check if this token is a comment
    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }

    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self,
            Token::Package | Token::Import | Token::Static |
            Token::Public | Token::Protected | Token::Private |
            Token::Abstract | Token::Final | Token::Native |
            Token::Synchronized | Token::Transient | Token::Volatile |
            Token::Strictfp | Token::Default | Token::Class | Token::Interface |
            Token::Enum | Token::Extends | Token::Implements |
            Token::New | Token::This | Token::Super |
            Token::InstanceOf | Token::Void | Token::Boolean |
            Token::Byte | Token::Short | Token::Int |
            Token::Long | Token::Char | Token::Float |
            Token::Double | Token::If | Token::Else |
            Token::For | Token::While | Token::Do |
            Token::Switch | Token::Case | Token::Assert |
            Token::Break | Token::Continue | Token::Return |
            Token::Throw | Token::Throws | Token::Try |
            Token::Catch | Token::Finally | Token::True |
            Token::False | Token::Null
        )
    }

    /// Check if this token is a modifier
    pub fn is_modifier(&self) -> bool {
        matches!(self,
            Token::Public | Token::Protected | Token::Private |
            Token::Abstract | Token::Final | Token::Native |
            Token::Synchronized | Token::Transient | Token::Volatile |
            Token::Static | Token::Strictfp | Token::Default
        )
    }

    /// Check if this token is a primitive type
    pub fn is_primitive_type(&self) -> bool {
        matches!(self,
            Token::Boolean | Token::Byte | Token::Short |
            Token::Int | Token::Long | Token::Char |
            Token::Float | Token::Double | Token::Void
        )
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self,
            Token::StringLiteral | Token::CharLiteral |
            Token::IntegerLiteral | Token::FloatLiteral |
            Token::True | Token::False | Token::Null
        )
    }

    /// Check if this token is an assignment operator
    pub fn is_assignment_operator(&self) -> bool {
        matches!(self,
            Token::Assign | Token::AddAssign | Token::SubAssign |
            Token::MulAssign | Token::DivAssign | Token::ModAssign |
            Token::AndAssign | Token::OrAssign | Token::XorAssign |
            Token::LShiftAssign | Token::RShiftAssign | Token::URShiftAssign
        )
    }
}

/// Lexical token with location information
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, location: Location) -> Self {
        Self { token, lexeme, location }
    }

    /// Get the token type
    pub fn token_type(&self) -> &Token {
        &self.token
    }

    /// Get the lexeme (actual text)
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Get the location
    pub fn location(&self) -> Location {
        self.location
    }

    /// Check if this token matches the given token type
    pub fn is(&self, token_type: &Token) -> bool {
        self.token == *token_type
    }
}

/// Lexer for Java source
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    current_line: usize,
    current_column: usize,
    current_offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            current_line: 1,
            current_column: 1,
            current_offset: 0,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<LexicalToken, String>> {
        let token = self.lexer.next()?;
        let lexeme = self.lexer.slice().to_string();
        let location = Location::new(self.current_line, self.current_column, self.current_offset);

        match token {
            Ok(token) => {
                self.update_position(&lexeme);
                Some(Ok(LexicalToken::new(token, lexeme, location)))
            }
            Err(_) => {
                self.update_position(&lexeme);
                Some(Err(format!(
                    "unexpected character sequence '{}' at {}:{}",
                    lexeme.escape_debug(),
                    location.line,
                    location.column
                )))
            }
        }
    }

    /// Update the current position based on the lexeme
    fn update_position(&mut self, lexeme: &str) {
        for ch in lexeme.chars() {
            if ch == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
            self.current_offset += ch.len_utf8();
        }
    }

    /// All significant tokens; whitespace, BOM and comments are skipped
    pub fn tokenize(self) -> Result<Vec<LexicalToken>, String> {
        Ok(self
            .tokenize_lossless()?
            .into_iter()
            .filter(|token| !token.token.is_trivia())
            .collect())
    }

    /// Every token including trivia; concatenating the lexemes yields the source
    pub fn tokenize_lossless(mut self) -> Result<Vec<LexicalToken>, String> {
        let mut tokens = Vec::new();
        while let Some(result) = self.next_token() {
            tokens.push(result?);
        }
        Ok(tokens)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<LexicalToken, String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
