use jrewrite::parser::lexer::Token;
use jrewrite::parser::Lexer;

#[test]
fn lexer_keywords() {
    let source = "public class Test extends Object implements Interface";
    let lexer = Lexer::new(source);
    let tokens = lexer.tokenize().expect("Failed to tokenize");

    assert_eq!(tokens.len(), 7);
    assert!(tokens[0].is(&Token::Public));
    assert!(tokens[1].is(&Token::Class));
    assert!(tokens[2].is(&Token::Identifier));
    assert!(tokens[3].is(&Token::Extends));
    assert!(tokens[4].is(&Token::Identifier));
    assert!(tokens[5].is(&Token::Implements));
    assert!(tokens[6].is(&Token::Identifier));
}

#[test]
fn lexer_operators() {
    let source = "+ - * / % = += -= *= /= %=";
    let lexer = Lexer::new(source);
    let tokens = lexer.tokenize().expect("Failed to tokenize");

    assert_eq!(tokens.len(), 11);
    assert!(tokens[0].is(&Token::Plus));
    assert!(tokens[1].is(&Token::Minus));
    assert!(tokens[2].is(&Token::Star));
    assert!(tokens[3].is(&Token::Slash));
    assert!(tokens[4].is(&Token::Percent));
    assert!(tokens[5].is(&Token::Assign));
    assert!(tokens[6].is(&Token::AddAssign));
    assert!(tokens[7].is(&Token::SubAssign));
    assert!(tokens[8].is(&Token::MulAssign));
    assert!(tokens[9].is(&Token::DivAssign));
    assert!(tokens[10].is(&Token::ModAssign));
}

#[test]
fn lexer_comments_are_skipped() {
    let source = "// This is a comment\n/* This is a block comment */";
    let lexer = Lexer::new(source);
    let tokens = lexer.tokenize().expect("Failed to tokenize");

    assert_eq!(tokens.len(), 0);
}

#[test]
fn lossless_tokens_rebuild_the_source() {
    let source = "for (String s : names) { // each\n    use(s); /* done */\n}\n";
    let tokens = Lexer::new(source).tokenize_lossless().expect("Failed to tokenize");

    let rebuilt: String = tokens.iter().map(|t| t.lexeme()).collect();
    assert_eq!(rebuilt, source);
    assert!(tokens.iter().any(|t| t.is(&Token::LineComment)));
    assert!(tokens.iter().any(|t| t.is(&Token::BlockComment)));
}

#[test]
fn foreach_header_tokens_and_locations() {
    let source = "for (int x : xs)\n  use(x);";
    let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

    let kinds: Vec<Token> = tokens.iter().map(|t| *t.token_type()).collect();
    assert_eq!(
        &kinds[..7],
        &[Token::For, Token::LParen, Token::Int, Token::Identifier, Token::Colon, Token::Identifier, Token::RParen]
    );
    let use_token = &tokens[7];
    assert_eq!(use_token.lexeme(), "use");
    assert_eq!((use_token.location().line, use_token.location().column), (2, 3));
}

#[test]
fn generic_closers_lex_as_shift_operators() {
    let tokens = Lexer::new("List<List<String>>").tokenize().expect("Failed to tokenize");
    assert!(tokens.last().map_or(false, |t| t.is(&Token::RShift)));
}

#[test]
fn text_blocks_lex_as_one_string() {
    let source = "String s = \"\"\"\n    hello \"world\" \\\"\"\"\n    \"\"\"\";\nint n;";
    let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

    assert!(tokens[3].is(&Token::StringLiteral));
    assert_eq!(tokens[3].lexeme(), "\"\"\"\n    hello \"world\" \\\"\"\"\n    \"\"\"\"");
    assert!(tokens[4].is(&Token::Semicolon));
    assert_eq!(tokens[5].lexeme(), "int");
    assert_eq!(tokens[5].location().line, 4);
}
