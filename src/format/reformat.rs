use crate::config::Config;
use crate::parser::lexer::{Lexer, Token};

/// One physical line of the statement being re-indented
#[derive(Debug, Default)]
struct Line {
    text: String,
    first: Option<Token>,
    last: Option<Token>,
    /// Braces open at the start of the line
    depth: usize,
    /// Innermost open delimiter at line start is a parenthesis
    in_parens: bool,
    /// Line continues a block comment started on an earlier line
    in_comment: bool,
}

impl Line {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn has_code(&self) -> bool {
        self.first.is_some()
    }
}

/// Line break used by `source`, judged by its first line
pub fn detect_line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(end) if source[..end].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Re-indent statement text so it can sit at `base_indent`
///
/// The first line is returned without indentation since it replaces text
/// that already starts at the statement's column. Following lines get
/// `base_indent` plus one indent unit per open brace and are joined with
/// `line_ending`. Runs of blank lines collapse to one, blank lines directly
/// inside braces are dropped and trailing whitespace is trimmed. Text that
/// does not lex is returned as is.
pub fn reformat_statement(text: &str, base_indent: &str, line_ending: &str, config: &Config) -> String {
    let Some(lines) = split_lines(text) else {
        return text.to_string();
    };
    let unit = config.indent_unit();

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut case_active: Vec<bool> = Vec::new();
    let mut previous_code: Option<&Line> = None;
    let mut pending_blank = false;

    for (index, line) in lines.iter().enumerate() {
        if line.is_blank() {
            pending_blank = index > 0;
            continue;
        }
        let content = line.text.trim();

        let mut level = line.depth;
        if line.first == Some(Token::RBrace) {
            level = level.saturating_sub(1);
            case_active.truncate(level + 1);
        }

        let is_case_label = matches!(line.first, Some(Token::Case | Token::Default))
            && line.last == Some(Token::Colon);
        let case_extra = case_active
            .iter()
            .enumerate()
            .take(level + 1)
            .filter(|&(d, &active)| active && !(is_case_label && d == level))
            .count();
        if is_case_label {
            if case_active.len() <= level {
                case_active.resize(level + 1, false);
            }
            case_active[level] = true;
        }

        let continuation = !line.in_comment
            && line.has_code()
            && (line.in_parens || previous_code.map_or(false, |prev| continues(prev, line)));

        if pending_blank
            && !out.is_empty()
            && previous_code.map_or(true, |prev| prev.last != Some(Token::LBrace))
            && line.first != Some(Token::RBrace)
        {
            out.push(String::new());
        }
        pending_blank = false;

        if index == 0 {
            out.push(content.to_string());
        } else {
            let mut indented = String::from(base_indent);
            for _ in 0..(level + case_extra + usize::from(continuation)) {
                indented.push_str(&unit);
            }
            if line.in_comment && content.starts_with('*') {
                indented.push(' ');
            }
            indented.push_str(content);
            out.push(indented);
        }

        if line.has_code() {
            previous_code = Some(line);
        }
    }

    out.join(line_ending)
}

/// Whether `line` continues the statement that `prev` left open
fn continues(prev: &Line, line: &Line) -> bool {
    if line.first == Some(Token::LBrace) {
        return false;
    }
    let annotation_only = prev.first == Some(Token::At)
        && matches!(prev.last, Some(Token::Identifier | Token::RParen));
    if annotation_only {
        return false;
    }
    !matches!(
        prev.last,
        None | Some(Token::Semicolon | Token::LBrace | Token::RBrace | Token::Colon)
    )
}

fn split_lines(text: &str) -> Option<Vec<Line>> {
    let tokens = Lexer::new(text).tokenize_lossless().ok()?;
    let mut lines = Vec::new();
    let mut current = Line::default();
    let mut open: Vec<Token> = Vec::new();

    for token in &tokens {
        let kind = token.token;
        if kind == Token::Whitespace || kind == Token::BlockComment {
            let mut pieces = token.lexeme().split('\n');
            if let Some(first) = pieces.next() {
                current.text.push_str(first);
            }
            for piece in pieces {
                let depth = open.iter().filter(|&&t| t == Token::LBrace).count();
                let in_parens = open.last() == Some(&Token::LParen);
                let finished = std::mem::take(&mut current);
                lines.push(finished);
                current.depth = depth;
                current.in_parens = in_parens;
                current.in_comment = kind == Token::BlockComment;
                current.text.push_str(piece.trim_end_matches('\r'));
            }
            continue;
        }

        current.text.push_str(token.lexeme());
        if kind.is_trivia() {
            continue;
        }
        if current.first.is_none() {
            current.first = Some(kind);
        }
        current.last = Some(kind);
        match kind {
            Token::LBrace | Token::LParen => open.push(kind),
            Token::RBrace | Token::RParen => {
                open.pop();
            }
            _ => {}
        }
    }
    lines.push(current);

    for line in &mut lines {
        let trimmed = line.text.trim_end().to_string();
        line.text = trimmed;
    }
    Some(lines)
}
