//! Scanner (tokenizer) for Jack source
//!
//! Converts a whole source unit into a flat [`Token`] sequence up front, then
//! exposes an advance-only cursor over it for the parser.
//!
//! Scanning happens in three passes:
//! 1. block and documentation comments are removed (non-greedy, never nested),
//! 2. the text is split into lines, line comments are cut off and blank lines dropped,
//! 3. each surviving line is matched left to right against one combined pattern
//!    whose alternatives are tried in priority order: keyword, symbol, integer,
//!    string, identifier.
//!
//! Any non-whitespace text that none of the alternatives accepts is a
//! [`ScanError`]; scanning stops at the first one.

use super::constants::{BLOCK_COMMENT_OPEN, LINE_COMMENT, MAX_INT_CONSTANT, MAX_INT_DIGITS};
use super::token::{Keyword, Symbol, Token, TokenKind, TokenValue};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io::{self, Read};
use thiserror::Error;

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Alternatives are listed in priority order; the regex engine takes the
/// first alternative that matches, so keywords shadow identifiers.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    let integer = format!(r"|(?P<integer>[0-9]{{1,{}}})\b", MAX_INT_DIGITS);
    let pattern = [
        r"^(?:",
        r"\b(?P<keyword>class|constructor|function|method|field|static|var|int|char|boolean|void|true|false|null|this|let|do|if|else|while|return)\b",
        r"|(?P<symbol>[{}()\[\].,;+\-*/&|<>=~^#])",
        &integer,
        r#"|"(?P<string>[^"\n]*)""#,
        r"|(?P<identifier>[A-Za-z_][A-Za-z0-9_]*)",
        r")",
    ]
    .concat();
    Regex::new(&pattern).unwrap()
});

/// Lexical error type
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("line {line}: unrecognised text '{text}'")]
    Unrecognized { line: usize, text: String },

    #[error("line {line}: unterminated string constant {text}")]
    UnterminatedString { line: usize, text: String },

    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { line: usize },

    #[error("line {line}: integer constant {text} is larger than {max}", max = MAX_INT_CONSTANT)]
    IntegerOutOfRange { line: usize, text: String },

    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),
}

/// Eagerly tokenized source unit with a forward-only cursor.
#[derive(Debug, Clone)]
pub struct Scanner {
    tokens: Vec<Token>,
    /// `None` until the first `advance`.
    cursor: Option<usize>,
}

impl Scanner {
    /// Tokenize the given source text.
    pub fn new(source: &str) -> Result<Self, ScanError> {
        let text = strip_block_comments(source);

        let mut tokens = Vec::new();
        let mut line_count = 0;
        for (index, raw_line) in text.lines().enumerate() {
            let line = strip_line_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }
            line_count += 1;
            tokenize_line(line, index + 1, &mut tokens)?;
        }

        debug!(
            "scanned {} tokens from {} non-blank lines",
            tokens.len(),
            line_count
        );

        Ok(Self {
            tokens,
            cursor: None,
        })
    }

    /// Read the whole stream, release it, then tokenize.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScanError> {
        let source = read_all(reader)?;
        Self::new(&source)
    }

    /// Every token of the unit, in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the current token, `None` before the first `advance`.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn has_more_tokens(&self) -> bool {
        self.next_index() < self.tokens.len()
    }

    /// Move to the next token.
    ///
    /// Returns `false` and leaves the cursor where it was when the sequence
    /// is exhausted.
    pub fn advance(&mut self) -> bool {
        if !self.has_more_tokens() {
            return false;
        }
        self.cursor = Some(self.next_index());
        true
    }

    pub fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|i| self.tokens.get(i))
    }

    /// The token after the current one, without moving the cursor.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next_index())
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.current().map(Token::kind)
    }

    pub fn keyword_value(&self) -> Option<Keyword> {
        match self.current()?.value {
            TokenValue::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn symbol_value(&self) -> Option<Symbol> {
        match self.current()?.value {
            TokenValue::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn identifier_value(&self) -> Option<&str> {
        match &self.current()?.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn int_value(&self) -> Option<u16> {
        match self.current()?.value {
            TokenValue::IntegerConstant(n) => Some(n),
            _ => None,
        }
    }

    /// Payload of the current string constant, quotes removed.
    pub fn string_value(&self) -> Option<&str> {
        match &self.current()?.value {
            TokenValue::StringConstant(s) => Some(s),
            _ => None,
        }
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |i| i + 1)
    }
}

fn read_all<R: Read>(mut reader: R) -> Result<String, ScanError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(source)
}

/// Remove block comments, keeping the newlines they spanned so that line
/// numbers in diagnostics still match the source.
fn strip_block_comments(source: &str) -> String {
    BLOCK_COMMENT
        .replace_all(source, |caps: &Captures| {
            let newlines = caps[0].matches('\n').count();
            if newlines == 0 {
                " ".to_string()
            } else {
                "\n".repeat(newlines)
            }
        })
        .into_owned()
}

/// Cut the line at the first `//` that is not inside a string constant.
fn strip_line_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '/' if !in_string && line[i..].starts_with(LINE_COMMENT) => {
                return &line[..i];
            }
            _ => {}
        }
    }
    line
}

fn tokenize_line(
    line: &str,
    line_no: usize,
    tokens: &mut Vec<Token>,
) -> Result<(), ScanError> {
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if rest.starts_with(BLOCK_COMMENT_OPEN) {
            return Err(ScanError::UnterminatedComment { line: line_no });
        }

        let caps = match TOKEN.captures(rest) {
            Some(caps) => caps,
            None => return Err(unmatched(rest, line_no)),
        };

        tokens.push(Token::new(classify(&caps, line_no)?, line_no));

        let consumed = caps.get(0).map_or(0, |m| m.end());
        rest = rest[consumed..].trim_start();
    }

    Ok(())
}

fn classify(caps: &Captures, line_no: usize) -> Result<TokenValue, ScanError> {
    if let Some(m) = caps.name("keyword") {
        if let Some(kw) = Keyword::from_lexeme(m.as_str()) {
            return Ok(TokenValue::Keyword(kw));
        }
    }

    if let Some(m) = caps.name("symbol") {
        if let Some(sym) = m.as_str().chars().next().and_then(Symbol::from_char) {
            return Ok(TokenValue::Symbol(sym));
        }
    }

    if let Some(m) = caps.name("integer") {
        let text = m.as_str();
        return match text.parse::<u16>() {
            Ok(n) if n <= MAX_INT_CONSTANT => Ok(TokenValue::IntegerConstant(n)),
            _ => Err(ScanError::IntegerOutOfRange {
                line: line_no,
                text: text.to_string(),
            }),
        };
    }

    if let Some(m) = caps.name("string") {
        return Ok(TokenValue::StringConstant(m.as_str().to_string()));
    }

    match caps.name("identifier") {
        Some(m) => Ok(TokenValue::Identifier(m.as_str().to_string())),
        None => Err(ScanError::Unrecognized {
            line: line_no,
            text: caps[0].to_string(),
        }),
    }
}

fn unmatched(rest: &str, line_no: usize) -> ScanError {
    if rest.starts_with('"') {
        return ScanError::UnterminatedString {
            line: line_no,
            text: rest.to_string(),
        };
    }

    let text = rest.split_whitespace().next().unwrap_or(rest).to_string();
    ScanError::Unrecognized {
        line: line_no,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(source: &str) -> Vec<TokenValue> {
        Scanner::new(source)
            .unwrap()
            .tokens()
            .iter()
            .map(|t| t.value.clone())
            .collect()
    }

    #[test]
    fn test_let_statement_tokens() {
        let scanner = Scanner::new("let x = 1 ;").unwrap();
        let kinds: Vec<TokenKind> = scanner.tokens().iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Symbol,
                TokenKind::IntegerConstant,
                TokenKind::Symbol,
            ]
        );
        let texts: Vec<String> = scanner.tokens().iter().map(|t| t.value.text()).collect();
        assert_eq!(texts, vec!["let", "x", "=", "1", ";"]);
    }

    #[test]
    fn test_block_comments_are_elided() {
        assert_eq!(values("/* a */ class Foo { }"), values("class Foo { }"));
        assert_eq!(
            values("/** doc\n * more\n */\nclass Foo {\n/* x */ }"),
            values("class Foo { }")
        );
    }

    #[test]
    fn test_block_comment_keeps_line_numbers() {
        let scanner = Scanner::new("/* one\ntwo\n*/ class\nFoo").unwrap();
        let lines: Vec<usize> = scanner.tokens().iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_line_comment_outside_string_only() {
        assert_eq!(
            values("let s = \"http://x\"; // trailing"),
            vec![
                TokenValue::Keyword(Keyword::Let),
                TokenValue::Identifier("s".to_string()),
                TokenValue::Symbol(Symbol::Eq),
                TokenValue::StringConstant("http://x".to_string()),
                TokenValue::Symbol(Symbol::Semicolon),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(
            values("classy do_it iffy"),
            vec![
                TokenValue::Identifier("classy".to_string()),
                TokenValue::Identifier("do_it".to_string()),
                TokenValue::Identifier("iffy".to_string()),
            ]
        );
    }

    #[test]
    fn test_symbols_without_spaces() {
        assert_eq!(
            values("a[i]=~b;"),
            vec![
                TokenValue::Identifier("a".to_string()),
                TokenValue::Symbol(Symbol::LBracket),
                TokenValue::Identifier("i".to_string()),
                TokenValue::Symbol(Symbol::RBracket),
                TokenValue::Symbol(Symbol::Eq),
                TokenValue::Symbol(Symbol::Tilde),
                TokenValue::Identifier("b".to_string()),
                TokenValue::Symbol(Symbol::Semicolon),
            ]
        );
    }

    #[test]
    fn test_integer_bounds() {
        assert_eq!(values("32767"), vec![TokenValue::IntegerConstant(32767)]);
        assert_eq!(values("0"), vec![TokenValue::IntegerConstant(0)]);
        assert!(matches!(
            Scanner::new("32768"),
            Err(ScanError::IntegerOutOfRange { line: 1, .. })
        ));
        assert!(matches!(
            Scanner::new("123456"),
            Err(ScanError::Unrecognized { ref text, .. }) if text == "123456"
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            Scanner::new("let s = \"abc;\n"),
            Err(ScanError::UnterminatedString { line: 1, .. })
        ));
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(matches!(
            Scanner::new("class Foo {\n/* never closed\n}"),
            Err(ScanError::UnterminatedComment { line: 2 })
        ));
    }

    #[test]
    fn test_cursor_lifecycle() {
        let mut scanner = Scanner::new("do x \"hi\";").unwrap();
        assert_eq!(scanner.position(), None);
        assert_eq!(scanner.token_kind(), None);
        assert_eq!(scanner.peek().map(Token::kind), Some(TokenKind::Keyword));

        assert!(scanner.advance());
        assert_eq!(scanner.keyword_value(), Some(Keyword::Do));
        assert_eq!(scanner.symbol_value(), None);

        assert!(scanner.advance());
        assert_eq!(scanner.identifier_value(), Some("x"));
        assert_eq!(scanner.string_value(), None);
        assert!(scanner.advance());
        assert_eq!(scanner.string_value(), Some("hi"));
        assert_eq!(scanner.identifier_value(), None);
        assert!(scanner.advance());
        assert_eq!(scanner.symbol_value(), Some(Symbol::Semicolon));

        assert!(!scanner.has_more_tokens());
        assert!(!scanner.advance());
        assert_eq!(scanner.position(), Some(3));
    }

    #[test]
    fn test_empty_input() {
        let scanner = Scanner::new("  // only a comment\n/* and this */\n").unwrap();
        assert!(scanner.is_empty());
        assert!(!scanner.has_more_tokens());
    }

    #[test]
    fn test_from_reader() {
        let scanner = Scanner::from_reader("return \"done\";".as_bytes()).unwrap();
        assert_eq!(scanner.len(), 3);
        assert_eq!(
            scanner.tokens()[1].value,
            TokenValue::StringConstant("done".to_string())
        );
    }
}
