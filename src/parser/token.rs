//! Token definitions for Jack source
//!
//! Keywords and symbols are closed enumerations so that the parser can
//! dispatch with an exhaustive `match` rather than comparing strings.
//! The lookup tables mapping lexemes to variants are built once on first use
//! and never mutated afterwards.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    pub const ALL: [Keyword; 21] = [
        Keyword::Class,
        Keyword::Constructor,
        Keyword::Function,
        Keyword::Method,
        Keyword::Field,
        Keyword::Static,
        Keyword::Var,
        Keyword::Int,
        Keyword::Char,
        Keyword::Boolean,
        Keyword::Void,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
        Keyword::This,
        Keyword::Let,
        Keyword::Do,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Return,
    ];

    /// The lexeme as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Class => "class",
            Keyword::Constructor => "constructor",
            Keyword::Function => "function",
            Keyword::Method => "method",
            Keyword::Field => "field",
            Keyword::Static => "static",
            Keyword::Var => "var",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::Void => "void",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
            Keyword::Let => "let",
            Keyword::Do => "do",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Return => "return",
        }
    }

    pub fn from_lexeme(text: &str) -> Option<Keyword> {
        KEYWORDS.get(text).copied()
    }

    /// `true`, `false`, `null` and `this` may appear as a term.
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            Keyword::True | Keyword::False | Keyword::Null | Keyword::This
        )
    }

    /// Built-in type names usable in declarations (`void` excluded).
    pub fn is_primitive_type(self) -> bool {
        matches!(self, Keyword::Int | Keyword::Char | Keyword::Boolean)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-character symbols of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LBrace,    // {
    RBrace,    // }
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    Dot,       // .
    Comma,     // ,
    Semicolon, // ;
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Amp,       // &
    Pipe,      // |
    Lt,        // <
    Gt,        // >
    Eq,        // =
    Tilde,     // ~
    Caret,     // ^ (shift left)
    Hash,      // # (shift right)
}

impl Symbol {
    pub const ALL: [Symbol; 21] = [
        Symbol::LBrace,
        Symbol::RBrace,
        Symbol::LParen,
        Symbol::RParen,
        Symbol::LBracket,
        Symbol::RBracket,
        Symbol::Dot,
        Symbol::Comma,
        Symbol::Semicolon,
        Symbol::Plus,
        Symbol::Minus,
        Symbol::Star,
        Symbol::Slash,
        Symbol::Amp,
        Symbol::Pipe,
        Symbol::Lt,
        Symbol::Gt,
        Symbol::Eq,
        Symbol::Tilde,
        Symbol::Caret,
        Symbol::Hash,
    ];

    pub fn as_char(self) -> char {
        match self {
            Symbol::LBrace => '{',
            Symbol::RBrace => '}',
            Symbol::LParen => '(',
            Symbol::RParen => ')',
            Symbol::LBracket => '[',
            Symbol::RBracket => ']',
            Symbol::Dot => '.',
            Symbol::Comma => ',',
            Symbol::Semicolon => ';',
            Symbol::Plus => '+',
            Symbol::Minus => '-',
            Symbol::Star => '*',
            Symbol::Slash => '/',
            Symbol::Amp => '&',
            Symbol::Pipe => '|',
            Symbol::Lt => '<',
            Symbol::Gt => '>',
            Symbol::Eq => '=',
            Symbol::Tilde => '~',
            Symbol::Caret => '^',
            Symbol::Hash => '#',
        }
    }

    pub fn from_char(ch: char) -> Option<Symbol> {
        SYMBOLS.get(&ch).copied()
    }

    /// Operators allowed between two terms of an expression.
    pub fn is_binary_op(self) -> bool {
        matches!(
            self,
            Symbol::Plus
                | Symbol::Minus
                | Symbol::Star
                | Symbol::Slash
                | Symbol::Amp
                | Symbol::Pipe
                | Symbol::Lt
                | Symbol::Gt
                | Symbol::Eq
        )
    }

    /// Operators allowed in front of a term.
    pub fn is_unary_op(self) -> bool {
        matches!(
            self,
            Symbol::Minus | Symbol::Tilde | Symbol::Caret | Symbol::Hash
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, Keyword>> =
    Lazy::new(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect());

static SYMBOLS: Lazy<FxHashMap<char, Symbol>> =
    Lazy::new(|| Symbol::ALL.iter().map(|sym| (sym.as_char(), *sym)).collect());

/// Payload-free classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    IntegerConstant,
    StringConstant,
    Identifier,
}

impl TokenKind {
    /// Tag name used for leaf lines of the trace.
    pub fn tag(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Symbol => "symbol",
            TokenKind::IntegerConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
            TokenKind::Identifier => "identifier",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Classified lexeme. String constants hold their text without quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    Keyword(Keyword),
    Symbol(Symbol),
    IntegerConstant(u16),
    StringConstant(String),
    Identifier(String),
}

impl TokenValue {
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenValue::Keyword(_) => TokenKind::Keyword,
            TokenValue::Symbol(_) => TokenKind::Symbol,
            TokenValue::IntegerConstant(_) => TokenKind::IntegerConstant,
            TokenValue::StringConstant(_) => TokenKind::StringConstant,
            TokenValue::Identifier(_) => TokenKind::Identifier,
        }
    }

    /// Rendered text as it appears inside a leaf line.
    pub fn text(&self) -> String {
        match self {
            TokenValue::Keyword(kw) => kw.as_str().to_string(),
            TokenValue::Symbol(sym) => sym.as_char().to_string(),
            TokenValue::IntegerConstant(n) => n.to_string(),
            TokenValue::StringConstant(s) | TokenValue::Identifier(s) => {
                s.clone()
            }
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Keyword(kw) => write!(f, "keyword '{}'", kw),
            TokenValue::Symbol(sym) => write!(f, "symbol '{}'", sym),
            TokenValue::IntegerConstant(n) => write!(f, "integer constant {}", n),
            TokenValue::StringConstant(s) => write!(f, "string constant \"{}\"", s),
            TokenValue::Identifier(s) => write!(f, "identifier '{}'", s),
        }
    }
}

/// A token together with the source line it was read from.
///
/// The line only feeds diagnostics; it is never part of the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: TokenValue,
    pub line: usize,
}

impl Token {
    pub fn new(value: TokenValue, line: usize) -> Self {
        Self { value, line }
    }

    pub fn kind(&self) -> TokenKind {
        self.value.kind()
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.value == TokenValue::Symbol(symbol)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.value == TokenValue::Keyword(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on line {}", self.value, self.line)
    }
}
