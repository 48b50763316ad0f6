//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token helpers, and trace emission helpers.
//!
//! # Parser Architecture
//!
//! The Parser walks the grammar top-down, one routine per nonterminal:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: class, member and subroutine declarations
//! - `statements`: the five statement kinds
//! - `expressions`: expressions, terms and subroutine calls
//!
//! Every routine follows the same shape: open its tag, consume its terminals
//! and nonterminals in grammar order (advancing after each emitted terminal),
//! then close its tag. A routine never consumes a terminal that belongs to its
//! caller, such as the parenthesis around a parameter list.
//!
//! # Nesting
//!
//! Parenthesised groups, unary chains and nested blocks recurse on the call
//! stack. Each term and each statement sequence counts one level, and input
//! nested deeper than [`MAX_NESTING`] levels fails with
//! [`ParseError::TooDeep`] instead of exhausting the stack.

use crate::parser::constants::MAX_NESTING;
use crate::parser::scanner::Scanner;
use crate::parser::token::{Keyword, Symbol, Token};
use crate::trace::{Nonterminal, TraceEvent, TraceSink};
use log::trace;
use std::io;
use thiserror::Error;

/// Grammar error type
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: String },

    #[error("line {line}: expected end of input after class, found {found}")]
    TrailingInput { found: String, line: usize },

    #[error("line {line}: nesting deeper than {limit} levels")]
    TooDeep { line: usize, limit: usize },

    #[error("failed to emit trace: {0}")]
    Emit(#[from] io::Error),
}

/// Recursive descent parser for Jack classes.
///
/// Reads tokens through the scanner's cursor and emits trace events to `S`.
pub struct Parser<'a, S: TraceSink> {
    scanner: &'a mut Scanner,
    sink: S,
    /// Set once the parser tried to move past the last token.
    exhausted: bool,
    depth: usize,
}

impl<'a, S: TraceSink> Parser<'a, S> {
    /// Create a parser and move the scanner onto its first token.
    pub fn new(scanner: &'a mut Scanner, sink: S) -> Self {
        let exhausted = !scanner.advance();
        Self {
            scanner,
            sink,
            exhausted,
            depth: 0,
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // ===== Token helpers =====

    /// The token under the cursor, `None` once input is exhausted.
    pub fn current(&self) -> Option<&Token> {
        if self.exhausted {
            None
        } else {
            self.scanner.current()
        }
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        if self.exhausted {
            None
        } else {
            self.scanner.peek()
        }
    }

    pub(crate) fn current_keyword(&self) -> Option<Keyword> {
        if self.exhausted {
            None
        } else {
            self.scanner.keyword_value()
        }
    }

    pub(crate) fn current_symbol(&self) -> Option<Symbol> {
        if self.exhausted {
            None
        } else {
            self.scanner.symbol_value()
        }
    }

    pub(crate) fn check_symbol(&self, symbol: Symbol) -> bool {
        self.current().is_some_and(|t| t.is_symbol(symbol))
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_some_and(|t| t.is_keyword(keyword))
    }

    pub(crate) fn check_identifier(&self) -> bool {
        !self.exhausted && self.scanner.identifier_value().is_some()
    }

    pub(crate) fn advance(&mut self) {
        if !self.scanner.advance() {
            self.exhausted = true;
        }
    }

    /// Run `f` one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            if let Some(token) = self.current() {
                return Err(ParseError::TooDeep {
                    line: token.line,
                    limit: MAX_NESTING,
                });
            }
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ===== Trace helpers =====

    pub(crate) fn open(&mut self, nt: Nonterminal) -> Result<(), ParseError> {
        trace!("open <{}>", nt);
        self.sink.emit(TraceEvent::Open(nt))?;
        Ok(())
    }

    pub(crate) fn close(&mut self, nt: Nonterminal) -> Result<(), ParseError> {
        trace!("close </{}>", nt);
        self.sink.emit(TraceEvent::Close(nt))?;
        Ok(())
    }

    /// Emit the current token as a leaf and move past it.
    pub(crate) fn emit_current(&mut self, expected: &str) -> Result<(), ParseError> {
        let event = match self.current() {
            Some(token) => TraceEvent::leaf(token),
            None => return Err(self.error(expected)),
        };
        self.sink.emit(event)?;
        self.advance();
        Ok(())
    }

    // ===== Expectation helpers =====

    /// Build the error for a mismatch at the current position.
    pub(crate) fn error(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::Unexpected {
                expected: expected.to_string(),
                found: token.value.to_string(),
                line: token.line,
            },
            None => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    pub(crate) fn expect_symbol(
        &mut self,
        symbol: Symbol,
        ctx: &str,
    ) -> Result<(), ParseError> {
        if self.check_symbol(symbol) {
            self.emit_current(ctx)
        } else {
            Err(self.error(&format!("'{}' {}", symbol, ctx)))
        }
    }

    pub(crate) fn expect_keyword(
        &mut self,
        keyword: Keyword,
        ctx: &str,
    ) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.emit_current(ctx)
        } else {
            Err(self.error(&format!("'{}' {}", keyword, ctx)))
        }
    }

    /// Consume one keyword from `allowed` and report which one it was.
    pub(crate) fn expect_keyword_of(
        &mut self,
        allowed: &[Keyword],
        what: &str,
    ) -> Result<Keyword, ParseError> {
        match self.current_keyword() {
            Some(kw) if allowed.contains(&kw) => {
                self.emit_current(what)?;
                Ok(kw)
            }
            _ => Err(self.error(what)),
        }
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> Result<(), ParseError> {
        if self.check_identifier() {
            self.emit_current(what)
        } else {
            Err(self.error(what))
        }
    }

    /// Fail if anything follows the unit.
    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        match self.current() {
            Some(token) => Err(ParseError::TrailingInput {
                found: token.value.to_string(),
                line: token.line,
            }),
            None => Ok(()),
        }
    }
}
