//! Expression parsing implementation
//!
//! Expressions have no precedence: a term followed by any number of
//! `op term` pairs, all binding equally from left to right.
//!
//! # Grammar
//!
//! ```text
//! expression     ::= term (op term)*
//! term           ::= integerConstant | stringConstant | keywordConstant
//!                  | varName | varName "[" expression "]" | subroutineCall
//!                  | "(" expression ")" | unaryOp term
//! subroutineCall ::= subroutineName "(" expressionList ")"
//!                  | (className | varName) "." subroutineName "(" expressionList ")"
//! expressionList ::= (expression ("," expression)*)?
//! op             ::= "+" | "-" | "*" | "/" | "&" | "|" | "<" | ">" | "="
//! unaryOp        ::= "-" | "~" | "^" | "#"
//! ```
//!
//! An identifier is the only ambiguous term start. The token after it picks
//! the form: `[` an array access, `(` or `.` a call, anything else a plain
//! variable, in which case that next token is left for the caller.

use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::{Symbol, TokenValue};
use crate::trace::{Nonterminal, TraceSink};

/// What the current token opens when it starts a term.
enum TermStart {
    /// Integer, string or keyword constant; a single leaf.
    Constant,
    Identifier,
    Group,
    Unary,
    Invalid,
}

impl<S: TraceSink> Parser<'_, S> {
    pub fn compile_expression(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::Expression)?;

        self.compile_term()?;
        while matches!(self.current_symbol(), Some(sym) if sym.is_binary_op()) {
            self.emit_current("operator")?;
            self.compile_term()?;
        }

        self.close(Nonterminal::Expression)
    }

    /// Parse one term. Groups and unary operators nest further terms, so
    /// each term counts as a nesting level.
    pub fn compile_term(&mut self) -> Result<(), ParseError> {
        self.nested(Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::Term)?;

        let start = match self.current().map(|t| &t.value) {
            Some(TokenValue::IntegerConstant(_)) | Some(TokenValue::StringConstant(_)) => {
                TermStart::Constant
            }
            Some(TokenValue::Keyword(kw)) if kw.is_constant() => TermStart::Constant,
            Some(TokenValue::Identifier(_)) => TermStart::Identifier,
            Some(TokenValue::Symbol(Symbol::LParen)) => TermStart::Group,
            Some(TokenValue::Symbol(sym)) if sym.is_unary_op() => TermStart::Unary,
            _ => TermStart::Invalid,
        };

        match start {
            TermStart::Constant => self.emit_current("constant")?,
            TermStart::Identifier => self.compile_identifier_term()?,
            TermStart::Group => {
                self.emit_current("'('")?;
                self.compile_expression()?;
                self.expect_symbol(Symbol::RParen, "to close parenthesised expression")?;
            }
            TermStart::Unary => {
                self.emit_current("unary operator")?;
                self.compile_term()?;
            }
            TermStart::Invalid => return Err(self.error("term")),
        }

        self.close(Nonterminal::Term)
    }

    /// Parse a possibly empty argument list, without its parentheses.
    ///
    /// Returns the number of expressions in the list.
    pub fn compile_expression_list(&mut self) -> Result<usize, ParseError> {
        self.open(Nonterminal::ExpressionList)?;

        let mut count = 0;
        if !self.check_symbol(Symbol::RParen) {
            self.compile_expression()?;
            count += 1;

            while self.check_symbol(Symbol::Comma) {
                self.emit_current("','")?;
                self.compile_expression()?;
                count += 1;
            }
        }

        self.close(Nonterminal::ExpressionList)?;
        Ok(count)
    }

    /// Parse `name(args)` or `qualifier.name(args)`. Calls have no tag of
    /// their own; their tokens land in the enclosing term or do statement.
    pub fn compile_subroutine_call(&mut self) -> Result<(), ParseError> {
        self.expect_identifier("subroutine, class or variable name")?;

        if self.check_symbol(Symbol::Dot) {
            self.emit_current("'.'")?;
            self.expect_identifier("subroutine name after '.'")?;
            self.expect_symbol(Symbol::LParen, "after subroutine name")?;
        } else if self.check_symbol(Symbol::LParen) {
            self.emit_current("'('")?;
        } else {
            return Err(self.error("'(' or '.' after subroutine name"));
        }

        self.compile_expression_list()?;
        self.expect_symbol(Symbol::RParen, "after argument list")
    }

    /// Identifier term: decided by one token of lookahead.
    fn compile_identifier_term(&mut self) -> Result<(), ParseError> {
        let next = match self.peek().map(|t| &t.value) {
            Some(TokenValue::Symbol(sym)) => Some(*sym),
            _ => None,
        };

        match next {
            Some(Symbol::LBracket) => {
                self.emit_current("array name")?;
                self.emit_current("'['")?;
                self.compile_expression()?;
                self.expect_symbol(Symbol::RBracket, "after array index")
            }
            Some(Symbol::LParen) | Some(Symbol::Dot) => self.compile_subroutine_call(),
            _ => self.emit_current("variable name"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::constants::MAX_NESTING;
    use crate::parser::parse::{ParseError, Parser};
    use crate::parser::scanner::Scanner;
    use crate::parser::token::{Symbol, TokenValue};
    use crate::trace::{render, Nonterminal, TraceEvent, TraceOptions};

    fn expression(source: &str) -> Result<Vec<TraceEvent>, ParseError> {
        let mut scanner = Scanner::new(source).unwrap();
        let mut parser = Parser::new(&mut scanner, Vec::<TraceEvent>::new());
        parser.compile_expression()?;
        Ok(parser.into_sink())
    }

    #[test]
    fn test_operators_are_flat() {
        let events = expression("1 + 2 * 3").unwrap();
        // One expression, three sibling terms: no precedence nesting.
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == TraceEvent::Open(Nonterminal::Expression))
                .count(),
            1
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == TraceEvent::Open(Nonterminal::Term))
                .count(),
            3
        );
    }

    #[test]
    fn test_unary_nests_a_term() {
        let out = render(&expression("-~x").unwrap(), &TraceOptions::default());
        assert_eq!(
            out,
            "<expression>\n\
             <term>\n\
             <symbol> - </symbol>\n\
             <term>\n\
             <symbol> ~ </symbol>\n\
             <term>\n\
             <identifier> x </identifier>\n\
             </term>\n\
             </term>\n\
             </term>\n\
             </expression>\n"
        );
    }

    #[test]
    fn test_keyword_constant_and_group() {
        let events = expression("(true | null)").unwrap();
        assert!(events.contains(&TraceEvent::Leaf(TokenValue::Symbol(Symbol::Pipe))));
        assert_eq!(events.len(), 15);
    }

    #[test]
    fn test_non_constant_keyword_rejected() {
        let err = expression("void").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: expected term, found keyword 'void'"
        );
    }

    #[test]
    fn test_unary_chain_is_bounded() {
        let source = format!("{}x", "-".repeat(MAX_NESTING + 1));
        let err = expression(&source).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("line 1: nesting deeper than {} levels", MAX_NESTING)
        );
        assert!(expression(&format!("{}x", "~".repeat(MAX_NESTING - 1))).is_ok());
    }

    #[test]
    fn test_argument_count() {
        let mut scanner = Scanner::new("a, b + 1, \"s\")").unwrap();
        let mut parser = Parser::new(&mut scanner, Vec::<TraceEvent>::new());
        assert_eq!(parser.compile_expression_list().unwrap(), 3);

        let mut scanner = Scanner::new(")").unwrap();
        let mut parser = Parser::new(&mut scanner, Vec::<TraceEvent>::new());
        assert_eq!(parser.compile_expression_list().unwrap(), 0);
    }
}
