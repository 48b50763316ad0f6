//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statements      ::= statement*
//! statement       ::= letStatement | ifStatement | whileStatement
//!                   | doStatement | returnStatement
//! letStatement    ::= "let" varName ("[" expression "]")? "=" expression ";"
//! ifStatement     ::= "if" "(" expression ")" "{" statements "}"
//!                     ("else" "{" statements "}")?
//! whileStatement  ::= "while" "(" expression ")" "{" statements "}"
//! doStatement     ::= "do" subroutineCall ";"
//! returnStatement ::= "return" expression? ";"
//! ```
//!
//! The statement sequence ends at the first token that does not introduce a
//! statement; deciding whether that token is acceptable is up to the caller.

use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::{Keyword, Symbol};
use crate::trace::{Nonterminal, TraceSink};

impl<S: TraceSink> Parser<'_, S> {
    /// Parse zero or more statements, not including the enclosing braces.
    pub fn compile_statements(&mut self) -> Result<(), ParseError> {
        self.nested(Self::parse_statements)
    }

    fn parse_statements(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::Statements)?;

        while let Some(kw) = self.current_keyword() {
            match kw {
                Keyword::Let => self.compile_let()?,
                Keyword::If => self.compile_if()?,
                Keyword::While => self.compile_while()?,
                Keyword::Do => self.compile_do()?,
                Keyword::Return => self.compile_return()?,
                _ => break,
            }
        }

        self.close(Nonterminal::Statements)
    }

    pub fn compile_let(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::LetStatement)?;

        self.expect_keyword(Keyword::Let, "to start a let statement")?;
        self.expect_identifier("variable name after 'let'")?;

        if self.check_symbol(Symbol::LBracket) {
            self.emit_current("'['")?;
            self.compile_expression()?;
            self.expect_symbol(Symbol::RBracket, "after array index")?;
        }

        self.expect_symbol(Symbol::Eq, "in let statement")?;
        self.compile_expression()?;
        self.expect_symbol(Symbol::Semicolon, "after let statement")?;

        self.close(Nonterminal::LetStatement)
    }

    /// Parse an if statement with an optional else clause.
    pub fn compile_if(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::IfStatement)?;

        self.expect_keyword(Keyword::If, "to start an if statement")?;
        self.compile_condition("'if'")?;
        self.compile_block("if")?;

        if self.check_keyword(Keyword::Else) {
            self.emit_current("'else'")?;
            self.compile_block("else")?;
        }

        self.close(Nonterminal::IfStatement)
    }

    pub fn compile_while(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::WhileStatement)?;

        self.expect_keyword(Keyword::While, "to start a while statement")?;
        self.compile_condition("'while'")?;
        self.compile_block("while")?;

        self.close(Nonterminal::WhileStatement)
    }

    pub fn compile_do(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::DoStatement)?;

        self.expect_keyword(Keyword::Do, "to start a do statement")?;
        self.compile_subroutine_call()?;
        self.expect_symbol(Symbol::Semicolon, "after do statement")?;

        self.close(Nonterminal::DoStatement)
    }

    pub fn compile_return(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::ReturnStatement)?;

        self.expect_keyword(Keyword::Return, "to start a return statement")?;
        if !self.check_symbol(Symbol::Semicolon) {
            self.compile_expression()?;
        }
        self.expect_symbol(Symbol::Semicolon, "after return")?;

        self.close(Nonterminal::ReturnStatement)
    }

    /// `( expression )` after `if` / `while`
    fn compile_condition(&mut self, after: &str) -> Result<(), ParseError> {
        self.expect_symbol(Symbol::LParen, &format!("after {}", after))?;
        self.compile_expression()?;
        self.expect_symbol(Symbol::RParen, "after condition")
    }

    /// `{ statements }`
    fn compile_block(&mut self, owner: &str) -> Result<(), ParseError> {
        self.expect_symbol(Symbol::LBrace, &format!("to open {} block", owner))?;
        self.compile_statements()?;
        self.expect_symbol(Symbol::RBrace, &format!("to close {} block", owner))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse::{ParseError, Parser};
    use crate::parser::scanner::Scanner;
    use crate::trace::{render, TraceEvent, TraceOptions};

    fn statements(source: &str) -> Result<String, ParseError> {
        let mut scanner = Scanner::new(source).unwrap();
        let mut parser = Parser::new(&mut scanner, Vec::<TraceEvent>::new());
        parser.compile_statements()?;
        Ok(render(&parser.into_sink(), &TraceOptions::default()))
    }

    #[test]
    fn test_zero_statements() {
        assert_eq!(statements("}").unwrap(), "<statements>\n</statements>\n");
    }

    #[test]
    fn test_let_with_index() {
        let out = statements("let a[i] = 1;").unwrap();
        assert_eq!(
            out,
            "<statements>\n\
             <letStatement>\n\
             <keyword> let </keyword>\n\
             <identifier> a </identifier>\n\
             <symbol> [ </symbol>\n\
             <expression>\n\
             <term>\n\
             <identifier> i </identifier>\n\
             </term>\n\
             </expression>\n\
             <symbol> ] </symbol>\n\
             <symbol> = </symbol>\n\
             <expression>\n\
             <term>\n\
             <integerConstant> 1 </integerConstant>\n\
             </term>\n\
             </expression>\n\
             <symbol> ; </symbol>\n\
             </letStatement>\n\
             </statements>\n"
        );
    }

    #[test]
    fn test_if_else_and_while_nest() {
        let out = statements(
            "if (x) { while (y) { do f(); } } else { return; }",
        )
        .unwrap();
        assert_eq!(out.matches("<statements>").count(), 4);
        assert!(out.contains("<keyword> else </keyword>"));
        assert!(out.contains("<whileStatement>"));
        assert!(out.contains("<doStatement>"));
    }

    #[test]
    fn test_return_without_value() {
        let out = statements("return;").unwrap();
        assert!(!out.contains("<expression>"));
    }

    #[test]
    fn test_else_is_not_a_statement() {
        // A stray keyword simply ends the sequence.
        let out = statements("return; else").unwrap();
        assert!(out.ends_with("</returnStatement>\n</statements>\n"));
    }

    #[test]
    fn test_do_requires_a_call() {
        let err = statements("do x;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: expected '(' or '.' after subroutine name, found symbol ';'"
        );
    }

    #[test]
    fn test_missing_semicolon() {
        let err = statements("let x = 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
    }
}
