//! Declaration parsing implementation
//!
//! This module handles the class-level structure of a unit:
//!
//! - The class itself: `class Name { ... }`
//! - Class variables: `static int a, b;` / `field Point p;`
//! - Subroutines: `constructor`, `function`, `method`
//! - Parameter lists, subroutine bodies and local `var` declarations
//!
//! # Grammar
//!
//! ```text
//! class          ::= "class" className "{" classVarDec* subroutineDec* "}"
//! classVarDec    ::= ("static" | "field") type varName ("," varName)* ";"
//! type           ::= "int" | "char" | "boolean" | className
//! subroutineDec  ::= ("constructor" | "function" | "method") ("void" | type)
//!                    subroutineName "(" parameterList ")" subroutineBody
//! parameterList  ::= ((type varName) ("," type varName)*)?
//! subroutineBody ::= "{" varDec* statements "}"
//! varDec         ::= "var" type varName ("," varName)* ";"
//! ```
//!
//! All parsing methods are implemented as `pub` methods on the [`Parser`] struct.

use crate::parser::parse::{ParseError, Parser};
use crate::parser::token::{Keyword, Symbol};
use crate::trace::{Nonterminal, TraceSink};

const CLASS_VAR_KINDS: [Keyword; 2] = [Keyword::Static, Keyword::Field];

const SUBROUTINE_KINDS: [Keyword; 3] =
    [Keyword::Constructor, Keyword::Function, Keyword::Method];

impl<S: TraceSink> Parser<'_, S> {
    /// Parse a complete class. The unit must end with its closing brace.
    pub fn compile_class(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::Class)?;

        self.expect_keyword(Keyword::Class, "to start the unit")?;
        self.expect_identifier("class name")?;
        self.expect_symbol(Symbol::LBrace, "after class name")?;

        while matches!(self.current_keyword(), Some(kw) if CLASS_VAR_KINDS.contains(&kw)) {
            self.compile_class_var_dec()?;
        }

        while matches!(self.current_keyword(), Some(kw) if SUBROUTINE_KINDS.contains(&kw)) {
            self.compile_subroutine()?;
        }

        self.expect_symbol(
            Symbol::RBrace,
            "or a member declaration in class body",
        )?;
        self.expect_end()?;

        self.close(Nonterminal::Class)
    }

    /// Parse a `static` or `field` declaration.
    pub fn compile_class_var_dec(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::ClassVarDec)?;

        self.expect_keyword_of(&CLASS_VAR_KINDS, "'static' or 'field'")?;
        self.compile_type()?;
        self.compile_var_names("after class variable declaration")?;

        self.close(Nonterminal::ClassVarDec)
    }

    /// Parse a constructor, function or method, including its body.
    pub fn compile_subroutine(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::SubroutineDec)?;

        self.expect_keyword_of(
            &SUBROUTINE_KINDS,
            "'constructor', 'function' or 'method'",
        )?;
        if self.check_keyword(Keyword::Void) {
            self.emit_current("'void'")?;
        } else {
            self.compile_type()?;
        }
        self.expect_identifier("subroutine name")?;

        self.expect_symbol(Symbol::LParen, "after subroutine name")?;
        self.compile_parameter_list()?;
        self.expect_symbol(Symbol::RParen, "after parameter list")?;

        self.compile_subroutine_body()?;

        self.close(Nonterminal::SubroutineDec)
    }

    /// Parse a possibly empty parameter list, without its parentheses.
    pub fn compile_parameter_list(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::ParameterList)?;

        if !self.check_symbol(Symbol::RParen) {
            self.compile_type()?;
            self.expect_identifier("parameter name")?;

            while self.check_symbol(Symbol::Comma) {
                self.emit_current("','")?;
                self.compile_type()?;
                self.expect_identifier("parameter name")?;
            }
        }

        self.close(Nonterminal::ParameterList)
    }

    /// Parse `{ varDec* statements }`.
    pub fn compile_subroutine_body(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::SubroutineBody)?;

        self.expect_symbol(Symbol::LBrace, "before subroutine body")?;

        while self.check_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        self.compile_statements()?;
        self.expect_symbol(Symbol::RBrace, "or a statement in subroutine body")?;

        self.close(Nonterminal::SubroutineBody)
    }

    /// Parse a local `var` declaration.
    pub fn compile_var_dec(&mut self) -> Result<(), ParseError> {
        self.open(Nonterminal::VarDec)?;

        self.expect_keyword(Keyword::Var, "to start a local declaration")?;
        self.compile_type()?;
        self.compile_var_names("after local variable declaration")?;

        self.close(Nonterminal::VarDec)
    }

    /// Parse a type: a primitive type keyword or a class name.
    pub(crate) fn compile_type(&mut self) -> Result<(), ParseError> {
        let primitive = matches!(self.current_keyword(), Some(kw) if kw.is_primitive_type());
        if primitive || self.check_identifier() {
            self.emit_current("type")
        } else {
            Err(self.error("type ('int', 'char', 'boolean' or a class name)"))
        }
    }

    /// Parse `varName ("," varName)* ";"`; at least one name is required.
    fn compile_var_names(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_identifier("variable name")?;

        while self.check_symbol(Symbol::Comma) {
            self.emit_current("','")?;
            self.expect_identifier("variable name")?;
        }

        self.expect_symbol(Symbol::Semicolon, ctx)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse::{ParseError, Parser};
    use crate::parser::scanner::Scanner;
    use crate::trace::{Nonterminal, TraceEvent};

    fn parse(source: &str) -> Result<Vec<TraceEvent>, ParseError> {
        let mut scanner = Scanner::new(source).unwrap();
        let mut parser = Parser::new(&mut scanner, Vec::<TraceEvent>::new());
        parser.compile_class()?;
        Ok(parser.into_sink())
    }

    fn opens(events: &[TraceEvent], nt: Nonterminal) -> usize {
        events.iter().filter(|e| **e == TraceEvent::Open(nt)).count()
    }

    #[test]
    fn test_class_var_decs() {
        let events = parse("class P { field int x, y; static Point origin; }").unwrap();
        assert_eq!(opens(&events, Nonterminal::ClassVarDec), 2);
        assert_eq!(opens(&events, Nonterminal::SubroutineDec), 0);
    }

    #[test]
    fn test_subroutine_with_params() {
        let events = parse(
            "class M { function int add(int a, Point b) { var int c, d; var char e; return a; } }",
        )
        .unwrap();
        assert_eq!(opens(&events, Nonterminal::SubroutineDec), 1);
        assert_eq!(opens(&events, Nonterminal::ParameterList), 1);
        assert_eq!(opens(&events, Nonterminal::VarDec), 2);
        assert_eq!(opens(&events, Nonterminal::ReturnStatement), 1);
    }

    #[test]
    fn test_empty_parameter_list_still_tagged() {
        let events = parse("class M { method void run() { return; } }").unwrap();
        let pos = events
            .iter()
            .position(|e| *e == TraceEvent::Open(Nonterminal::ParameterList))
            .unwrap();
        assert_eq!(events[pos + 1], TraceEvent::Close(Nonterminal::ParameterList));
    }

    #[test]
    fn test_declaration_requires_a_name() {
        let err = parse("class P { field int; }").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: expected variable name, found symbol ';'"
        );
    }

    #[test]
    fn test_void_is_not_a_variable_type() {
        assert!(parse("class P { field void x; }").is_err());
    }

    #[test]
    fn test_member_order_is_enforced() {
        // Class variables may not follow subroutines.
        let err = parse("class P { function void f() { return; } field int x; }").unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }
}
