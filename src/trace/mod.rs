//! Structural trace emitted by the parser
//!
//! The trace is a flat sequence of [`TraceEvent`]s: one `Open`/`Close` pair
//! per recognised nonterminal and one `Leaf` per consumed token. Nesting is
//! carried entirely by the order of events; no tree is retained.
//!
//! Two sinks are provided:
//! - `Vec<TraceEvent>` collects events in memory,
//! - [`XmlTrace`] renders each event as one line to any [`std::io::Write`].

use crate::parser::token::{Token, TokenValue};
use std::fmt;
use std::io::{self, Write};

/// Grammar constructs that get their own open/close tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nonterminal {
    Class,
    ClassVarDec,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    LetStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    ExpressionList,
}

impl Nonterminal {
    pub fn tag(self) -> &'static str {
        match self {
            Nonterminal::Class => "class",
            Nonterminal::ClassVarDec => "classVarDec",
            Nonterminal::SubroutineDec => "subroutineDec",
            Nonterminal::ParameterList => "parameterList",
            Nonterminal::SubroutineBody => "subroutineBody",
            Nonterminal::VarDec => "varDec",
            Nonterminal::Statements => "statements",
            Nonterminal::LetStatement => "letStatement",
            Nonterminal::IfStatement => "ifStatement",
            Nonterminal::WhileStatement => "whileStatement",
            Nonterminal::DoStatement => "doStatement",
            Nonterminal::ReturnStatement => "returnStatement",
            Nonterminal::Expression => "expression",
            Nonterminal::Term => "term",
            Nonterminal::ExpressionList => "expressionList",
        }
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Open(Nonterminal),
    Leaf(TokenValue),
    Close(Nonterminal),
}

impl TraceEvent {
    pub fn leaf(token: &Token) -> Self {
        TraceEvent::Leaf(token.value.clone())
    }
}

/// Rendering options for the line format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceOptions {
    /// Write `<`, `>`, `&` and `"` in leaf values as XML entities.
    ///
    /// Off by default: symbols are rendered as the literal character.
    pub escape_markup: bool,
}

impl TraceOptions {
    pub fn escaped() -> Self {
        Self {
            escape_markup: true,
        }
    }
}

/// Receiver of trace events, in emission order.
pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent) -> io::Result<()>;
}

impl TraceSink for Vec<TraceEvent> {
    fn emit(&mut self, event: TraceEvent) -> io::Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn emit(&mut self, event: TraceEvent) -> io::Result<()> {
        (**self).emit(event)
    }
}

/// Streams events as indentation-free lines.
pub struct XmlTrace<W: Write> {
    out: W,
    options: TraceOptions,
}

impl<W: Write> XmlTrace<W> {
    pub fn new(out: W, options: TraceOptions) -> Self {
        Self { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a leaf line for a token outside the parser (token listings).
    pub fn write_leaf(&mut self, value: &TokenValue) -> io::Result<()> {
        writeln!(self.out, "{}", format_leaf(value, &self.options))
    }

    pub fn write_tag(&mut self, name: &str, closing: bool) -> io::Result<()> {
        if closing {
            writeln!(self.out, "</{}>", name)
        } else {
            writeln!(self.out, "<{}>", name)
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> TraceSink for XmlTrace<W> {
    fn emit(&mut self, event: TraceEvent) -> io::Result<()> {
        match event {
            TraceEvent::Open(nt) => self.write_tag(nt.tag(), false),
            TraceEvent::Leaf(value) => self.write_leaf(&value),
            TraceEvent::Close(nt) => self.write_tag(nt.tag(), true),
        }
    }
}

/// Render a collected trace to a string.
pub fn render(events: &[TraceEvent], options: &TraceOptions) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            TraceEvent::Open(nt) => out.push_str(&format!("<{}>", nt.tag())),
            TraceEvent::Leaf(value) => out.push_str(&format_leaf(value, options)),
            TraceEvent::Close(nt) => out.push_str(&format!("</{}>", nt.tag())),
        }
        out.push('\n');
    }
    out
}

/// One leaf line without its terminator, e.g. `<symbol> ; </symbol>`.
pub fn format_leaf(value: &TokenValue, options: &TraceOptions) -> String {
    let tag = value.kind().tag();
    let text = value.text();
    let text = if options.escape_markup {
        escape(&text)
    } else {
        text
    };
    format!("<{tag}> {text} </{tag}>")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
