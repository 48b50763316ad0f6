//! End-to-end analysis of one source unit
//!
//! Each call builds its own [`Scanner`] and [`Parser`]; nothing is shared
//! between calls, so separate units can be analysed independently and a
//! failure in one never affects another.

use crate::parser::parse::{ParseError, Parser};
use crate::parser::scanner::{ScanError, Scanner};
use crate::trace::{TraceEvent, TraceOptions, XmlTrace};
use log::debug;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Any failure while analysing a unit.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("lexical error: {0}")]
    Scan(#[from] ScanError),

    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

/// Scan `input` completely, then parse it and stream the trace to `output`.
///
/// The reader is dropped as soon as scanning finishes, whether or not it
/// succeeded. Lines already written stay written if parsing fails later.
pub fn analyze<R: Read, W: Write>(
    input: R,
    output: W,
    options: &TraceOptions,
) -> Result<(), AnalyzeError> {
    let mut scanner = Scanner::from_reader(input)?;
    let mut sink = XmlTrace::new(output, options.clone());

    Parser::new(&mut scanner, &mut sink).compile_class()?;
    sink.flush()?;

    debug!("analysed unit of {} tokens", scanner.len());
    Ok(())
}

/// Analyse source text and return the rendered trace.
pub fn analyze_str(source: &str, options: &TraceOptions) -> Result<String, AnalyzeError> {
    let mut out = Vec::new();
    analyze(source.as_bytes(), &mut out, options)?;
    into_string(out)
}

/// Analyse source text and return the trace events instead of text.
pub fn trace_events(source: &str) -> Result<Vec<TraceEvent>, AnalyzeError> {
    let mut scanner = Scanner::new(source)?;
    let mut parser = Parser::new(&mut scanner, Vec::new());
    parser.compile_class()?;
    Ok(parser.into_sink())
}

/// Write every token of the unit as a flat `<tokens>` listing.
pub fn write_token_listing<W: Write>(
    scanner: &Scanner,
    output: W,
    options: &TraceOptions,
) -> io::Result<()> {
    let mut sink = XmlTrace::new(output, options.clone());
    sink.write_tag("tokens", false)?;
    for token in scanner.tokens() {
        sink.write_leaf(&token.value)?;
    }
    sink.write_tag("tokens", true)?;
    sink.flush()
}

/// Tokenize source text and return the rendered token listing.
pub fn tokenize_str(source: &str, options: &TraceOptions) -> Result<String, AnalyzeError> {
    let scanner = Scanner::new(source)?;
    let mut out = Vec::new();
    write_token_listing(&scanner, &mut out, options)?;
    into_string(out)
}

fn into_string(bytes: Vec<u8>) -> Result<String, AnalyzeError> {
    String::from_utf8(bytes)
        .map_err(|e| AnalyzeError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
