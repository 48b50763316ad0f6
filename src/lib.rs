//! # Introduction
//!
//! `jack_analyzer` scans and parses a single class of the Jack language and
//! emits a fully bracketed structural trace of it, one line per event.
//! Later compiler stages can rebuild the parse structure from tag nesting alone.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Scanner → Tokens → Parser → Trace events → Sink
//! ```
//!
//! 1. [`parser::scanner`] strips comments and tokenizes the whole unit eagerly.
//! 2. [`parser::parse`] walks the grammar top-down and emits
//!    [`trace::TraceEvent`]s as it recognises each construct.
//! 3. [`trace`] collects events or renders them as `<tag>` lines.
//! 4. [`pipeline`] wires the three together for readers, writers and strings.
//!
//! There is no symbol table, type checking or code generation here. Each unit
//! owns its scanner and parser, so separate units can be analysed in parallel.

pub mod parser;
pub mod pipeline;
pub mod trace;

pub use parser::parse::{ParseError, Parser};
pub use parser::scanner::{ScanError, Scanner};
pub use pipeline::{analyze, analyze_str, tokenize_str, AnalyzeError};
pub use trace::{TraceEvent, TraceOptions, TraceSink};
