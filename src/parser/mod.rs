//! Jack source parser
//!
//! This module turns one Jack class into a structural trace:
//! - [`scanner`]: Tokenization (source text → tokens), with a forward-only cursor
//! - [`token`]: Keyword/symbol enumerations and the token value type
//! - [`parse`]: The [`parse::Parser`] struct and its helpers
//! - `declarations`, `statements`, `expressions`: one routine per nonterminal
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with no precedence climbing: the grammar
//! treats every binary operator alike. The only lookahead is a single token,
//! used to tell variables, array accesses and calls apart inside a term.

pub mod constants;
pub mod parse;
pub mod scanner;
pub mod token;

mod declarations;
mod expressions;
mod statements;
