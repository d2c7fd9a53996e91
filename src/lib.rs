//! `munch`: a maximal-munch lexer, shift-reduce parser, and tree-walking
//! evaluator for a small imperative toy language.
//!
//! The three phases are independently usable library functions --
//! [`lexer::lex`], [`parser::parse`], [`eval::evaluate`] -- and
//! [`report::run_pipeline`] wires all three together into the banner-
//! delimited report format the `munch` binary writes to disk. Each phase
//! returns a plain outcome enum rather than panicking or bubbling a
//! generic error: rejection, unrecognized tokens and out-of-memory are
//! ordinary, expected results for a compiler front-end, not exceptional
//! conditions.

pub mod error;
pub mod eval;
pub(crate) mod grammar;
pub mod lexer;
pub mod limit;
pub mod parser;
pub mod report;
pub mod token;

pub use error::PipelineError;
pub use eval::{evaluate, evaluate_with_limit, EvalResult};
pub use lexer::{lex, LexStatus};
pub use limit::LimitTracker;
pub use parser::node::{NonTerminal, Node};
pub use parser::{parse, parse_with_limit, ParseOutcome, ParseResult};
pub use report::{run_pipeline, PipelineOutcome, Report};
pub use token::{Token, TokenKind};
