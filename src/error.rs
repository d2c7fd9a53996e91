//! Structured errors raised at the edges of the pipeline.
//!
//! The three core phases (lex/parse/eval) each report their own expected
//! outcomes inline (`LexStatus`, `ParseOutcome`, evaluator warnings) rather
//! than through this type -- rejection and out-of-memory are ordinary
//! control flow for a compiler, not exceptional conditions. `PipelineError`
//! exists for the driver layer, where I/O and "the file flatly could not be
//! processed" need to collapse into one reportable error type, the way a
//! binary built on a `thiserror` library crate usually wraps its library's
//! errors alongside `std::io::Error`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read source file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory {path}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report to {path}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lexer ran out of memory")]
    LexOom,

    #[error("parser ran out of memory")]
    ParseOom,

    #[error("input contained an unrecognized token")]
    UnknownToken,

    #[error("input was rejected by the parser")]
    Rejected,
}
