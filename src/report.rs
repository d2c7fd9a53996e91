//! Assembles the three banner-delimited report sections (`Lexing`,
//! `Parsing`, `Running`) out of the lex/parse/eval phases, the way the
//! reference `main.c` writes them straight to its output file as each
//! phase completes.
//!
//! This module is pure data assembly -- no I/O, no logging -- so it can be
//! exercised directly in tests; [`crate::error`] and the `main` binary own
//! turning a [`PipelineOutcome`] into an exit status and a log line.

use crate::eval::evaluate_with_limit;
use crate::lexer::{lex, LexStatus};
use crate::parser::{parse_with_limit, ParseOutcome};
use crate::token::{Token, TokenKind};

/// How far the pipeline got, mirroring the four failure kinds in the
/// error-handling design (§7): the two that abort the pipeline outright
/// (`LexOom`, `ParseOom`) and the two that still produce a full report but
/// skip the remaining phases (`UnknownToken`, `Rejected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Accepted,
    UnknownToken,
    Rejected,
    LexOom,
    ParseOom,
}

impl PipelineOutcome {
    /// Whether the driver should report success (exit code 0).
    pub fn is_success(self) -> bool {
        matches!(self, PipelineOutcome::Accepted)
    }
}

pub struct Report {
    pub text: String,
    pub outcome: PipelineOutcome,
}

/// Run the full lex -> parse -> evaluate pipeline over `input`, producing
/// the report text built up section by section, exactly as far as the
/// pipeline got.
pub fn run_pipeline(input: &[u8], recursion_limit: usize) -> Report {
    let mut text = String::new();
    text.push_str("\n---*** Lexing ***---\n\n");

    let (tokens, lex_status) = lex(input);
    append_lex_section(&mut text, &tokens, input, lex_status);

    match lex_status {
        LexStatus::Oom => {
            text.push_str("\nThe lexer could not allocate memory.\n");
            return Report {
                text,
                outcome: PipelineOutcome::LexOom,
            };
        }
        LexStatus::UnknownToken => {
            return Report {
                text,
                outcome: PipelineOutcome::UnknownToken,
            };
        }
        LexStatus::Ok => {}
    }

    text.push_str("\n\n\n---*** Parsing ***---\n\n");
    let parse_result = parse_with_limit(&tokens, input, recursion_limit);
    for line in &parse_result.diagnostics {
        text.push_str(line);
        text.push('\n');
    }

    let tree = match parse_result.outcome {
        ParseOutcome::Oom => {
            text.push_str("\nThe parser could not allocate memory.\n");
            return Report {
                text,
                outcome: PipelineOutcome::ParseOom,
            };
        }
        ParseOutcome::Rejected => {
            return Report {
                text,
                outcome: PipelineOutcome::Rejected,
            };
        }
        ParseOutcome::Accepted => parse_result.tree.expect("accepted parse always has a tree"),
    };

    text.push_str("\n\n---*** Running ***---\n\n");
    let eval_result = evaluate_with_limit(&tree, input, recursion_limit);
    for line in &eval_result.lines {
        text.push_str(line);
        text.push('\n');
    }

    Report {
        text,
        outcome: PipelineOutcome::Accepted,
    }
}

/// Reconstitutes the source from token text (including trivia, which is
/// lexically significant for reconstitution per the grammar's glossary),
/// and on `UnknownToken` appends the `<char> < Unknown token` diagnostic
/// the reference `print()` helper in `main.c` emits for the trailing
/// sentinel.
fn append_lex_section(out: &mut String, tokens: &[Token], input: &[u8], status: LexStatus) {
    let last = tokens.len().saturating_sub(1);
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::FBeg | TokenKind::FEnd => continue,
            TokenKind::Sentinel if status == LexStatus::UnknownToken && i == last => {
                out.push_str(&String::from_utf8_lossy(token.text(input)));
                out.push_str(" < Unknown token\n");
            }
            _ => out.push_str(&String::from_utf8_lossy(token.text(input))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepted_program_has_all_three_sections() {
        let report = run_pipeline(b"print 1 + 1;", 4096);
        assert_eq!(report.outcome, PipelineOutcome::Accepted);
        assert!(report.text.contains("---*** Lexing ***---"));
        assert!(report.text.contains("---*** Parsing ***---"));
        assert!(report.text.contains("---*** Running ***---"));
        assert!(report.text.contains("ACCEPT"));
        assert!(report.text.contains("2\n"));
    }

    #[test]
    fn unknown_token_stops_before_parsing() {
        let report = run_pipeline(b"x = 1; @", 4096);
        assert_eq!(report.outcome, PipelineOutcome::UnknownToken);
        assert!(report.text.contains("@ < Unknown token"));
        assert!(!report.text.contains("---*** Parsing ***---"));
    }

    #[test]
    fn rejected_program_stops_before_running() {
        let report = run_pipeline(b"x = y = 1;", 4096);
        assert_eq!(report.outcome, PipelineOutcome::Rejected);
        assert!(report.text.contains("REJECT"));
        assert!(!report.text.contains("---*** Running ***---"));
    }
}
