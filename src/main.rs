//! Driver binary: thin glue around the library's lex/parse/eval pipeline.
//!
//! Out of scope per the specification's own framing -- CLI argument
//! parsing, file I/O, computing an output path -- but still built the way
//! a real binary in this codebase's lineage is built: `clap` for argument
//! parsing, `log`/`env_logger` for structured progress, `thiserror` for the
//! one error type this layer needs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use munch::error::PipelineError;
use munch::report::{run_pipeline, PipelineOutcome};
use munch::LimitTracker;

/// Lex, parse and run a small imperative source file, writing a three-
/// section report (lexing, parsing, running) to the output directory.
#[derive(Debug, Parser)]
#[command(name = "munch", version, about)]
struct Cli {
    /// Path to the source file to interpret.
    input: PathBuf,

    /// Directory the report is written under.
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Recursion limit shared by the parser and the evaluator.
    #[arg(long, default_value_t = LimitTracker::default().limit)]
    recursion_limit: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool, PipelineError> {
    let input = fs::read(&cli.input).map_err(|source| PipelineError::Read {
        path: cli.input.clone(),
        source,
    })?;
    info!("read {} bytes from {}", input.len(), cli.input.display());

    let report = run_pipeline(&input, cli.recursion_limit);
    log_outcome(&report.outcome);

    fs::create_dir_all(&cli.output_dir).map_err(|source| PipelineError::CreateOutputDir {
        path: cli.output_dir.clone(),
        source,
    })?;

    let output_path = cli.output_dir.join(output_file_name(&cli.input));
    fs::write(&output_path, &report.text).map_err(|source| PipelineError::WriteReport {
        path: output_path.clone(),
        source,
    })?;

    println!(
        "The output is saved to {} in the {} folder",
        output_path.display(),
        cli.output_dir.display()
    );

    Ok(report.outcome.is_success())
}

fn log_outcome(outcome: &PipelineOutcome) {
    match outcome {
        PipelineOutcome::Accepted => info!("parse accepted, program evaluated"),
        PipelineOutcome::UnknownToken => {
            warn!("{}", PipelineError::UnknownToken);
        }
        PipelineOutcome::Rejected => {
            warn!("{}", PipelineError::Rejected);
        }
        PipelineOutcome::LexOom => error!("{}", PipelineError::LexOom),
        PipelineOutcome::ParseOom => error!("{}", PipelineError::ParseOom),
    }
}

/// `outputs/<basename>_output.txt`, stripping a trailing `.txt` extension
/// from the input file name the way the reference `main.c` does with
/// `strrchr`/`strcmp`.
fn output_file_name(input: &Path) -> String {
    let stem = match input.file_name().and_then(|s| s.to_str()) {
        Some(name) => name.strip_suffix(".txt").unwrap_or(name),
        None => "output",
    };
    format!("{stem}_output.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_txt_extension() {
        assert_eq!(output_file_name(Path::new("prog.txt")), "prog_output.txt");
    }

    #[test]
    fn leaves_other_extensions_alone() {
        assert_eq!(output_file_name(Path::new("prog.src")), "prog.src_output.txt");
    }

    #[test]
    fn run_writes_report_under_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("prog.txt");
        fs::write(&input_path, "print 1 + 1;").unwrap();

        let cli = Cli {
            input: input_path,
            output_dir: dir.path().join("outputs"),
            recursion_limit: LimitTracker::default().limit,
        };

        let success = run(&cli).unwrap();
        assert!(success);

        let report = fs::read_to_string(cli.output_dir.join("prog_output.txt")).unwrap();
        assert!(report.contains("---*** Running ***---"));
        assert!(report.contains('2'));
    }

    #[test]
    fn run_reports_failure_for_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            input: dir.path().join("missing.txt"),
            output_dir: dir.path().join("outputs"),
            recursion_limit: LimitTracker::default().limit,
        };
        assert!(matches!(run(&cli), Err(PipelineError::Read { .. })));
    }
}
