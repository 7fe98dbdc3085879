// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — bind a directory of numbered page images into one PDF.
//
// Entry point. Initialises logging, resolves the directory argument, and runs
// the binding pipeline once.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use folio_core::error::FolioError;
use folio_core::human_errors::humanize_error;
use folio_core::{BindConfig, RunSummary};
use folio_document::{TracingObserver, run};
use tracing_subscriber::EnvFilter;

const ABOUT: &str = "Bind jpg/jpeg/png page images from a directory into one A4 PDF";

const LONG_ABOUT: &str = "\
Searches the directory for jpg, jpeg, and png files.
File names must contain digits; the last number in each name sets its page.
Landscape images are rotated to portrait in place before binding.
Result PDF file: <path to folder>.pdf";

const AFTER_HELP: &str = "\
EXAMPLES:
  folio -d ./images          writes ./images.pdf

Set RUST_LOG=debug for more detail.";

const FILES_MODIFIED_NOTE: &str =
    "Note: some images in the folder may already have been rotated in place.";

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = ABOUT, long_about = LONG_ABOUT, after_help = AFTER_HELP)]
struct Cli {
    /// Directory with images
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let Some(dir) = cli.dir else {
        // Help text goes to stdout, like `--help`.
        if let Err(err) = Cli::command().print_help() {
            tracing::debug!(error = %err, "could not print help");
        }
        println!();
        return ExitCode::from(FolioError::MissingArgument.exit_code());
    };

    match bind(dir) {
        Ok(summary) => {
            tracing::debug!(?summary, "Run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, exit_code = human.exit_code, "run failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            if human.files_modified {
                eprintln!("{FILES_MODIFIED_NOTE}");
            }
            ExitCode::from(human.exit_code)
        }
    }
}

fn bind(dir: PathBuf) -> Result<RunSummary, FolioError> {
    let config = BindConfig::for_directory(dir)?;
    tracing::info!(
        dir = %config.input_dir.display(),
        output = %config.output_path.display(),
        pattern = %config.pattern.describe(),
        "Binding images"
    );
    run(&config, &TracingObserver)
}
