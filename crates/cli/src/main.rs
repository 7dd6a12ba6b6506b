// docmatch CLI - reconcile a JSON-lines provider feed with a delimited roster

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "docmatch")]
#[command(about = "Match a delimited provider roster against a reference feed")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Overridden by DOCMATCH_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile candidates against the reference roster
    #[command(after_help = "\
Examples:
  docmatch run docmatch.toml
  docmatch run docmatch.toml --json
  docmatch run --reference doctors.jsonl --candidates roster.csv
  docmatch run docmatch.toml --output result.json --strict")]
    Run {
        /// Path to a docmatch TOML config (optional when both rosters are given)
        config: Option<PathBuf>,

        /// Reference roster, one JSON object per line
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Candidate roster, delimited text
        #[arg(long)]
        candidates: Option<PathBuf>,

        /// Candidate field delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Candidate roster has no header line
        #[arg(long)]
        no_header: bool,

        /// Skip reference lines that fail to decode instead of aborting
        #[arg(long)]
        skip_malformed: bool,

        /// Output JSON to stdout instead of only the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit 1 when any candidate is left without a match
        #[arg(long)]
        strict: bool,
    },

    /// Validate a docmatch config without running
    #[command(after_help = "\
Examples:
  docmatch validate docmatch.toml")]
    Validate {
        /// Path to the docmatch TOML config
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  docmatch-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("DOCMATCH_BUILD_TARGET"),
        " (", env!("DOCMATCH_BUILD_PROFILE"), ")",
    )
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("DOCMATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // Also bridges `log` records from the library crates
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            eprintln!("Usage: docmatch <command> [options]");
            eprintln!("       docmatch --help for more information");
            Ok(())
        }
        Some(Commands::Run {
            config,
            reference,
            candidates,
            delimiter,
            no_header,
            skip_malformed,
            json,
            output,
            strict,
        }) => recon::cmd_run(recon::RunArgs {
            config,
            reference,
            candidates,
            delimiter,
            no_header,
            skip_malformed,
            json,
            output,
            strict,
        }),
        Some(Commands::Validate { config }) => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
