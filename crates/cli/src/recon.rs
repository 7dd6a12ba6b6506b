//! `docmatch run` / `docmatch validate` — config-driven roster reconciliation.

use std::path::{Path, PathBuf};

use docmatch_io::IngestError;
use docmatch_recon::config::ReferencePolicy;
use docmatch_recon::{MatchConfig, Reconciler};

use crate::exit_codes::{ingest_exit_code, EXIT_CONFIG, EXIT_IO, EXIT_UNMATCHED};
use crate::CliError;

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub candidates: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub no_header: bool,
    pub skip_malformed: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub strict: bool,
}

fn ingest_err(err: IngestError) -> CliError {
    let code = ingest_exit_code(&err);
    let err_msg = err.to_string();
    let cli_err = CliError::new(code, err_msg);
    match err {
        IngestError::Format { .. } => {
            cli_err.with_hint("candidate lines need 3 fields (name + npi) or 8 (name + npi + address)")
        }
        IngestError::Json { .. } => cli_err.with_hint("pass --skip-malformed to drop bad reference lines"),
        _ => cli_err,
    }
}

/// Load and validate a config file, returning it with the directory its
/// relative paths are resolved against.
fn load_config(config_path: &Path) -> Result<(MatchConfig, PathBuf), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::new(EXIT_IO, format!("cannot read config: {e}")))?;
    let config = MatchConfig::from_toml(&config_str)
        .map_err(|e| CliError::new(EXIT_CONFIG, e.to_string()))?;
    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    // Command-line paths are relative to the working directory; config paths
    // are relative to the config file.
    let (mut config, base_dir) = match &args.config {
        Some(path) => load_config(path)?,
        None => match (&args.reference, &args.candidates) {
            (Some(reference), Some(candidates)) => (
                MatchConfig::from_paths(
                    reference.to_string_lossy(),
                    candidates.to_string_lossy(),
                ),
                PathBuf::from("."),
            ),
            _ => {
                return Err(CliError::args("missing rosters")
                    .with_hint("pass a config file, or both --reference and --candidates"))
            }
        },
    };

    let reference_path = args
        .reference
        .clone()
        .unwrap_or_else(|| base_dir.join(&config.reference.file));
    let candidates_path = args
        .candidates
        .clone()
        .unwrap_or_else(|| base_dir.join(&config.candidates.file));

    if let Some(delimiter) = args.delimiter {
        config.candidates.delimiter = delimiter;
    }
    if args.no_header {
        config.candidates.has_header = false;
    }
    if args.skip_malformed {
        config.reference.on_malformed = ReferencePolicy::Skip;
    }
    config
        .validate()
        .map_err(|e| CliError::new(EXIT_CONFIG, e.to_string()))?;

    log::info!(
        "run '{}': reference {} (on_malformed={}), candidates {}",
        config.name,
        reference_path.display(),
        config.reference.on_malformed,
        candidates_path.display(),
    );

    let reference_set = docmatch_io::json::import(&reference_path, config.reference.on_malformed)
        .map_err(ingest_err)?;
    let candidate_set =
        docmatch_io::csv::import(&candidates_path, &config.candidates).map_err(ingest_err)?;

    let mut recon = Reconciler::new(reference_set, candidate_set);
    recon.reconcile();
    let result = recon.result(&config.name);

    // Output
    let output_file = args
        .output
        .clone()
        .or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));

    if args.json || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::new(EXIT_IO, format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    eprintln!("{}", result.summary);

    if args.strict && result.summary.unmatched > 0 {
        return Err(CliError::new(
            EXIT_UNMATCHED,
            format!("{} candidate(s) without match", result.summary.unmatched),
        ));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = load_config(&config_path)?;
    eprintln!(
        "valid: '{}' reference={} candidates={} (delimiter {:?}, header {})",
        config.name,
        config.reference.file,
        config.candidates.file,
        config.candidates.delimiter,
        if config.candidates.has_header { "skipped" } else { "none" },
    );
    Ok(())
}
