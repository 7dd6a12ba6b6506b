//! CLI Exit Code Registry
//!
//! Single source of truth for `docmatch` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | Unmatched candidates remain (`run --strict` only)    |
//! | 2    | CLI usage error (bad or missing arguments)           |
//! | 3    | Cannot read or write a file                          |
//! | 4    | Invalid config or roster dialect                     |
//! | 5    | Illegal delimited roster line                        |
//! | 6    | Malformed reference (JSON) line                      |

use docmatch_io::IngestError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one candidate found no reference record and `--strict` was given.
/// Like `diff(1)`, exit 1 means "rosters differ."
pub const EXIT_UNMATCHED: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// File could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 4;

/// A candidate line had neither 3 nor 8 fields.
pub const EXIT_FORMAT: u8 = 5;

/// A reference line was not a valid doctor object.
pub const EXIT_PARSE: u8 = 6;

/// Map an ingestion failure to its exit code.
pub fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::Io { .. } => EXIT_IO,
        IngestError::Dialect { .. } => EXIT_CONFIG,
        IngestError::Format { .. } | IngestError::Csv { .. } => EXIT_FORMAT,
        IngestError::Json { .. } => EXIT_PARSE,
    }
}
