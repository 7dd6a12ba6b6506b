use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A reference line that is not a valid doctor object.
    #[error("line {line}: invalid reference record: {source}")]
    Json {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// A delimited line with a field count other than 3 or 8.
    #[error("line {line}: illegal roster line, expected 3 or 8 fields, found {fields}")]
    Format { line: u64, fields: usize },

    /// Delimiter or quote that cannot be used as a single-byte separator.
    #[error("{what} must be a single ASCII character, got {value:?}")]
    Dialect { what: &'static str, value: char },

    /// The delimited reader itself failed (bad UTF-8 inside a quoted field, etc.).
    #[error("line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: ::csv::Error,
    },
}
