use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// A reconciliation run: where each roster lives and how to read it.
///
/// File paths are kept as written; callers resolve them relative to the
/// config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub reference: ReferenceConfig,
    pub candidates: CandidateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "docmatch".into()
}

// ---------------------------------------------------------------------------
// Reference roster (JSON lines)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    pub file: String,
    #[serde(default)]
    pub on_malformed: ReferencePolicy,
}

/// What to do with a reference line that does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Abort the whole load.
    #[default]
    Fail,
    /// Log and drop the line.
    Skip,
}

impl std::fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate roster (delimited)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateConfig {
    pub file: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_has_header")]
    pub has_header: bool,
    #[serde(default = "default_quote")]
    pub quote: char,
}

fn default_delimiter() -> char {
    ','
}

fn default_has_header() -> bool {
    true
}

fn default_quote() -> char {
    '"'
}

impl CandidateConfig {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            delimiter: default_delimiter(),
            has_header: default_has_header(),
            quote: default_quote(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config for a run given only the two roster paths.
    pub fn from_paths(reference: impl Into<String>, candidates: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            reference: ReferenceConfig {
                file: reference.into(),
                on_malformed: ReferencePolicy::default(),
            },
            candidates: CandidateConfig::new(candidates),
            output: OutputConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.reference.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "reference.file must not be empty".into(),
            ));
        }

        if self.candidates.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "candidates.file must not be empty".into(),
            ));
        }

        let delim = self.candidates.delimiter;
        if !delim.is_ascii() || delim == '\n' || delim == '\r' {
            return Err(ReconError::ConfigValidation(format!(
                "candidates.delimiter must be a single ASCII character other than a line break, got {delim:?}"
            )));
        }

        let quote = self.candidates.quote;
        if !quote.is_ascii() {
            return Err(ReconError::ConfigValidation(format!(
                "candidates.quote must be a single ASCII character, got {quote:?}"
            )));
        }

        if quote == delim {
            return Err(ReconError::ConfigValidation(format!(
                "candidates.quote and candidates.delimiter are both {delim:?}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let config = MatchConfig::from_toml(
            r#"
[reference]
file = "doctors.jsonl"

[candidates]
file = "roster.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.name, "docmatch");
        assert_eq!(config.reference.on_malformed, ReferencePolicy::Fail);
        assert_eq!(config.candidates.delimiter, ',');
        assert_eq!(config.candidates.quote, '"');
        assert!(config.candidates.has_header);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn parse_full() {
        let config = MatchConfig::from_toml(
            r#"
name = "Weekly roster"

[reference]
file = "doctors.jsonl"
on_malformed = "skip"

[candidates]
file = "roster.tsv"
delimiter = "\t"
has_header = false
quote = "'"

[output]
json = "result.json"
"#,
        )
        .unwrap();
        assert_eq!(config.name, "Weekly roster");
        assert_eq!(config.reference.on_malformed, ReferencePolicy::Skip);
        assert_eq!(config.candidates.delimiter, '\t');
        assert_eq!(config.candidates.quote, '\'');
        assert!(!config.candidates.has_header);
        assert_eq!(config.output.json.as_deref(), Some("result.json"));
    }

    #[test]
    fn missing_section_is_parse_error() {
        let err = MatchConfig::from_toml("[reference]\nfile = \"a.jsonl\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        let err = MatchConfig::from_toml(
            "[reference]\nfile = \"a\"\non_malformed = \"retry\"\n[candidates]\nfile = \"b\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn empty_file_rejected() {
        let err = MatchConfig::from_toml("[reference]\nfile = \"\"\n[candidates]\nfile = \"b\"\n")
            .unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn delimiter_equal_to_quote_rejected() {
        let mut config = MatchConfig::from_paths("a.jsonl", "b.csv");
        config.candidates.delimiter = '"';
        assert!(matches!(config.validate(), Err(ReconError::ConfigValidation(_))));
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        let mut config = MatchConfig::from_paths("a.jsonl", "b.csv");
        config.candidates.delimiter = '§';
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_paths_is_valid() {
        let config = MatchConfig::from_paths("a.jsonl", "b.csv");
        config.validate().unwrap();
        assert_eq!(config.reference.file, "a.jsonl");
        assert_eq!(config.candidates.file, "b.csv");
    }
}
