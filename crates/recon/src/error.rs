use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty path, bad delimiter, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
}
