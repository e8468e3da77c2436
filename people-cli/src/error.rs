//! CLI error types and result alias.

use miette::Diagnostic;
use people_mongodb::MongoError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(people::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(people::config),
        help("set MONGO_URI, pass --uri, or add a [database] section to people.toml")
    )]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    #[diagnostic(code(people::database))]
    Database(#[from] MongoError),

    /// Invalid command input
    #[error("Input error: {0}")]
    #[diagnostic(code(people::input))]
    Input(String),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Input(format!("Failed to parse JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display() {
        let err: CliError = MongoError::not_found("person with id 1").into();
        assert_eq!(
            err.to_string(),
            "Database error: document not found: person with id 1"
        );
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: CliError = toml_err.into();
        assert!(matches!(err, CliError::Config(_)));
    }
}
