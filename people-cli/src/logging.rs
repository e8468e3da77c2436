//! Logging setup for the `people` binary.
//!
//! # Environment Variables
//!
//! - `PEOPLE_DEBUG=true|1|yes` - Enable debug logging
//! - `PEOPLE_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `PEOPLE_LOG_FORMAT=pretty|json|compact` - Set output format (default: compact)
//!
//! `-v` raises the level to `info`, `-vv` to `debug`, `-vvv` to `trace`.
//! Logs go to stderr so command output on stdout stays clean.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `PEOPLE_DEBUG`.
pub fn is_debug_enabled() -> bool {
    env::var("PEOPLE_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Resolve the log level from the verbosity flag and the environment.
pub fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => {}
        1 => return "info",
        2 => return "debug",
        _ => return "trace",
    }

    if let Ok(level) = env::var("PEOPLE_LOG_LEVEL") {
        if let Some(level) = parse_level(&level) {
            return level;
        }
    }

    if is_debug_enabled() { "debug" } else { "warn" }
}

/// Normalize a level name.
pub fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Get the configured output format from `PEOPLE_LOG_FORMAT`.
pub fn log_format() -> &'static str {
    match env::var("PEOPLE_LOG_FORMAT").map(|v| v.to_lowercase()).as_deref() {
        Ok("json") => "json",
        Ok("pretty") => "pretty",
        _ => "compact",
    }
}

/// Build the filter directives for a level.
pub fn directives(level: &str) -> String {
    format!(
        "warn,people={level},people_cli={level},people_mongodb={level}",
        level = level
    )
}

/// Initialize logging. Subsequent calls are no-ops.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let level = log_level(verbosity);
        let filter =
            EnvFilter::try_new(directives(level)).unwrap_or_else(|_| EnvFilter::new("warn"));

        match log_format() {
            "json" => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            }
            "pretty" => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty().with_writer(std::io::stderr))
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().compact().with_writer(std::io::stderr))
                    .init();
            }
        }

        tracing::debug!(level = level, format = log_format(), "Logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_environment() {
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(7), "trace");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("WARNING"), Some("warn"));
        assert_eq!(parse_level("Error"), Some("error"));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_directives() {
        assert_eq!(
            directives("debug"),
            "warn,people=debug,people_cli=debug,people_mongodb=debug"
        );
    }
}
