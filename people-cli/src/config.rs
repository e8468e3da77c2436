//! CLI configuration handling.
//!
//! Settings are layered: `people.toml` < environment (including `.env`) <
//! command-line flags. clap resolves the last two; this module supplies the
//! file layer and merges the result into a [`MongoConfig`].

use std::path::Path;
use std::time::Duration;

use people_mongodb::MongoConfig;
use people_mongodb::config::DEFAULT_URI;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalArgs;
use crate::error::{CliError, CliResult};

/// Default config file name (lives in the working directory)
pub const CONFIG_FILE_NAME: &str = "people.toml";

/// Connect and server selection timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration if the file exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge command-line and environment values over this file and build
    /// the driver configuration.
    pub fn resolve(&self, args: &GlobalArgs) -> CliResult<MongoConfig> {
        let db = &self.database;

        let uri = args
            .uri
            .clone()
            .or_else(|| db.uri.clone())
            .unwrap_or_else(|| DEFAULT_URI.to_string());

        let mut builder = MongoConfig::builder().uri(uri);

        if let Some(name) = args.database.clone().or_else(|| db.name.clone()) {
            builder = builder.database(name);
        }

        if let Some(collection) = args.collection.clone().or_else(|| db.collection.clone()) {
            builder = builder.collection(collection);
        }

        if let Some(ref app_name) = db.app_name {
            builder = builder.app_name(app_name.clone());
        }

        if let Some(size) = db.max_pool_size {
            builder = builder.max_pool_size(size);
        }

        let secs = args
            .timeout
            .or(db.connect_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::from_secs(secs);
        builder = builder
            .connect_timeout(timeout)
            .server_selection_timeout(timeout);

        builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

/// Database configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string
    pub uri: Option<String>,

    /// Database name
    pub name: Option<String>,

    /// Collection holding person records
    pub collection: Option<String>,

    /// Application name reported to the server
    pub app_name: Option<String>,

    /// Maximum connection pool size
    pub max_pool_size: Option<u32>,

    /// Connect and server selection timeout in seconds
    #[serde(alias = "timeout_secs")]
    pub connect_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn args() -> GlobalArgs {
        GlobalArgs {
            config: PathBuf::from(CONFIG_FILE_NAME),
            ..GlobalArgs::default()
        }
    }

    #[test]
    fn test_parse_config_file() {
        let config: Config = toml::from_str(
            r#"
            [database]
            uri = "mongodb://db.local:27017"
            name = "shop"
            collection = "persons"
            max_pool_size = 4
            connect_timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.database.name.as_deref(), Some("shop"));
        assert_eq!(config.database.max_pool_size, Some(4));

        let resolved = config.resolve(&args()).unwrap();
        assert_eq!(resolved.uri, "mongodb://db.local:27017");
        assert_eq!(resolved.database, "shop");
        assert_eq!(resolved.collection, "persons");
        assert_eq!(resolved.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(resolved.server_selection_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_short_timeout_key_still_read() {
        let config: Config = toml::from_str("[database]\ntimeout_secs = 2\n").unwrap();
        assert_eq!(config.database.connect_timeout_secs, Some(2));
    }

    #[test]
    fn test_flags_override_file() {
        let config: Config = toml::from_str(
            r#"
            [database]
            uri = "mongodb://file:27017"
            name = "from_file"
            "#,
        )
        .unwrap();

        let mut global = args();
        global.uri = Some("mongodb://flag:27017/from_uri".to_string());
        global.database = Some("from_flag".to_string());
        global.timeout = Some(1);

        let resolved = config.resolve(&global).unwrap();
        assert_eq!(resolved.uri, "mongodb://flag:27017/from_uri");
        assert_eq!(resolved.database, "from_flag");
        assert_eq!(resolved.connect_timeout, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_database_defaults() {
        let resolved = Config::default().resolve(&args()).unwrap();
        assert_eq!(resolved.uri, DEFAULT_URI);
        assert_eq!(resolved.database, "test");
        assert_eq!(resolved.collection, "people");
        assert_eq!(
            resolved.server_selection_timeout,
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        );

        let mut global = args();
        global.uri = Some("mongodb://localhost/inventory".to_string());
        let resolved = Config::default().resolve(&global).unwrap();
        assert_eq!(resolved.database, "inventory");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[database\nuri = 1").unwrap();
        assert!(matches!(Config::load(&path), Err(CliError::Config(_))));
    }
}
