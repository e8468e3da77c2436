//! CLI command implementations.

pub mod demo;
pub mod person;
pub mod ping;
pub mod version;

use std::sync::Arc;

use people_mongodb::{
    MemoryPersonRepository, MongoClient, MongoError, MongoPersonRepository,
    OfflinePersonRepository, Person, PersonRepository,
};
use tracing::{error, info};

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::output;

/// An open repository plus what is known about the connection.
pub struct Session {
    /// The repository commands run against.
    pub repo: Arc<dyn PersonRepository>,
    /// Client, when talking to a server.
    pub client: Option<MongoClient>,
    /// Why no client could be created, when opened offline.
    pub connect_error: Option<String>,
}

impl Session {
    /// Open the repository selected by the global options.
    ///
    /// No network traffic happens here; see [`Session::check_connection`].
    pub async fn open(global: &GlobalArgs) -> CliResult<Self> {
        if global.memory {
            info!("Using in-memory collection");
            return Ok(Self {
                repo: Arc::new(MemoryPersonRepository::new()),
                client: None,
                connect_error: None,
            });
        }

        let config = Config::load_or_default(&global.config)?.resolve(global)?;
        let client = MongoClient::new(config).await?;
        Ok(Self {
            repo: Arc::new(MongoPersonRepository::from_client(&client)),
            client: Some(client),
            connect_error: None,
        })
    }

    /// Like [`Session::open`], but a client that cannot be created leaves
    /// the session offline instead of failing: every repository call then
    /// returns the connection error.
    pub async fn open_or_offline(global: &GlobalArgs) -> CliResult<Self> {
        match Self::open(global).await {
            Err(CliError::Database(e)) => {
                let reason = e.to_string();
                Ok(Self {
                    repo: Arc::new(OfflinePersonRepository::new(reason.clone())),
                    client: None,
                    connect_error: Some(reason),
                })
            }
            other => other,
        }
    }

    /// Ping the server and report the outcome.
    pub async fn check_connection(&self) -> CliResult<()> {
        if let Some(reason) = &self.connect_error {
            error!(error = %reason, "Database connection error");
            output::error(&format!("Database connection error: {}", reason));
            return Err(MongoError::connection(reason.clone()).into());
        }

        let Some(client) = &self.client else {
            output::info("Using in-memory collection");
            return Ok(());
        };

        match client.ping().await {
            Ok(()) => {
                output::success(&format!(
                    "Connected to MongoDB ({}/{})",
                    client.config().database,
                    client.config().collection
                ));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, uri = %client.config().redacted_uri(), "Database connection error");
                output::error(&format!("Database connection error: {}", e));
                Err(e.into())
            }
        }
    }
}

/// Print one person, or a note that nothing matched.
pub(crate) fn print_person(label: &str, person: Option<&Person>) -> CliResult<()> {
    match person {
        Some(person) => {
            output::success(label);
            output::json(&person.to_relaxed_json()?);
        }
        None => output::warn(&format!("{}: no matching person", label)),
    }
    Ok(())
}

/// Print a list of people.
pub(crate) fn print_people(label: &str, people: &[Person]) -> CliResult<()> {
    output::success(&format!("{} ({})", label, people.len()));
    let values = people
        .iter()
        .map(Person::to_relaxed_json)
        .collect::<Result<Vec<_>, _>>()?;
    output::json(&serde_json::Value::Array(values));
    Ok(())
}
