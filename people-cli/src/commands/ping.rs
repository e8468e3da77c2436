//! `people ping` command - Check that the server is reachable.

use crate::cli::GlobalArgs;
use crate::commands::Session;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the ping command
pub async fn run(global: &GlobalArgs) -> CliResult<()> {
    let session = Session::open(global).await?;
    session.check_connection().await?;

    if let Some(client) = &session.client {
        output::newline();
        kv("URI", &client.config().redacted_uri());
        kv("Database", &client.config().database);
        kv("Collection", &client.config().collection);
    }

    Ok(())
}
