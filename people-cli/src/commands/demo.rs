//! `people demo` command - Run every example operation in order.

use crate::cli::{DemoArgs, GlobalArgs};
use crate::commands::Session;
use crate::demo::{self, DemoPlan};
use crate::error::CliResult;
use crate::output;

/// Run the demo command
///
/// A failed connection, whether the client cannot be created or the server
/// does not answer, is reported but does not stop the run; each step then
/// reports its own error.
pub async fn run(global: &GlobalArgs, args: DemoArgs) -> CliResult<()> {
    output::header("People demo");

    let session = Session::open_or_offline(global).await?;
    let _ = session.check_connection().await;
    output::newline();

    let plan = DemoPlan::from(args);
    let report = demo::run_demo(session.repo.as_ref(), &plan).await;

    output::newline();
    if report.failures() == 0 {
        output::success(&report.to_string());
    } else {
        output::warn(&report.to_string());
    }

    Ok(())
}
