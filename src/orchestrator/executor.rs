//! Final step execution and result reporting.

use std::path::Path;

use crate::error::OperationError;
use crate::models::{ExternalCommand, OutputIdentifier, RunOutcome};
use crate::system::Workspace;

/// Run the database-creation command once, with inherited stdio.
///
/// A nonzero exit is not an error here: it is carried in the outcome so the
/// caller can report it and exit with the same status.
pub fn execute_analysis(
    workspace: &mut dyn Workspace,
    command: &ExternalCommand,
    identifier: &OutputIdentifier,
    database: &Path,
) -> Result<RunOutcome, OperationError> {
    log::info!(target: "parsed", "[Executor] Creating database {}", identifier);
    log::info!("[Executor] $ {}", command);

    let status = workspace
        .run(command)
        .map_err(|source| OperationError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    let outcome = RunOutcome {
        identifier: identifier.clone(),
        database: database.to_path_buf(),
        status,
    };

    if outcome.succeeded() {
        log::info!("[Executor] ✓ {} finished", command.program);
    } else {
        log::error!("[Executor] ✗ {} finished with {}", command.program, status);
    }

    Ok(outcome)
}

/// One-line human report for the terminal.
pub fn report_line(outcome: &RunOutcome) -> String {
    if outcome.succeeded() {
        format!("✓ Database created: {}", outcome.database.display())
    } else {
        format!(
            "✗ Database creation failed for {} ({})",
            outcome.identifier, outcome.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommandStatus;
    use std::path::PathBuf;

    fn outcome(code: i32) -> RunOutcome {
        RunOutcome {
            identifier: OutputIdentifier::new("db_2025_38245"),
            database: PathBuf::from("/dbs/db_2025_38245"),
            status: CommandStatus::from_code(code),
        }
    }

    #[test]
    fn test_report_success_names_location() {
        assert_eq!(
            report_line(&outcome(0)),
            "✓ Database created: /dbs/db_2025_38245"
        );
    }

    #[test]
    fn test_report_failure() {
        let line = report_line(&outcome(32));
        assert!(line.starts_with("✗"));
        assert!(line.contains("exit code 32"));
        assert_eq!(outcome(32).exit_code(), 32);
    }
}
