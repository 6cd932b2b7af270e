//! Snapshot creation through snapper's installation helper.
//!
//! The helper prints the number of the new snapshot on stdout. The full
//! record is then read back from a fresh listing.

use super::command::{CommandRunner, SnapperCommand};
use super::Snapper;
use crate::error::{Result, SnapshotError};
use crate::snapshot::{CreateOptions, SnapshotRecord, SnapshotType};

impl<R: CommandRunner> Snapper<R> {
    pub fn create_single(&self, description: &str, options: &CreateOptions) -> Result<SnapshotRecord> {
        self.create(SnapshotType::Single, description, None, options)
    }

    pub fn create_pre(&self, description: &str, options: &CreateOptions) -> Result<SnapshotRecord> {
        self.create(SnapshotType::Pre, description, None, options)
    }

    /// Creates a post snapshot paired with `previous_number`, or with the
    /// open pre snapshot when none is given.
    pub fn create_post(
        &self,
        description: &str,
        previous_number: Option<u32>,
        options: &CreateOptions,
    ) -> Result<SnapshotRecord> {
        self.create(SnapshotType::Post, description, previous_number, options)
    }

    fn create(
        &self,
        kind: SnapshotType,
        description: &str,
        previous_number: Option<u32>,
        options: &CreateOptions,
    ) -> Result<SnapshotRecord> {
        self.ensure_configured()?;

        let pre_number = match kind {
            SnapshotType::Post => Some(self.resolve_listed_pre(previous_number)?),
            SnapshotType::Single | SnapshotType::Pre => None,
        };

        let invocation = SnapperCommand::Create {
            kind,
            description,
            pre_number,
            options,
        }
        .invocation(&self.config);
        log::debug!("creating {kind} snapshot: {invocation}");

        let output = self.runner.run(&invocation).map_err(|e| {
            log::error!("Snapshot could not be created: failed to run {invocation}: {e}");
            SnapshotError::creation_failed(format!("failed to run {invocation}: {e}"))
        })?;

        if !output.success() {
            log::error!(
                "Snapshot could not be created: {invocation} finished with {}: {}",
                output.status_text(),
                output.stderr.trim()
            );
            return Err(SnapshotError::creation_failed(format!(
                "{invocation} finished with {}",
                output.status_text()
            )));
        }

        let number = parse_created_number(&output.stdout).ok_or_else(|| {
            log::error!(
                "Snapshot could not be created: unexpected output {:?} from {invocation}",
                output.stdout
            );
            SnapshotError::creation_failed(format!(
                "unexpected output {:?} from {invocation}",
                output.stdout.trim()
            ))
        })?;

        self.find_listed(number)?.ok_or_else(|| {
            log::error!("Snapshot could not be created: #{number} is missing from the listing");
            SnapshotError::creation_failed(format!(
                "snapshot #{number} was reported but is missing from the listing"
            ))
        })
    }
}

/// The helper prints the new number alone on stdout.
fn parse_created_number(stdout: &str) -> Option<u32> {
    stdout.trim().parse().ok().filter(|number| *number > 0)
}
