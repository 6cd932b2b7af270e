//! Snapper snapshot lifecycle.
//!
//! [`Snapper`] is the entry point for everything that touches the external
//! snapshot manager:
//! - `configured` probes for the snapper configuration
//! - `all`, `find` and `previous` read fresh listings
//! - `create_single`, `create_pre` and `create_post` create snapshots,
//!   pairing a post with the open pre when no pre number is given
//!
//! Nothing is cached. Every lookup re-runs `snapper list`, so callers that
//! need one consistent view should call `all` once and work on the result.
//! Pairing reads the listing and then creates, so two concurrent writers
//! against the same snapper configuration can race.

pub mod command;
pub mod create;
pub mod listing;
pub mod pairing;

use crate::config::Config;
use crate::error::{Result, SnapshotError};
use crate::snapshot::SnapshotRecord;
use command::{lists_config, CommandRunner, SnapperCommand, SystemRunner};

pub struct Snapper<R = SystemRunner> {
    config: Config,
    runner: R,
}

impl Snapper<SystemRunner> {
    pub fn system(config: Config) -> Self {
        Snapper::new(config, SystemRunner)
    }
}

impl<R: CommandRunner> Snapper<R> {
    pub fn new(config: Config, runner: R) -> Self {
        Snapper { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the configured snapper configuration is registered.
    ///
    /// A missing binary or a failing command counts as "not configured".
    pub fn configured(&self) -> bool {
        let invocation = SnapperCommand::ListConfigs.invocation(&self.config);
        log::info!("Checking if Snapper is configured: {invocation}");

        match self.runner.run(&invocation) {
            Ok(output) if output.success() => lists_config(&output.stdout, &self.config.config_name),
            Ok(output) => {
                log::debug!("{invocation} finished with {}", output.status_text());
                false
            }
            Err(e) => {
                log::debug!("failed to run {invocation}: {e}");
                false
            }
        }
    }

    /// All snapshots, in the order snapper lists them.
    pub fn all(&self) -> Result<Vec<SnapshotRecord>> {
        self.ensure_configured()?;
        self.list()
    }

    /// The snapshot with `number`, or `None` if the listing has no such row.
    pub fn find(&self, number: u32) -> Result<Option<SnapshotRecord>> {
        self.ensure_configured()?;
        self.find_listed(number)
    }

    /// The pre snapshot `record` is paired with, if it names one.
    pub fn previous(&self, record: &SnapshotRecord) -> Result<Option<SnapshotRecord>> {
        match record.previous_number {
            Some(number) => self.find(number),
            None => Ok(None),
        }
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.configured() {
            Ok(())
        } else {
            Err(SnapshotError::SnapperNotConfigured {
                config: self.config.config_name.clone(),
            })
        }
    }

    /// Listing without the configuration probe; callers have already probed.
    fn list(&self) -> Result<Vec<SnapshotRecord>> {
        let invocation = SnapperCommand::List.invocation(&self.config);
        log::info!("Retrieving snapshots list: {invocation}");

        let output = self
            .runner
            .run(&invocation)
            .map_err(|e| SnapshotError::ListingFailed(format!("failed to run {invocation}: {e}")))?;

        if !output.success() {
            return Err(SnapshotError::ListingFailed(format!(
                "{invocation} finished with {}: {}",
                output.status_text(),
                output.stderr.trim()
            )));
        }

        listing::parse(&output.stdout)
    }

    fn find_listed(&self, number: u32) -> Result<Option<SnapshotRecord>> {
        Ok(self.list()?.into_iter().find(|record| record.number == number))
    }
}


#[cfg(test)]
mod tests {
    use std::io;

    use super::command::{CommandOutput, MockCommandRunner};
    use super::testing::*;
    use super::*;
    use crate::snapshot::SnapshotType;

    #[test]
    fn configured_when_config_is_listed() {
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        assert!(snapper(mock).configured());
    }

    #[test]
    fn not_configured_when_probe_fails() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::exited(1, "")));
        assert!(!snapper(mock).configured());

        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "no snapper")));
        assert!(!snapper(mock).configured());
    }

    #[test]
    fn all_returns_listing_in_order() {
        let records = vec![
            record(1, SnapshotType::Single, None),
            record(2, SnapshotType::Pre, None),
            record(3, SnapshotType::Post, Some(2)),
        ];
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        expect_listing(&mut mock, &records, 1);

        assert_eq!(snapper(mock).all().unwrap(), records);
    }

    #[test]
    fn empty_listing_is_empty_vec() {
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        expect_listing(&mut mock, &[], 1);

        assert!(snapper(mock).all().unwrap().is_empty());
    }

    #[test]
    fn find_returns_exact_record_or_none() {
        let records = vec![
            record(1, SnapshotType::Single, None),
            record(4, SnapshotType::Post, Some(3)),
        ];

        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        expect_listing(&mut mock, &records, 1);
        assert_eq!(snapper(mock).find(4).unwrap(), Some(records[1].clone()));

        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        expect_listing(&mut mock, &records, 1);
        assert_eq!(snapper(mock).find(100).unwrap(), None);
    }

    #[test]
    fn previous_resolves_through_find() {
        let pre = record(10, SnapshotType::Pre, None);
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        expect_listing(&mut mock, &[pre.clone()], 1);

        let single = record(1, SnapshotType::Single, Some(10));
        assert_eq!(snapper(mock).previous(&single).unwrap(), Some(pre));
    }

    #[test]
    fn previous_without_number_runs_nothing() {
        let mock = MockCommandRunner::new();
        let single = record(1, SnapshotType::Single, None);
        assert_eq!(snapper(mock).previous(&single).unwrap(), None);
    }

    #[test]
    fn unconfigured_lookups_never_list() {
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, false);
        let err = snapper(mock).all().unwrap_err();
        assert!(matches!(err, SnapshotError::SnapperNotConfigured { .. }));

        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, false);
        let err = snapper(mock).find(1).unwrap_err();
        assert!(matches!(err, SnapshotError::SnapperNotConfigured { .. }));
    }

    #[test]
    fn failing_listing_is_reported() {
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        mock.expect_run()
            .withf(|invocation| is_list(invocation))
            .times(1)
            .returning(|_| {
                Ok(CommandOutput {
                    status: Some(1),
                    stdout: String::new(),
                    stderr: "Unknown config.\n".to_string(),
                })
            });

        let err = snapper(mock).all().unwrap_err();
        match err {
            SnapshotError::ListingFailed(message) => assert!(message.contains("Unknown config.")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_listing_propagates() {
        let mut mock = MockCommandRunner::new();
        expect_probe(&mut mock, true);
        mock.expect_run()
            .withf(|invocation| is_list(invocation))
            .times(1)
            .returning(|_| Ok(CommandOutput::exited(0, "# | Type | Pre # | Date | User | Cleanup | Description\n1 | bogus | | 2015-05-13 16:00:00 | root | | x\n")));

        let err = snapper(mock).all().unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedListing { line: 2, .. }));
    }
}
