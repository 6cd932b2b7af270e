//! Pre/post pairing.
//!
//! A post snapshot must reference the pre snapshot taken before the same
//! operation. When the caller does not name it, the listing is scanned from
//! the highest number down:
//! - single snapshots are skipped, they never open or close a bracket
//! - the first pre found is the match
//! - a post found first means the last bracket is already closed
//!
//! Snapshot numbers are assumed to grow with creation time. Snapper does not
//! reuse numbers after deletion, but nothing here verifies that.

use std::cmp::Reverse;

use super::command::CommandRunner;
use super::Snapper;
use crate::error::{PairingMiss, Result, SnapshotError};
use crate::snapshot::{SnapshotRecord, SnapshotType};

/// Finds the open pre snapshot in `records`, which may be in any order.
pub fn open_pre(records: &[SnapshotRecord]) -> std::result::Result<u32, PairingMiss> {
    let mut bracketing: Vec<&SnapshotRecord> = records
        .iter()
        .filter(|record| record.kind != SnapshotType::Single)
        .collect();
    bracketing.sort_by_key(|record| Reverse(record.number));

    match bracketing.first() {
        Some(record) if record.kind == SnapshotType::Pre => Ok(record.number),
        Some(record) => Err(PairingMiss::AlreadyPaired(record.number)),
        None => Err(PairingMiss::NoCandidate),
    }
}

impl<R: CommandRunner> Snapper<R> {
    /// Number of the pre snapshot a new post snapshot would reference.
    ///
    /// An explicit `previous_number` only has to exist; its type is not checked.
    pub fn resolve_pre(&self, previous_number: Option<u32>) -> Result<u32> {
        self.ensure_configured()?;
        self.resolve_listed_pre(previous_number)
    }

    /// Pairing without the configuration probe.
    pub(crate) fn resolve_listed_pre(&self, previous_number: Option<u32>) -> Result<u32> {
        let resolved = match previous_number {
            Some(number) => match self.find_listed(number)? {
                Some(record) => Ok(record.number),
                None => Err(PairingMiss::Unknown(number)),
            },
            None => open_pre(&self.list()?),
        };

        resolved.map_err(|miss| {
            log::error!("Previous filesystem snapshot was not found: {miss}");
            SnapshotError::PreviousSnapshotNotFound(miss)
        })
    }
}
