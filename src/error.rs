//! Error types for snapshot listing, pairing and creation.

use std::fmt;
use std::path::PathBuf;

/// Why no pre snapshot could be paired with a new post snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingMiss {
    /// An explicitly requested pre number is not in the listing.
    Unknown(u32),
    /// The most recent non-single snapshot is a post, so its pre is already closed.
    AlreadyPaired(u32),
    /// The listing holds no pre or post snapshot at all.
    NoCandidate,
}

impl fmt::Display for PairingMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingMiss::Unknown(number) => write!(f, "snapshot #{number} does not exist"),
            PairingMiss::AlreadyPaired(number) => {
                write!(f, "most recent snapshot #{number} is already a post snapshot")
            }
            PairingMiss::NoCandidate => write!(f, "no pre snapshot found"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapper is not configured: no '{config}' configuration registered")]
    SnapperNotConfigured { config: String },

    #[error("snapshot could not be created: {reason}")]
    SnapshotCreationFailed { reason: String },

    #[error("previous filesystem snapshot was not found: {0}")]
    PreviousSnapshotNotFound(PairingMiss),

    #[error("malformed snapshot listing at line {line}: {reason}")]
    MalformedListing { line: usize, reason: String },

    #[error("snapshot listing failed: {0}")]
    ListingFailed(String),
}

impl SnapshotError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SnapshotError::MalformedListing {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn creation_failed(reason: impl Into<String>) -> Self {
        SnapshotError::SnapshotCreationFailed {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
