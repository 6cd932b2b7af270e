pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod snapper;
pub mod snapshot;

pub use config::Config;
pub use error::{ConfigError, PairingMiss, SnapshotError};
pub use snapper::command::{CommandOutput, CommandRunner, Invocation, SystemRunner};
pub use snapper::Snapper;
pub use snapshot::{CleanupAlgorithm, CreateOptions, SnapshotRecord, SnapshotType};
