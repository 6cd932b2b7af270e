use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

/// Kind of snapshot as reported by snapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    Single,
    Pre,
    Post,
}

impl SnapshotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotType::Single => "single",
            SnapshotType::Pre => "pre",
            SnapshotType::Post => "post",
        }
    }
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(SnapshotType::Single),
            "pre" => Ok(SnapshotType::Pre),
            "post" => Ok(SnapshotType::Post),
            _ => Err(format!("unknown snapshot type '{}'", s.trim())),
        }
    }
}

/// Retention tag snapper attaches to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CleanupAlgorithm {
    Number,
    Timeline,
    EmptyPrePost,
    /// Any tag this crate does not know, kept verbatim.
    Other(String),
}

impl CleanupAlgorithm {
    pub fn as_str(&self) -> &str {
        match self {
            CleanupAlgorithm::Number => "number",
            CleanupAlgorithm::Timeline => "timeline",
            CleanupAlgorithm::EmptyPrePost => "empty-pre-post",
            CleanupAlgorithm::Other(tag) => tag,
        }
    }

    /// Blank text means no cleanup algorithm.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let algo = match text {
            "" => return None,
            "number" => CleanupAlgorithm::Number,
            "timeline" => CleanupAlgorithm::Timeline,
            "empty-pre-post" => CleanupAlgorithm::EmptyPrePost,
            other => CleanupAlgorithm::Other(other.to_string()),
        };
        Some(algo)
    }
}

impl fmt::Display for CleanupAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CleanupAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One row of `snapper list`.
///
/// Records are rebuilt from a fresh listing on every lookup and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRecord {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: SnapshotType,
    /// Number of the paired pre snapshot; only post snapshots carry one.
    pub previous_number: Option<u32>,
    pub timestamp: DateTime<FixedOffset>,
    pub user: String,
    pub cleanup_algo: Option<CleanupAlgorithm>,
    pub description: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub userdata: BTreeMap<String, String>,
}

impl SnapshotRecord {
    /// Snapshots created with `important=yes` are kept longer by snapper's cleanup.
    pub fn is_important(&self) -> bool {
        self.userdata
            .get("important")
            .is_some_and(|value| value.eq_ignore_ascii_case("yes"))
    }
}

/// Extra knobs for snapshot creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub cleanup: Option<CleanupAlgorithm>,
    pub important: bool,
}

/// Parses snapper's `key=value, key=value` userdata column.
pub fn parse_userdata(text: &str) -> BTreeMap<String, String> {
    text.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

pub fn format_userdata(userdata: &BTreeMap<String, String>) -> String {
    userdata
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
