//! JSON output for snapshot records.
//!
//! Serializes records for scripting and piping.

use serde::Serialize;

use crate::snapshot::SnapshotRecord;

pub fn render(records: &[SnapshotRecord]) -> String {
    to_json(&records)
}

pub fn render_one(record: &SnapshotRecord) -> String {
    to_json(record)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{CleanupAlgorithm, SnapshotType};
    use chrono::DateTime;

    #[test]
    fn record_fields_use_listing_names() {
        let record = SnapshotRecord {
            number: 4,
            kind: SnapshotType::Post,
            previous_number: Some(3),
            timestamp: DateTime::parse_from_rfc3339("2015-05-13T17:03:13+01:00").unwrap(),
            user: "root".to_string(),
            cleanup_algo: Some(CleanupAlgorithm::EmptyPrePost),
            description: "zypp(zypper)".to_string(),
            userdata: Default::default(),
        };

        let value: serde_json::Value = serde_json::from_str(&render_one(&record)).unwrap();
        assert_eq!(value["number"], 4);
        assert_eq!(value["type"], "post");
        assert_eq!(value["previous_number"], 3);
        assert_eq!(value["timestamp"], "2015-05-13T17:03:13+01:00");
        assert_eq!(value["cleanup_algo"], "empty-pre-post");
        assert!(value.get("userdata").is_none());

        let list: serde_json::Value = serde_json::from_str(&render(&[record])).unwrap();
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_list_is_empty_array() {
        assert_eq!(render(&[]), "[]");
    }
}
