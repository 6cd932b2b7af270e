//! Table rendering for snapshot listings.
//!
//! Emits the same pipe layout `snapper list` prints, so the output can be
//! fed back through the listing parser:
//! - one header row with snapper's column titles
//! - a `---+---` separator
//! - one row per snapshot, in the order given

use crate::snapshot::{format_userdata, SnapshotRecord};

pub const DATE_FORMAT: &str = "%a %d %b %Y %I:%M:%S %p %:z";

const HEADERS: [&str; 8] = ["#", "Type", "Pre #", "Date", "User", "Cleanup", "Description", "Userdata"];

pub fn render(records: &[SnapshotRecord]) -> String {
    let rows: Vec<[String; 8]> = records.iter().map(row).collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, &HEADERS.map(String::from), &widths);

    let last = widths.len() - 1;
    let separator: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let padding = if index == 0 || index == last { 1 } else { 2 };
            "-".repeat(width + padding)
        })
        .collect();
    output.push_str(&separator.join("+"));
    output.push('\n');

    for row in &rows {
        push_row(&mut output, row, &widths);
    }

    output
}

fn row(record: &SnapshotRecord) -> [String; 8] {
    [
        record.number.to_string(),
        record.kind.to_string(),
        record.previous_number.map(|n| n.to_string()).unwrap_or_default(),
        record.timestamp.format(DATE_FORMAT).to_string(),
        record.user.clone(),
        record
            .cleanup_algo
            .as_ref()
            .map(|algo| algo.to_string())
            .unwrap_or_default(),
        record.description.clone(),
        format_userdata(&record.userdata),
    ]
}

fn push_row(output: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    output.push_str(line.join(" | ").trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapper::listing;
    use crate::snapshot::{parse_userdata, CleanupAlgorithm, SnapshotType};
    use chrono::DateTime;

    fn sample() -> Vec<SnapshotRecord> {
        vec![
            SnapshotRecord {
                number: 3,
                kind: SnapshotType::Pre,
                previous_number: None,
                timestamp: DateTime::parse_from_rfc3339("2015-05-13T17:02:54+01:00").unwrap(),
                user: "root".to_string(),
                cleanup_algo: Some(CleanupAlgorithm::Number),
                description: "zypp(zypper)".to_string(),
                userdata: parse_userdata("important=yes"),
            },
            SnapshotRecord {
                number: 4,
                kind: SnapshotType::Post,
                previous_number: Some(3),
                timestamp: DateTime::parse_from_rfc3339("2015-05-13T17:03:13+01:00").unwrap(),
                user: "root".to_string(),
                cleanup_algo: Some(CleanupAlgorithm::Other("custom".to_string())),
                description: String::new(),
                userdata: Default::default(),
            },
        ]
    }

    #[test]
    fn renders_snapper_layout() {
        let text = render(&sample());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("# | Type | Pre # | Date"));
        assert!(lines[1].starts_with("--+-"));
        assert!(lines[2].contains("Wed 13 May 2015 05:02:54 PM +01:00"));
        assert!(lines[2].ends_with("important=yes"));
        assert!(lines[3].starts_with("4 | post | 3"));
    }

    #[test]
    fn rendered_table_parses_back() {
        let records = sample();
        let parsed = listing::parse(&render(&records)).unwrap();

        assert_eq!(parsed, records);
        for (original, reparsed) in records.iter().zip(&parsed) {
            assert_eq!(original.timestamp.timestamp(), reparsed.timestamp.timestamp());
        }
    }

    #[test]
    fn description_with_pipes_parses_back() {
        let mut records = sample();
        records[0].description = "zypper in a | b".to_string();
        records[1].description = "x │ y".to_string();

        let parsed = listing::parse(&render(&records)).unwrap();
        assert_eq!(parsed[0].description, "zypper in a | b");
        assert_eq!(parsed[0].userdata, records[0].userdata);
        assert_eq!(parsed, records);
    }

    #[test]
    fn empty_table_parses_to_nothing() {
        let text = render(&[]);
        assert_eq!(text.lines().count(), 2);
        assert!(listing::parse(&text).unwrap().is_empty());
    }
}
