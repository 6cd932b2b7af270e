//! `snapper list` output parser.
//!
//! The output is a pipe table:
//!
//! ```text
//! Type   | # | Pre # | Date                             | User | Cleanup | Description  | Userdata
//! -------+---+-------+----------------------------------+------+---------+--------------+-------------
//! single | 0 |       |                                  | root |         | current      |
//! pre    | 3 |       | Wed 13 May 2015 05:02:54 PM WEST | root | number  | zypp(zypper) | important=no
//! ```
//!
//! Columns are located through the header when it carries snapper's titles,
//! otherwise the positional layout `# | Type | Pre # | Date | User | Cleanup |
//! Description [| Userdata]` is assumed. Newer snapper versions draw the table
//! with `│`, both delimiters are accepted.
//!
//! Rows are returned in output order, nothing is sorted here.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use crate::error::{Result, SnapshotError};
use crate::snapshot::{parse_userdata, CleanupAlgorithm, SnapshotRecord, SnapshotType};

const DELIMITERS: [char; 2] = ['|', '│'];

const DATE_FORMATS: &[&str] = &[
    "%a %d %b %Y %I:%M:%S %p",
    "%a %d %b %Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Field positions within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    number: usize,
    kind: usize,
    previous: usize,
    date: usize,
    user: usize,
    cleanup: usize,
    description: usize,
    userdata: Option<usize>,
    /// Number of fields in the header row.
    width: usize,
}

impl Columns {
    const POSITIONAL: Columns = Columns {
        number: 0,
        kind: 1,
        previous: 2,
        date: 3,
        user: 4,
        cleanup: 5,
        description: 6,
        userdata: Some(7),
        width: 8,
    };

    fn from_header(header: &str) -> Columns {
        let titles: Vec<String> = header
            .split(DELIMITERS)
            .map(|title| title.trim().to_ascii_lowercase())
            .collect();
        let find = |name: &str| titles.iter().position(|title| title == name);

        match (
            find("#"),
            find("type"),
            find("pre #"),
            find("date"),
            find("user"),
            find("cleanup"),
            find("description"),
        ) {
            (Some(number), Some(kind), Some(previous), Some(date), Some(user), Some(cleanup), Some(description)) => {
                Columns {
                    number,
                    kind,
                    previous,
                    date,
                    user,
                    cleanup,
                    description,
                    userdata: find("userdata"),
                    width: titles.len(),
                }
            }
            _ => {
                log::debug!("unrecognised listing header {header:?}, using positional columns");
                Columns {
                    width: titles.len(),
                    ..Columns::POSITIONAL
                }
            }
        }
    }

    /// Highest index a row must reach; userdata is optional.
    fn required_len(&self) -> usize {
        [
            self.number,
            self.kind,
            self.previous,
            self.date,
            self.user,
            self.cleanup,
            self.description,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// Parses the full text of `snapper list`.
///
/// Empty output, or a header without data rows, yields an empty vector.
pub fn parse(text: &str) -> Result<Vec<SnapshotRecord>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(Vec::new());
    };
    let columns = Columns::from_header(header);

    let mut records = Vec::new();
    for (line_no, line) in lines {
        if is_separator(line) {
            continue;
        }
        if let Some(record) = parse_row(line, line_no, &columns)? {
            records.push(record);
        }
    }

    log::debug!("parsed {} snapshots from listing", records.len());
    Ok(records)
}

fn is_separator(line: &str) -> bool {
    line.chars()
        .all(|c| matches!(c, '-' | '+' | '=' | '─' | '┼' | '│' | '|' | ' ' | '\t'))
}

/// Byte ranges of the delimited fields of `line`.
fn field_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (index, delimiter) in line.match_indices(DELIMITERS) {
        spans.push((start, index));
        start = index + delimiter.len();
    }
    spans.push((start, line.len()));
    spans
}

/// Returns `None` for the synthetic "current" row.
fn parse_row(line: &str, line_no: usize, columns: &Columns) -> Result<Option<SnapshotRecord>> {
    let spans = field_spans(line);

    if spans.len() < columns.required_len() {
        return Err(SnapshotError::malformed(
            line_no,
            format!(
                "expected at least {} fields, found {}",
                columns.required_len(),
                spans.len()
            ),
        ));
    }

    // surplus delimiters belong to the description, the only free-text column
    let extra = spans
        .len()
        .saturating_sub(columns.width.max(columns.required_len()));
    let field = |index: usize| {
        let index = if index > columns.description { index + extra } else { index };
        spans
            .get(index)
            .map(|&(start, end)| line[start..end].trim())
            .unwrap_or("")
    };
    let description = {
        let (start, _) = spans[columns.description];
        let (_, end) = spans[columns.description + extra];
        line[start..end].trim()
    };

    // newer snapper suffixes the active/default snapshot with `-`, `+` or `*`
    let number_text = field(columns.number).trim_end_matches(['-', '+', '*']);
    if number_text.is_empty() || number_text == "0" {
        return Ok(None);
    }
    let number: u32 = number_text
        .parse()
        .map_err(|_| SnapshotError::malformed(line_no, format!("invalid snapshot number '{number_text}'")))?;

    let kind: SnapshotType = field(columns.kind)
        .parse()
        .map_err(|reason: String| SnapshotError::malformed(line_no, reason))?;

    let previous_text = field(columns.previous);
    let previous_number = if previous_text.is_empty() {
        None
    } else {
        let previous = previous_text.parse::<u32>().map_err(|_| {
            SnapshotError::malformed(line_no, format!("invalid pre number '{previous_text}'"))
        })?;
        Some(previous)
    };

    let timestamp = parse_timestamp(field(columns.date))
        .map_err(|reason| SnapshotError::malformed(line_no, reason))?;

    let userdata = columns
        .userdata
        .map(|index| parse_userdata(field(index)))
        .unwrap_or_default();

    Ok(Some(SnapshotRecord {
        number,
        kind,
        previous_number,
        timestamp,
        user: field(columns.user).to_string(),
        cleanup_algo: CleanupAlgorithm::parse(field(columns.cleanup)),
        description: description.to_string(),
        userdata,
    }))
}

/// Parses snapper's date column, e.g. `Wed 13 May 2015 05:03:13 PM WEST`.
pub fn parse_timestamp(text: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("missing date".to_string());
    }

    let (body, offset) = split_zone(text);

    let naive = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(body, format).ok())
        .ok_or_else(|| format!("unrecognised date '{text}'"))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| format!("ambiguous date '{text}'"))
}

fn split_zone(text: &str) -> (&str, FixedOffset) {
    let utc = Utc.fix();

    let Some((body, zone)) = text.rsplit_once(' ') else {
        return (text, utc);
    };

    if let Some(offset) = zone_offset(zone) {
        return (body, offset);
    }

    let looks_like_zone = (2..=5).contains(&zone.len())
        && zone.chars().all(|c| c.is_ascii_uppercase())
        && zone != "AM"
        && zone != "PM";
    if looks_like_zone {
        log::warn!("unknown time zone '{zone}' in snapper listing, assuming UTC");
        return (body, utc);
    }

    (text, utc)
}

fn zone_offset(zone: &str) -> Option<FixedOffset> {
    if let Some(sign) = zone.chars().next().filter(|c| *c == '+' || *c == '-') {
        // `+hh`, `+hhmm` or `+hh:mm`; tzdata abbreviates some zones as `-03`
        let digits: String = zone[1..].chars().filter(|c| *c != ':').collect();
        if !matches!(digits.len(), 2 | 4) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let hours: i32 = digits[..2].parse().ok()?;
        let minutes: i32 = if digits.len() == 4 { digits[2..].parse().ok()? } else { 0 };
        let seconds = hours * 3600 + minutes * 60;
        return FixedOffset::east_opt(if sign == '-' { -seconds } else { seconds });
    }

    let minutes = match zone {
        "UTC" | "GMT" | "Z" | "WET" => 0,
        "WEST" | "CET" | "BST" => 60,
        "CEST" | "EET" => 120,
        "EEST" | "MSK" => 180,
        "IST" => 330,
        "JST" => 540,
        "EST" => -300,
        "EDT" => -240,
        "CST" => -360,
        "CDT" => -300,
        "MST" => -420,
        "MDT" => -360,
        "PST" => -480,
        "PDT" => -420,
        _ => return None,
    };
    FixedOffset::east_opt(minutes * 60)
}
