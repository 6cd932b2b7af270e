pub mod table;
pub mod json;

use crate::snapshot::SnapshotRecord;

pub fn print_list(records: &[SnapshotRecord], json_output: bool) {
    if json_output {
        println!("{}", json::render(records));
    } else if records.is_empty() {
        println!("No snapshots found.");
    } else {
        print!("{}", table::render(records));
    }
}

/// Prints one snapshot, followed by the pre snapshot it closes.
pub fn print_record(record: &SnapshotRecord, previous: Option<&SnapshotRecord>, json_output: bool) {
    if json_output {
        println!("{}", json::render_one(record));
        return;
    }

    print!("{}", table::render(std::slice::from_ref(record)));
    if record.is_important() {
        println!("\nimportant: yes");
    }
    match (record.previous_number, previous) {
        (Some(_), Some(pre)) => {
            println!("\npaired with:");
            print!("{}", table::render(std::slice::from_ref(pre)));
        }
        (Some(number), None) => println!("\npaired with #{number}, which no longer exists"),
        (None, _) => {}
    }
}
