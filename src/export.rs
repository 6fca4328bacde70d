use std::fs;
use std::io;
use std::path::Path;

use crate::constants::EXPORT_HEADER;
use crate::types::Record;

pub fn render_export(records: &[Record]) -> String {
    let mut out = String::new();
    push_row(&mut out, EXPORT_HEADER.iter().copied());
    for record in records {
        let row = record.to_row(true);
        push_row(&mut out, row.iter().map(String::as_str));
    }
    out
}

pub fn write_export(path: &Path, records: &[Record]) -> io::Result<()> {
    fs::write(path, render_export(records))
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (index, field) in fields.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&quote_field(field));
    }
    out.push('\n');
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_reader::parse_log_text;
    use crate::types::IssueCategory;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn export_has_header_and_sorted_issue_column() {
        let mut record = Record::new(12, "hunter", 1, "Garage", "MOVE", "Hallway").with_device("EMF");
        record.issues.insert(IssueCategory::Return);
        record.issues.insert(IssueCategory::Movement);
        let text = render_export(&[record]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "timestamp,entity_type,entity_id,room,device,boredom,fear,action,extra,issues",
                "12,hunter,1,Garage,EMF,0,0,MOVE,Hallway,movement;return",
            ]
        );
    }

    #[test]
    fn special_characters_are_quoted() {
        assert_eq!(quote_field("Boy's Bedroom"), "Boy's Bedroom");
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field("say \"boo\""), "\"say \"\"boo\"\"\"");
    }

    #[test]
    fn export_reads_back_as_the_same_records() {
        let records = vec![
            Record::new(1, "hunter", 1, "Van", "INIT", "Ray, the brave").with_device("EMF"),
            Record::new(2, "ghost", 68057, "Kitchen", "EVIDENCE", "\"ORBS\"").with_readings(4, 0),
            Record::new(2, "hunter", 1, "Van", "SWAP", "EMF->ORBS").with_readings(1, 2),
            Record::new(3, "hunter", 2, "Van", "INIT", "Egon\nSpengler"),
        ];
        let text = render_export(&records);
        let parsed = parse_log_text("combined.csv", &text).expect("export parses");
        let original: Vec<Vec<String>> = records.iter().map(|r| r.to_row(false)).collect();
        let reread: Vec<Vec<String>> = parsed.iter().map(|r| r.to_row(false)).collect();
        assert_eq!(original, reread);
    }

    #[test]
    fn write_export_fails_when_parent_is_missing() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let target = std::env::temp_dir()
            .join(format!("willow-missing-{now}"))
            .join("combined.csv");
        assert!(write_export(&target, &[]).is_err());
    }
}
