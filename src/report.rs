//! Report rendering: the fixed-width table and the aggregate
//! statistics. Pure functions of the enriched record list.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::FileRecord;

/// Placeholder for missing owner fields and MIME types.
const UNKNOWN: &str = "unknown";

/// Decimal size units, largest first.
const UNITS: [(&str, u64); 4] = [
    ("TB", 1_000_000_000_000),
    ("GB", 1_000_000_000),
    ("MB", 1_000_000),
    ("KB", 1_000),
];

/// Format a byte count with the largest unit whose quotient exceeds 1,
/// to one decimal place; "0" when not even a KB's worth.
pub fn bytes2str(bytes: u64) -> String {
    for (unit, divisor) in UNITS {
        let quotient = bytes as f64 / divisor as f64;
        if quotient > 1.0 {
            return format!("{:.1}{}", quotient, unit);
        }
    }
    "0".to_string()
}

/// Render the report table: index, size, name, comma-joined parent
/// names, first owner's email and display name, MIME type.
pub fn render_table(records: &[FileRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "     {:<6}\t{:<40}\t{:<25}\t{:<30}\t{:<25}\t{:<8}\n",
        "Bytes", "Name", "Parent Names", "Owner Email", "Owner Name", "MimeType"
    ));

    for (i, record) in records.iter().enumerate() {
        let size = bytes2str(record.quota_bytes_used);
        let parent_names = record.parent_names.join(",");
        let owner = record.owners.first();
        let owner_email = owner
            .and_then(|o| o.email_address.as_deref())
            .unwrap_or(UNKNOWN);
        let owner_name = owner
            .and_then(|o| o.display_name.as_deref())
            .unwrap_or(UNKNOWN);
        let mime_type = record.mime_type.as_deref().unwrap_or(UNKNOWN);

        out.push_str(&format!(
            "{:<4} {:<6}\t{:<40}\t{:<25}\t{:<30}\t{:<25}\t{:<8}\n",
            i, size, record.name, parent_names, owner_email, owner_name, mime_type
        ));
    }

    out
}

/// Aggregate statistics over the fetched set: a MIME-type histogram
/// sorted by descending count, and the exact total byte sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    /// (mime type, count), descending by count; ties by MIME type.
    pub mime_counts: Vec<(String, usize)>,
    pub total_bytes: u64,
}

impl AggregateReport {
    pub fn from_records(records: &[FileRecord]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut total_bytes: u64 = 0;

        for record in records {
            total_bytes += record.quota_bytes_used;
            let mime = record.mime_type.as_deref().unwrap_or(UNKNOWN);
            *counts.entry(mime).or_insert(0) += 1;
        }

        let mut mime_counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(mime, count)| (mime.to_string(), count))
            .collect();
        // BTreeMap iteration gives the alphabetical tiebreak; the
        // stable sort then orders by count alone.
        mime_counts.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            mime_counts,
            total_bytes,
        }
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Aggregated file types: {{")?;
        let mut first = true;
        for (mime, count) in &self.mime_counts {
            if !first {
                writeln!(f, ",")?;
            }
            write!(f, "  \"{}\": {}", mime, count)?;
            first = false;
        }
        if !first {
            writeln!(f)?;
        }
        writeln!(f, "}}")?;
        writeln!(f)?;
        write!(f, "Total bytes displayed: {}", bytes2str(self.total_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileRecord, Owner};

    fn record(name: &str, bytes: u64, mime: &str) -> FileRecord {
        FileRecord {
            id: name.to_string(),
            name: name.to_string(),
            quota_bytes_used: bytes,
            mime_type: Some(mime.to_string()),
            parents: Vec::new(),
            owners: vec![Owner {
                email_address: Some(format!("{}@x.com", name)),
                display_name: Some(name.to_string()),
            }],
            parent_names: Vec::new(),
        }
    }

    #[test]
    fn test_bytes2str_unit_selection() {
        assert_eq!(bytes2str(1_500_000), "1.5MB");
        assert_eq!(bytes2str(2_000_000), "2.0MB");
        assert_eq!(bytes2str(1_500), "1.5KB");
        assert_eq!(bytes2str(2_500_000_000), "2.5GB");
        assert_eq!(bytes2str(3_100_000_000_000), "3.1TB");
    }

    #[test]
    fn test_bytes2str_floor() {
        assert_eq!(bytes2str(0), "0");
        assert_eq!(bytes2str(500), "0");
        // Exactly one KB does not exceed 1.
        assert_eq!(bytes2str(1_000), "0");
        assert_eq!(bytes2str(1_001), "1.0KB");
    }

    #[test]
    fn test_histogram_sorted_descending() {
        let records = vec![
            record("a", 1, "text/plain"),
            record("b", 1, "application/pdf"),
            record("c", 1, "application/pdf"),
            record("d", 1, "image/png"),
        ];

        let report = AggregateReport::from_records(&records);
        assert_eq!(report.mime_counts[0], ("application/pdf".to_string(), 2));
        // Tie between the singletons resolves alphabetically.
        assert_eq!(report.mime_counts[1], ("image/png".to_string(), 1));
        assert_eq!(report.mime_counts[2], ("text/plain".to_string(), 1));

        let total: usize = report.mime_counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_total_bytes_exact() {
        let records = vec![
            record("a", 2_000_000, "application/pdf"),
            record("b", 500, "application/pdf"),
        ];

        let report = AggregateReport::from_records(&records);
        assert_eq!(report.total_bytes, 2_000_500);
    }

    #[test]
    fn test_aggregate_display() {
        let records = vec![
            record("a", 2_000_000, "application/pdf"),
            record("b", 500, "application/pdf"),
        ];

        let rendered = AggregateReport::from_records(&records).to_string();
        assert!(rendered.contains("\"application/pdf\": 2"));
        assert!(rendered.contains("Total bytes displayed: 2.0MB"));
    }

    #[test]
    fn test_table_empty_parent_column() {
        let mut with_parent = record("a", 2_000_000, "application/pdf");
        with_parent.parent_names.push("Folder1".to_string());
        let without_parent = record("b", 500, "application/pdf");

        let table = render_table(&[with_parent, without_parent]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert!(lines[1].contains("Folder1"));
        assert!(lines[1].contains("2.0MB"));

        // No parents renders an empty (padded) column.
        assert!(!lines[2].contains("Folder1"));
        let columns: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(columns[2].trim(), "");
    }

    #[test]
    fn test_table_missing_owner_placeholder() {
        let mut orphan = record("a", 0, "text/plain");
        orphan.owners.clear();

        let table = render_table(&[orphan]);
        assert!(table.contains("unknown"));
    }

    #[test]
    fn test_multiple_parent_names_joined() {
        let mut rec = record("a", 5_000, "text/plain");
        rec.parent_names = vec!["Folder1".to_string(), "Folder2".to_string()];

        let table = render_table(&[rec]);
        assert!(table.contains("Folder1,Folder2"));
    }
}
