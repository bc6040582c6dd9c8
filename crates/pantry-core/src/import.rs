//! Record file parsers
//!
//! Reads raw item records from CSV or JSON. Parsing here is strict about
//! the file shape (headers, JSON syntax) but lenient about field values:
//! values are handed to the normalizer as-is.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RawItemRecord, RawValue};

/// Columns the CSV reader understands
pub const CSV_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "unit_cost",
    "quantity",
    "kind",
    "expiration_date",
    "created_at",
    "archived",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown record format: {} (valid: csv, json)", s)),
        }
    }
}

/// Detect the format from a file extension
pub fn detect_format(path: &Path) -> Option<RecordFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}

/// Parse records in the given format
pub fn parse_records<R: Read>(reader: R, format: RecordFormat) -> Result<Vec<RawItemRecord>> {
    match format {
        RecordFormat::Csv => parse_csv(reader),
        RecordFormat::Json => parse_json(reader),
    }
}

/// Load a record file, detecting its format from the extension
pub fn load_file(path: &Path) -> Result<Vec<RawItemRecord>> {
    let format = detect_format(path).ok_or_else(|| {
        Error::Import(format!(
            "Cannot tell record format of {} (expected .csv or .json)",
            path.display()
        ))
    })?;
    let file = std::fs::File::open(path)?;
    let records = parse_records(file, format)?;
    debug!(path = %path.display(), format = %format, count = records.len(), "Loaded records");
    Ok(records)
}

/// Parse a JSON array of records
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<RawItemRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse CSV with a header row. Column order is free; unknown columns are
/// ignored and missing ones read as empty.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawItemRecord>> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    };
    let positions: Vec<Option<usize>> = CSV_COLUMNS.iter().map(|c| column(c)).collect();

    if positions[0].is_none() {
        return Err(Error::Import("CSV is missing the 'id' column".to_string()));
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let field = |idx: usize| -> Option<String> {
            positions[idx]
                .and_then(|p| row.get(p))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        records.push(RawItemRecord {
            id: field(0).map(RawValue::Text),
            name: field(1),
            unit_cost: field(2).map(RawValue::Text),
            quantity: field(3).map(RawValue::Text),
            kind: field(4),
            expiration_date: field(5),
            created_at: field(6),
            archived: field(7).map(RawValue::Text),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_batch;
    use std::path::PathBuf;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(&PathBuf::from("items.CSV")),
            Some(RecordFormat::Csv)
        );
        assert_eq!(
            detect_format(&PathBuf::from("export/items.json")),
            Some(RecordFormat::Json)
        );
        assert_eq!(detect_format(&PathBuf::from("items.txt")), None);
        assert_eq!(detect_format(&PathBuf::from("items")), None);
    }

    #[test]
    fn test_parse_csv() {
        let csv = "id,name,unit_cost,quantity,kind,expiration_date,created_at,archived
1,Flour,$1.50,2,pantry,2026-06-01,2026-01-12,false
2,Bananas,0.25,6,grocery,,2026-01-13,
3,Beans,not-a-price,,pantry,,2026-01-14,true";

        let raws = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(raws.len(), 3);
        assert_eq!(raws[0].name.as_deref(), Some("Flour"));
        assert_eq!(raws[1].expiration_date, None);

        let batch = normalize_batch(&raws);
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records[0].unit_cost, 1.5);
        assert_eq!(batch.records[2].unit_cost, 0.0);
        assert_eq!(batch.records[2].quantity, 1);
        assert!(batch.records[2].archived);
    }

    #[test]
    fn test_parse_csv_any_column_order() {
        let csv = "created_at,kind,ID,Name,notes
2026-01-12,pantry,a,Salt,ignored";

        let raws = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(raws[0].id, Some(RawValue::Text("a".to_string())));
        assert_eq!(raws[0].name.as_deref(), Some("Salt"));
        assert_eq!(raws[0].unit_cost, None);
    }

    #[test]
    fn test_parse_csv_requires_id_column() {
        let csv = "name,unit_cost\nSalt,1.00";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(Error::Import(_))));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[
            {"id": "1", "name": "Oats", "unit_cost": 3.25, "quantity": 2,
             "kind": "pantry", "created_at": "2026-01-12T08:00:00Z"},
            {"id": 2, "name": "Milk", "unitCost": "1.10", "type": "grocery",
             "createdAt": "2026-01-13"}
        ]"#;

        let raws = parse_json(json.as_bytes()).unwrap();
        assert_eq!(raws.len(), 2);

        let batch = normalize_batch(&raws);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[1].id, "2");
        assert_eq!(batch.records[1].unit_cost, 1.1);
    }

    #[test]
    fn test_parse_json_rejects_bad_syntax() {
        assert!(matches!(parse_json("[{".as_bytes()), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, r#"[{"id": "x", "kind": "pantry", "created_at": "2026-01-01"}]"#)
            .unwrap();
        assert_eq!(load_file(&path).unwrap().len(), 1);

        let unknown = dir.path().join("items.xml");
        std::fs::write(&unknown, "<items/>").unwrap();
        assert!(matches!(load_file(&unknown), Err(Error::Import(_))));
    }
}
