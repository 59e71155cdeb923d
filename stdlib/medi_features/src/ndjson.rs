//! Newline-delimited JSON training records

use crate::error::SchemaError;
use crate::record::RawRecord;
use serde_json::Value;

/// Parse one JSON object per line, skipping blank lines.
///
/// Each record is paired with its 1-based line number in `text`, so a
/// failure found later can still point at the right place in the file.
pub fn records_from_ndjson(text: &str) -> Result<Vec<(usize, RawRecord)>, SchemaError> {
    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => records.push((line_no, map)),
            Ok(_) => {
                return Err(SchemaError::MalformedRecord {
                    line: line_no,
                    message: "expected a JSON object".into(),
                })
            }
            Err(e) => {
                return Err(SchemaError::MalformedRecord {
                    line: line_no,
                    message: e.to_string(),
                })
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_file_line_numbers_across_blank_lines() {
        let records = records_from_ndjson("{\"Age\": 1}\n\n  \n{\"Age\": 2}\n").unwrap();
        let lines: Vec<usize> = records.iter().map(|(line, _)| *line).collect();
        assert_eq!(lines, vec![1, 4]);
        assert_eq!(records[1].1["Age"], 2);
    }

    #[test]
    fn non_object_line_is_located() {
        let err = records_from_ndjson("{\"Age\": 1}\n\n[1, 2]\n").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedRecord { line: 3, .. }), "{err}");
    }

    #[test]
    fn broken_json_is_located() {
        let err = records_from_ndjson("{\"Age\": 1}\n{\"Age\": \n").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedRecord { line: 2, .. }), "{err}");
    }
}
