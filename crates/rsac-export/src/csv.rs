//! CSV rendering.

use serde_json::Value;

use rsac_core::error::{ReportError, Result};
use rsac_core::models::Row;

/// Plain-text cell rendering for CSV output.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render export rows as CSV with synthetic title/total lines prepended as
/// raw text above the CSV body. Header order follows the first row's keys.
pub fn render_csv(title: &str, total: f64, rows: &[Row]) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    if let Some(first) = rows.first() {
        writer
            .write_record(first.keys().map(String::as_str))
            .map_err(csv_err)?;
        for row in rows {
            writer
                .write_record(row.values().map(cell_text))
                .map_err(csv_err)?;
        }
    }

    let body = writer
        .into_inner()
        .map_err(|e| ReportError::Export(e.to_string()))?;
    let body = String::from_utf8(body).map_err(|e| ReportError::Export(e.to_string()))?;

    Ok(format!("{title}\nTotal Sarus Count,{total}\n\n{body}"))
}

fn csv_err(e: ::csv::Error) -> ReportError {
    ReportError::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(district: &str, count: i64) -> Row {
        let mut row = Row::new();
        row.insert("SNO".to_string(), Value::from(1));
        row.insert("DISTRICT".to_string(), Value::from(district));
        row.insert("SARUS COUNT".to_string(), Value::from(count));
        row
    }

    #[test]
    fn test_csv_has_title_total_and_header() {
        let out = render_csv("RSAC Sarus Crane Report", 10.0, &[row("Lucknow", 4), row("Etawah", 6)])
            .unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("RSAC Sarus Crane Report"));
        assert_eq!(lines.next(), Some("Total Sarus Count,10"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("SNO,DISTRICT,SARUS COUNT"));
        assert_eq!(lines.next(), Some("1,Lucknow,4"));
        assert_eq!(lines.next(), Some("1,Etawah,6"));
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let out = render_csv("t", 0.0, &[row("Lucknow, North", 1)]).unwrap();
        assert!(out.contains("\"Lucknow, North\""));
    }

    #[test]
    fn test_csv_null_renders_empty() {
        let mut r = row("Lucknow", 2);
        r.insert("SITE".to_string(), Value::Null);
        let out = render_csv("t", 2.0, &[r]).unwrap();
        assert!(out.lines().last().unwrap().ends_with("Lucknow,2,"));
    }
}
