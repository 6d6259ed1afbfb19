//! Export-row projection: report rows transformed for human display.
//!
//! Keys are renamed to display headers, the internal `gid` identifier is
//! dropped, a strictly increasing 1-based serial number is injected matching
//! output order, and date values are reformatted to a local date string.

use chrono::NaiveDate;
use serde_json::Value;

use rsac_core::models::Row;

/// Display header for a result column.
pub fn display_name(column: &str) -> String {
    match column {
        "sarus_count" => "SARUS COUNT".to_string(),
        "range_fore" => "RANGE FOREST".to_string(),
        "name_of_co" => "NAME OF COLONY".to_string(),
        other => other.to_uppercase().replace('_', " "),
    }
}

/// Reformat an ISO date (or timestamp prefix) to `DD/MM/YYYY`; anything
/// unparseable passes through unchanged.
fn display_date(value: &Value) -> Value {
    let Some(raw) = value.as_str() else {
        return value.clone();
    };
    let date_part = raw.split(|c| c == 'T' || c == ' ').next().unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Value::from(date.format("%d/%m/%Y").to_string()),
        Err(_) => value.clone(),
    }
}

/// Project report rows into export rows, preserving column order.
pub fn export_rows(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .enumerate()
        .map(|(index, source)| {
            let mut row = Row::new();
            row.insert("SNO".to_string(), Value::from(index as i64 + 1));
            for (key, value) in source {
                if key == "gid" {
                    continue;
                }
                let value = if key == "date" {
                    display_date(value)
                } else {
                    value.clone()
                };
                row.insert(display_name(key), value);
            }
            row
        })
        .collect()
}
