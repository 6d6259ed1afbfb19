//! Spreadsheet rendering via rust_xlsxwriter.

use rust_xlsxwriter::{Color, Format, Image, Workbook, XlsxError};
use serde_json::Value;

use rsac_core::error::{ReportError, Result};
use rsac_core::models::Row;

use crate::images::ChartImage;

/// Column width bounds, in character units.
const MIN_COLUMN_WIDTH: usize = 12;
const MAX_COLUMN_WIDTH: usize = 40;

/// Vertical space reserved per embedded chart, in rows.
const CHART_ROW_STRIDE: u32 = 22;

/// Render export rows into a styled workbook: title row, distinct header
/// styling, zebra-striped data rows, content-sized column widths, and chart
/// images anchored below the data table.
pub fn render_workbook(title: &str, rows: &[Row], charts: &[ChartImage]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(title)).map_err(xlsx_err)?;

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1F4E78));
    let zebra_format = Format::new().set_background_color(Color::RGB(0xF2F2F2));

    worksheet
        .write_string_with_format(0, 0, title, &title_format)
        .map_err(xlsx_err)?;

    let headers: Vec<String> = rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    let header_row: u32 = 2;
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(header_row, col as u16, header, &header_format)
            .map_err(xlsx_err)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let excel_row = header_row + 1 + i as u32;
        let striped = i % 2 == 1;
        for (col, value) in row.values().enumerate() {
            write_cell(worksheet, excel_row, col as u16, value, striped.then_some(&zebra_format))
                .map_err(xlsx_err)?;
        }
    }

    for (col, header) in headers.iter().enumerate() {
        let content = rows
            .iter()
            .map(|row| {
                row.values()
                    .nth(col)
                    .map(|v| crate::csv::cell_text(v).len())
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);
        let width = content.max(header.len()).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col as u16, width as f64)
            .map_err(xlsx_err)?;
    }

    // Chart images below the table at fixed anchors.
    let mut anchor = header_row + rows.len() as u32 + 3;
    for chart in charts {
        match Image::new_from_buffer(&chart.png) {
            Ok(image) => {
                worksheet
                    .write_string_with_format(anchor, 0, &chart.title, &title_format)
                    .map_err(xlsx_err)?;
                worksheet
                    .insert_image(anchor + 1, 0, &image)
                    .map_err(xlsx_err)?;
                anchor += CHART_ROW_STRIDE;
            }
            Err(e) => {
                tracing::warn!(chart = %chart.title, error = %e, "Skipping unreadable chart image");
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    format: Option<&Format>,
) -> std::result::Result<(), XlsxError> {
    match (value, format) {
        (Value::Number(n), Some(f)) if n.as_f64().is_some() => {
            worksheet.write_number_with_format(row, col, n.as_f64().unwrap_or(0.0), f)?;
        }
        (Value::Number(n), None) if n.as_f64().is_some() => {
            worksheet.write_number(row, col, n.as_f64().unwrap_or(0.0))?;
        }
        (other, Some(f)) => {
            worksheet.write_string_with_format(row, col, crate::csv::cell_text(other), f)?;
        }
        (other, None) => {
            worksheet.write_string(row, col, crate::csv::cell_text(other))?;
        }
    }
    Ok(())
}

/// Worksheet names are limited to 31 characters.
fn sheet_name(title: &str) -> String {
    title.chars().take(31).collect()
}

fn xlsx_err(e: XlsxError) -> ReportError {
    ReportError::Export(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        (1..=3)
            .map(|i| {
                let mut row = Row::new();
                row.insert("SNO".to_string(), Value::from(i));
                row.insert("DISTRICT".to_string(), Value::from("Lucknow"));
                row.insert("SARUS COUNT".to_string(), Value::from(i * 2));
                row
            })
            .collect()
    }

    #[test]
    fn test_workbook_renders_to_xlsx_bytes() {
        let bytes = render_workbook("Sarus Report", &rows(), &[]).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_malformed_chart_is_skipped_not_fatal() {
        let bad = ChartImage {
            title: "district".to_string(),
            png: vec![0x89, b'P', b'N', b'G'], // signature only, not decodable
        };
        let bytes = render_workbook("Sarus Report", &rows(), &[bad]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_rows_still_produce_workbook() {
        let bytes = render_workbook("Sarus Report", &[], &[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_sheet_name_truncated() {
        assert_eq!(sheet_name("a".repeat(40).as_str()).len(), 31);
    }
}
