//! Export assembly: fetch the full filtered row set and hand it to the
//! requested document formatter.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use rsac_core::alias;
use rsac_core::error::{ReportError, Result};
use rsac_core::models::Row;
use rsac_core::query;
use rsac_export::images::{decode_chart, ChartImage};
use rsac_export::{csv, excel, export_rows, pdf};
use rsac_store::ReportStore;

use crate::dto::{ChartPayloads, ExportQuery};

const REPORT_TITLE: &str = "RSAC Sarus Crane Report";

/// A rendered download: fixed name, content type and body.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Empty filtered sets export as a neutral message, not a document.
#[derive(Debug)]
pub enum ExportOutcome {
    NoData,
    File(ExportFile),
}

pub struct ExportService {
    store: Arc<dyn ReportStore>,
}

impl ExportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    pub async fn export(
        &self,
        query: &ExportQuery,
        charts: &ChartPayloads,
    ) -> Result<ExportOutcome> {
        let dataset = super::ReportService::resolve_dataset(query.table.as_deref())?;
        let caps = &dataset.capabilities;
        let filter = query::district_filter(query.district.as_deref(), caps);

        // Exports always run against the full filtered set.
        let rows = self.store.report_rows(dataset, filter.as_ref(), None).await?;
        if rows.is_empty() {
            return Ok(ExportOutcome::NoData);
        }

        let total: f64 = rows.iter().map(|row| number(row, "sarus_count")).sum();
        let legend_key = if caps.district { "district" } else { "site" };
        let legend = record_legend(&rows, legend_key);
        let projected = export_rows(&rows);

        let file = match query.format.as_str() {
            "csv" => ExportFile {
                filename: rsac_export::CSV_FILENAME,
                content_type: rsac_export::CSV_CONTENT_TYPE,
                bytes: csv::render_csv(REPORT_TITLE, total, &projected)?.into_bytes(),
            },
            "excel" => ExportFile {
                filename: rsac_export::EXCEL_FILENAME,
                content_type: rsac_export::EXCEL_CONTENT_TYPE,
                bytes: excel::render_workbook(REPORT_TITLE, &projected, &decode_charts(charts))?,
            },
            "pdf" => ExportFile {
                filename: rsac_export::PDF_FILENAME,
                content_type: rsac_export::PDF_CONTENT_TYPE,
                bytes: pdf::render_report_pdf(
                    REPORT_TITLE,
                    &projected,
                    &decode_charts(charts),
                    &legend,
                )?,
            },
            other => return Err(ReportError::UnknownFormat(other.to_string())),
        };
        Ok(ExportOutcome::File(file))
    }
}

fn number(row: &Row, column: &str) -> f64 {
    row.get(column).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Record counts per district (alias-merged) or site, alphabetical.
fn record_legend(rows: &[Row], key: &str) -> Vec<(String, i64)> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for row in rows {
        let Some(raw) = row.get(key).and_then(Value::as_str) else {
            continue;
        };
        let label = if key == "district" {
            alias::canonical(raw)
        } else {
            raw.to_string()
        };
        *counts.entry(label).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

fn decode_charts(payloads: &ChartPayloads) -> Vec<ChartImage> {
    let named = [
        ("Sarus Count by District", payloads.district.as_deref()),
        ("Sarus Count by Site", payloads.site.as_deref()),
        ("Sarus Count by Habitat", payloads.habitat.as_deref()),
    ];
    named
        .into_iter()
        .filter_map(|(title, payload)| decode_chart(title, payload?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsac_store::MemoryStore;

    fn service() -> ExportService {
        ExportService::new(Arc::new(MemoryStore::with_demo_data()))
    }

    fn query(format: &str, district: Option<&str>) -> ExportQuery {
        ExportQuery {
            table: Some("sarus_2_09_2020".to_string()),
            format: format.to_string(),
            district: district.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_unknown_format_is_client_error() {
        let err = service()
            .export(&query("docx", None), &ChartPayloads::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::UnknownFormat(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_empty_filter_yields_no_data() {
        let outcome = service()
            .export(&query("csv", Some("Ghazipur")), &ChartPayloads::default())
            .await
            .unwrap();
        assert!(matches!(outcome, ExportOutcome::NoData));
    }

    #[tokio::test]
    async fn test_csv_export_carries_full_total() {
        let outcome = service()
            .export(&query("csv", None), &ChartPayloads::default())
            .await
            .unwrap();
        let ExportOutcome::File(file) = outcome else {
            panic!("expected a file");
        };
        assert_eq!(file.filename, "sarus_report.csv");
        let text = String::from_utf8(file.bytes).unwrap();
        assert!(text.contains("Total Sarus Count,20"));
        // SNO replaces gid in the projected rows
        assert!(text.contains("SNO"));
        assert!(!text.contains("gid"));
    }

    #[tokio::test]
    async fn test_pdf_export_is_pdf() {
        let outcome = service()
            .export(&query("pdf", None), &ChartPayloads::default())
            .await
            .unwrap();
        let ExportOutcome::File(file) = outcome else {
            panic!("expected a file");
        };
        assert_eq!(file.filename, "sarus_report.pdf");
        assert!(file.bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_excel_export_is_zip_container() {
        let outcome = service()
            .export(&query("excel", None), &ChartPayloads::default())
            .await
            .unwrap();
        let ExportOutcome::File(file) = outcome else {
            panic!("expected a file");
        };
        assert_eq!(file.filename, "sarus_report.xlsx");
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_legend_merges_district_aliases() {
        let rows: Vec<Row> = ["Raebareli", "Rae Bareli", "Raibareli", "Lucknow"]
            .iter()
            .map(|d| {
                let mut row = Row::new();
                row.insert("district".to_string(), Value::from(*d));
                row
            })
            .collect();
        let legend = record_legend(&rows, "district");
        assert_eq!(
            legend,
            vec![("Lucknow".to_string(), 1), ("Raebareli".to_string(), 3)]
        );
    }
}
