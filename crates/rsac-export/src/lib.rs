//! Document export for census reports and the transport dashboard.
//!
//! Input is always a full (unpaginated) row set from the store; the
//! formatters here never see pagination. Chart images arrive as base64
//! payloads captured client-side and are embedded best-effort: a malformed
//! payload is logged and skipped, never fatal to the export.

pub mod csv;
pub mod excel;
pub mod images;
pub mod pdf;
pub mod rows;

pub use images::ChartImage;
pub use rows::export_rows;

/// Fixed per-format download names.
pub const CSV_FILENAME: &str = "sarus_report.csv";
pub const EXCEL_FILENAME: &str = "sarus_report.xlsx";
pub const PDF_FILENAME: &str = "sarus_report.pdf";
pub const DASHBOARD_PDF_FILENAME: &str = "transport_dashboard.pdf";

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const EXCEL_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
