pub mod export;
pub mod report;

pub use export::{ExportFile, ExportOutcome, ExportService};
pub use report::ReportService;
