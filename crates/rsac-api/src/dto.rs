//! Request and response DTOs for the report endpoints.

use serde::{Deserialize, Serialize};

use rsac_core::models::{GroupBucket, PopulationSummary, Row};

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    25
}

fn default_format() -> String {
    "csv".to_string()
}

#[derive(Debug, Deserialize)]
pub struct DistrictsQuery {
    pub table: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub table: Option<String>,
    pub district: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub table: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
    pub district: Option<String>,
}

/// Chart images captured client-side, passed along for excel/pdf embedding.
#[derive(Debug, Default, Deserialize)]
pub struct ChartPayloads {
    pub district: Option<String>,
    pub site: Option<String>,
    pub habitat: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportBody {
    #[serde(default)]
    pub charts: ChartPayloads,
}

/// Chart aggregates for one report view. Exactly one of the three groupings
/// is populated per request; the others stay empty.
#[derive(Debug, Default, Serialize)]
pub struct Charts {
    pub district: Vec<GroupBucket>,
    pub site: Vec<GroupBucket>,
    pub habitat: Vec<GroupBucket>,
    pub population: PopulationSummary,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub rows: Vec<Row>,
    #[serde(rename = "totalRows")]
    pub total_rows: i64,
    pub total: f64,
    pub charts: Charts,
}
