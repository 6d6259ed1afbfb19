//! In-memory store implementation for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. For production workloads, use the PostgreSQL
//! backend.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use rsac_core::alias;
use rsac_core::error::{ReportError, Result};
use rsac_core::models::{DashboardSummary, GroupBucket, PopulationSummary, Row};
use rsac_core::query::{self, DistrictFilter, GroupKey, PageWindow, TOP_DISTRICTS};
use rsac_core::registry::DatasetDescriptor;

use crate::ports::{DashboardStore, ReportStore};

/// One in-memory table: its physical column set plus rows keyed by physical
/// column names.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// In-memory implementation of [`ReportStore`] and [`DashboardStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
    dashboard: Arc<RwLock<Option<DashboardSummary>>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under its physical name.
    pub fn insert_table(&self, physical_table: &str, columns: &[&str], rows: Vec<Row>) {
        let mut tables = self.tables.write().unwrap();
        tables.insert(
            physical_table.to_string(),
            MemoryTable {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        );
    }

    /// Install the canned transport dashboard summary.
    pub fn set_dashboard(&self, summary: DashboardSummary) {
        *self.dashboard.write().unwrap() = Some(summary);
    }

    fn table(&self, physical_table: &str) -> Result<MemoryTable> {
        let tables = self.tables.read().unwrap();
        tables
            .get(physical_table)
            .cloned()
            .ok_or_else(|| ReportError::Database(format!("relation does not exist: {physical_table}")))
    }

    fn filtered_rows(&self, dataset: &DatasetDescriptor, filter: Option<&DistrictFilter>) -> Result<Vec<Row>> {
        let table = self.table(dataset.physical_table)?;
        let mut rows: Vec<Row> = table
            .rows
            .into_iter()
            .filter(|row| filter_matches(filter, row))
            .collect();
        rows.sort_by_key(row_gid);
        Ok(rows)
    }
}

fn filter_matches(filter: Option<&DistrictFilter>, row: &Row) -> bool {
    let Some(filter) = filter else { return true };
    let Some(district) = row.get("district").and_then(Value::as_str) else {
        return false;
    };
    match filter {
        DistrictFilter::Exact(value) => district.eq_ignore_ascii_case(value),
        DistrictFilter::AliasSet { keys } => keys.contains(&alias::normalize(district)),
    }
}

fn row_gid(row: &Row) -> i64 {
    row.get("gid").and_then(Value::as_i64).unwrap_or(0)
}

fn number(row: &Row, column: &str) -> f64 {
    row.get(column).and_then(Value::as_f64).unwrap_or(0.0)
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn existing_columns(&self, table: &str, candidates: &[&str]) -> Result<Vec<String>> {
        let table = self.table(table)?;
        Ok(candidates
            .iter()
            .filter(|c| table.columns.iter().any(|p| p.eq_ignore_ascii_case(c)))
            .map(|c| c.to_string())
            .collect())
    }

    async fn district_names(&self, dataset: &DatasetDescriptor) -> Result<Vec<String>> {
        if !dataset.capabilities.district {
            return Ok(Vec::new());
        }
        let table = self.table(dataset.physical_table)?;
        let raw: Vec<String> = table
            .rows
            .iter()
            .filter_map(|row| row.get("district").and_then(Value::as_str))
            .map(|d| d.to_string())
            .collect();
        Ok(alias::canonical_list(raw))
    }

    async fn report_rows(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
        window: Option<PageWindow>,
    ) -> Result<Vec<Row>> {
        let mut columns = query::report_columns(&dataset.capabilities);
        let candidates: Vec<&str> = columns.iter().filter(|c| c.optional).map(|c| c.name).collect();
        let existing = self.existing_columns(dataset.physical_table, &candidates).await?;
        columns.retain(|c| !c.optional || existing.iter().any(|e| e.eq_ignore_ascii_case(c.name)));

        let rows = self.filtered_rows(dataset, filter)?;
        let windowed: Vec<&Row> = match window {
            Some(w) => rows
                .iter()
                .skip(w.offset() as usize)
                .take(w.limit() as usize)
                .collect(),
            None => rows.iter().collect(),
        };

        Ok(windowed
            .into_iter()
            .map(|source| {
                let mut row = Row::new();
                for column in &columns {
                    let value = source.get(column.name).cloned().unwrap_or(Value::Null);
                    row.insert(column.output_name().to_string(), value);
                }
                row
            })
            .collect())
    }

    async fn count_rows(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
    ) -> Result<i64> {
        Ok(self.filtered_rows(dataset, filter)?.len() as i64)
    }

    async fn sum_metric(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
    ) -> Result<f64> {
        Ok(self
            .filtered_rows(dataset, filter)?
            .iter()
            .map(|row| number(row, "sarus_coun"))
            .sum())
    }

    async fn group_totals(
        &self,
        dataset: &DatasetDescriptor,
        key: GroupKey,
        filter: Option<&DistrictFilter>,
    ) -> Result<Vec<GroupBucket>> {
        let rows = self.filtered_rows(dataset, filter)?;
        let mut totals: HashMap<String, f64> = HashMap::new();
        for row in &rows {
            let Some(raw) = row.get(key.column()).and_then(Value::as_str) else {
                continue;
            };
            let label = match key {
                GroupKey::District => alias::canonical(raw),
                GroupKey::Site | GroupKey::Habitat => raw.to_string(),
            };
            *totals.entry(label).or_insert(0.0) += number(row, "sarus_coun");
        }

        let mut buckets: Vec<GroupBucket> = totals
            .into_iter()
            .map(|(label, total)| GroupBucket { label, total })
            .collect();
        match key {
            GroupKey::District => {
                buckets.sort_by(|a, b| {
                    b.total
                        .partial_cmp(&a.total)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.label.cmp(&b.label))
                });
                buckets.truncate(TOP_DISTRICTS as usize);
            }
            GroupKey::Site | GroupKey::Habitat => buckets.sort_by(|a, b| a.label.cmp(&b.label)),
        }
        Ok(buckets)
    }

    async fn population_summary(&self, dataset: &DatasetDescriptor) -> Result<PopulationSummary> {
        let caps = &dataset.capabilities;
        if !caps.has_population() {
            return Ok(PopulationSummary::default());
        }
        let table = self.table(dataset.physical_table)?;
        let sum = |column: &str| table.rows.iter().map(|row| number(row, column)).sum::<f64>();
        Ok(PopulationSummary {
            adults: caps.adults.then(|| sum("adults")),
            juvenile: caps.juvenile.then(|| sum("juvenile")),
            nests: caps.nests.then(|| sum("nests")),
        })
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let summary = *self.dashboard.read().unwrap();
        summary.ok_or_else(|| ReportError::Database("transport tables not loaded".to_string()))
    }
}

/// Build one census row keyed by physical column names. Shared by the demo
/// seed and the tests.
#[allow(clippy::too_many_arguments)]
pub fn census_row(
    gid: i64,
    district: Option<&str>,
    site: Option<&str>,
    habitat: &str,
    sarus_count: i64,
    adults: i64,
    juvenile: i64,
    nests: i64,
) -> Row {
    let mut row = Row::new();
    if let Some(district) = district {
        row.insert("district".to_string(), Value::from(district));
    }
    row.insert("gid".to_string(), Value::from(gid));
    row.insert("latitude".to_string(), Value::from(26.5 + gid as f64 / 100.0));
    row.insert("longitude".to_string(), Value::from(80.9 + gid as f64 / 100.0));
    row.insert("habitat".to_string(), Value::from(habitat));
    row.insert("sarus_coun".to_string(), Value::from(sarus_count));
    if let Some(site) = site {
        row.insert("site".to_string(), Value::from(site));
    }
    row.insert("adults".to_string(), Value::from(adults));
    row.insert("juvenile".to_string(), Value::from(juvenile));
    row.insert("nests".to_string(), Value::from(nests));
    row.insert("threats".to_string(), Value::from("None"));
    row.insert("date".to_string(), Value::from("2020-09-02"));
    row
}

pub const CENSUS_COLUMNS: &[&str] = &[
    "gid", "district", "latitude", "longitude", "habitat", "sarus_coun", "site", "adults",
    "juvenile", "nests", "threats", "date",
];

impl MemoryStore {
    /// Store seeded with a small census table and a canned dashboard, used
    /// when no `DATABASE_URL` is configured.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        let rows = vec![
            census_row(1, Some("Lucknow"), Some("Mohanlalganj wetland"), "Wetland", 4, 2, 2, 1),
            census_row(2, Some("Raebareli"), Some("Salon lake"), "Lake", 6, 4, 2, 2),
            census_row(3, Some("Rae Bareli"), Some("Salon lake"), "Lake", 3, 2, 1, 1),
            census_row(4, Some("Raibareli"), Some("Dalmau floodplain"), "River", 2, 1, 1, 0),
            census_row(5, Some("Barabanki"), Some("Ramnagar marsh"), "Marsh", 5, 3, 2, 1),
        ];
        store.insert_table("uprsac_09xxxx_saruscount_02092020", CENSUS_COLUMNS, rows);
        store.set_dashboard(DashboardSummary::default());
        store
    }
}
