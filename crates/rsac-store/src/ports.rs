//! Store traits consumed by the report assembler and dashboard handlers.

use async_trait::async_trait;
use rsac_core::error::Result;
use rsac_core::models::{DashboardSummary, GroupBucket, PopulationSummary, Row};
use rsac_core::query::{DistrictFilter, GroupKey, PageWindow};
use rsac_core::registry::DatasetDescriptor;

/// Port for census report queries.
///
/// Every method that accepts a filter applies the exact same predicate, so a
/// page/count/sum/chart battery issued with one filter reflects one
/// consistent snapshot of the WHERE clause (the data itself is read-mostly;
/// no transaction wraps the battery).
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Subset of `candidates` that exist in `table`'s physical schema,
    /// case-insensitively matched, candidate order preserved. An empty result
    /// means "no optional data available", never an error.
    async fn existing_columns(&self, table: &str, candidates: &[&str]) -> Result<Vec<String>>;

    /// Canonicalized, deduplicated district names for the dropdown.
    async fn district_names(&self, dataset: &DatasetDescriptor) -> Result<Vec<String>>;

    /// Filtered rows ordered by `gid`; `window = None` fetches everything.
    async fn report_rows(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
        window: Option<PageWindow>,
    ) -> Result<Vec<Row>>;

    /// Total filtered row count.
    async fn count_rows(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
    ) -> Result<i64>;

    /// Total filtered sum of the primary count metric.
    async fn sum_metric(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
    ) -> Result<f64>;

    /// Grouped sum of the count metric for one chart.
    async fn group_totals(
        &self,
        dataset: &DatasetDescriptor,
        key: GroupKey,
        filter: Option<&DistrictFilter>,
    ) -> Result<Vec<GroupBucket>>;

    /// Whole-table population sums per the dataset's capabilities.
    async fn population_summary(&self, dataset: &DatasetDescriptor) -> Result<PopulationSummary>;
}

/// Port for the transport dashboard battery. Any sub-query failure fails the
/// whole summary; no partial dashboard is ever returned.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn dashboard_summary(&self) -> Result<DashboardSummary>;
}
