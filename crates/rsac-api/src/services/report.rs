//! Report assembly: resolve the dataset, run the row/count/sum/chart battery
//! and shape the response.

use std::sync::Arc;

use rsac_core::error::{ReportError, Result};
use rsac_core::query::{self, GroupKey, PageWindow};
use rsac_core::registry::{self, DatasetDescriptor};
use rsac_store::ReportStore;

use crate::dto::{Charts, ReportQuery, ReportResponse};

pub struct ReportService {
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    pub(crate) fn resolve_dataset(table: Option<&str>) -> Result<&'static DatasetDescriptor> {
        let key = table.ok_or(ReportError::MissingParameter("table"))?;
        registry::dataset(key).ok_or_else(|| ReportError::UnknownDataset(key.to_string()))
    }

    /// District dropdown values. Unknown or absent tables and datasets
    /// without a district column all produce an empty list rather than an
    /// error, so the dropdown simply stays empty.
    pub async fn districts(&self, table: Option<&str>) -> Result<Vec<String>> {
        let Some(key) = table else { return Ok(Vec::new()) };
        let Some(dataset) = registry::dataset(key) else {
            return Ok(Vec::new());
        };
        if !dataset.capabilities.district {
            return Ok(Vec::new());
        }
        self.store.district_names(dataset).await
    }

    /// One report view: a page of rows, full-set totals and exactly one
    /// grouped chart picked by filter state and capabilities.
    pub async fn report(&self, query: &ReportQuery) -> Result<ReportResponse> {
        let dataset = Self::resolve_dataset(query.table.as_deref())?;
        let caps = &dataset.capabilities;
        let filter = query::district_filter(query.district.as_deref(), caps);
        let window = PageWindow::new(query.page, query.per_page);

        let rows = self
            .store
            .report_rows(dataset, filter.as_ref(), window)
            .await?;
        let total_rows = self.store.count_rows(dataset, filter.as_ref()).await?;
        let total = self.store.sum_metric(dataset, filter.as_ref()).await?;

        let mut charts = Charts {
            population: self.store.population_summary(dataset).await?,
            ..Charts::default()
        };
        match &filter {
            None if caps.district => {
                charts.district = self
                    .store
                    .group_totals(dataset, GroupKey::District, None)
                    .await?;
            }
            Some(filter) if caps.site => {
                charts.site = self
                    .store
                    .group_totals(dataset, GroupKey::Site, Some(filter))
                    .await?;
            }
            filter => {
                charts.habitat = self
                    .store
                    .group_totals(dataset, GroupKey::Habitat, filter.as_ref())
                    .await?;
            }
        }

        Ok(ReportResponse {
            rows,
            total_rows,
            total,
            charts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsac_store::MemoryStore;

    fn service() -> ReportService {
        ReportService::new(Arc::new(MemoryStore::with_demo_data()))
    }

    fn query(table: Option<&str>, district: Option<&str>) -> ReportQuery {
        ReportQuery {
            table: table.map(str::to_string),
            district: district.map(str::to_string),
            page: 1,
            per_page: 25,
        }
    }

    #[tokio::test]
    async fn test_report_requires_table() {
        let err = service().report(&query(None, None)).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingParameter("table")));
    }

    #[tokio::test]
    async fn test_report_rejects_unknown_table() {
        let err = service()
            .report(&query(Some("sarus_9_99_2099"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::UnknownDataset(_)));
    }

    #[tokio::test]
    async fn test_unfiltered_report_carries_district_chart_only() {
        let response = service()
            .report(&query(Some("sarus_2_09_2020"), None))
            .await
            .unwrap();
        assert_eq!(response.total_rows, 5);
        assert_eq!(response.total, 20.0);
        assert!(!response.charts.district.is_empty());
        assert!(response.charts.site.is_empty());
        assert!(response.charts.habitat.is_empty());
        assert_eq!(response.charts.district[0].label, "Raebareli");
        assert_eq!(response.charts.district[0].total, 11.0);
    }

    #[tokio::test]
    async fn test_filtered_report_switches_to_site_chart() {
        let response = service()
            .report(&query(Some("sarus_2_09_2020"), Some("Rae Bareli")))
            .await
            .unwrap();
        assert_eq!(response.total_rows, 3);
        assert_eq!(response.total, 11.0);
        assert!(response.charts.district.is_empty());
        let labels: Vec<&str> = response
            .charts
            .site
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Dalmau floodplain", "Salon lake"]);
    }

    #[tokio::test]
    async fn test_population_summary_ignores_filter() {
        let unfiltered = service()
            .report(&query(Some("sarus_2_09_2020"), None))
            .await
            .unwrap();
        let filtered = service()
            .report(&query(Some("sarus_2_09_2020"), Some("Lucknow")))
            .await
            .unwrap();
        assert_eq!(unfiltered.charts.population.adults, Some(12.0));
        assert_eq!(
            unfiltered.charts.population.adults,
            filtered.charts.population.adults
        );
    }

    #[tokio::test]
    async fn test_districts_empty_for_unknown_table() {
        let service = service();
        assert!(service.districts(None).await.unwrap().is_empty());
        assert!(service.districts(Some("nope")).await.unwrap().is_empty());
        assert_eq!(
            service.districts(Some("sarus_2_09_2020")).await.unwrap(),
            vec!["Barabanki", "Lucknow", "Raebareli"]
        );
    }
}
