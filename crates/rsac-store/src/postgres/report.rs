//! Census report queries over PostgreSQL.
//!
//! Executes the SQL shapes produced by `rsac_core::query` and reshapes the
//! results into ordered row maps. The column resolver consults
//! `information_schema` because the historical census tables do not all carry
//! the full logical column set.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row as SqlxRow, TypeInfo};

use rsac_core::alias;
use rsac_core::error::Result;
use rsac_core::models::{GroupBucket, PopulationSummary, Row};
use rsac_core::query::{self, ColumnSpec, DistrictFilter, GroupKey, PageWindow};
use rsac_core::registry::DatasetDescriptor;

use super::{bind_params, db_err, PostgresStore};
use crate::ports::ReportStore;

impl PostgresStore {
    /// Capability columns verified against the physical schema, in builder
    /// order. Fails open: a table with none of the optional columns simply
    /// reports base columns only.
    async fn resolved_columns(&self, dataset: &DatasetDescriptor) -> Result<Vec<ColumnSpec>> {
        let mut columns = query::report_columns(&dataset.capabilities);
        let candidates: Vec<&str> = columns
            .iter()
            .filter(|c| c.optional)
            .map(|c| c.name)
            .collect();
        if candidates.is_empty() {
            return Ok(columns);
        }
        let existing = self
            .existing_columns(dataset.physical_table, &candidates)
            .await?;
        columns.retain(|c| !c.optional || existing.iter().any(|e| e.eq_ignore_ascii_case(c.name)));
        Ok(columns)
    }
}

#[async_trait]
impl ReportStore for PostgresStore {
    async fn existing_columns(&self, table: &str, candidates: &[&str]) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT lower(column_name) AS column_name FROM information_schema.columns \
             WHERE lower(table_name) = lower($1)",
        )
        .bind(table)
        .fetch_all(self.pool())
        .await
        .map_err(db_err)?;

        let physical: Vec<String> = rows
            .iter()
            .map(|r| r.get::<String, _>("column_name"))
            .collect();

        Ok(candidates
            .iter()
            .filter(|c| physical.iter().any(|p| p.eq_ignore_ascii_case(c)))
            .map(|c| c.to_string())
            .collect())
    }

    async fn district_names(&self, dataset: &DatasetDescriptor) -> Result<Vec<String>> {
        if !dataset.capabilities.district {
            return Ok(Vec::new());
        }
        let q = query::distinct_districts(dataset.physical_table);
        let rows = bind_params(&q).fetch_all(self.pool()).await.map_err(db_err)?;
        let raw: Vec<String> = rows.iter().map(|r| r.get::<String, _>(0)).collect();
        Ok(alias::canonical_list(raw))
    }

    async fn report_rows(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
        window: Option<PageWindow>,
    ) -> Result<Vec<Row>> {
        let columns = self.resolved_columns(dataset).await?;
        let q = query::select_page(dataset.physical_table, &columns, filter, window);
        let rows = bind_params(&q).fetch_all(self.pool()).await.map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|pg_row| {
                let mut row = Row::new();
                for (idx, column) in columns.iter().enumerate() {
                    row.insert(column.output_name().to_string(), cell_value(pg_row, idx));
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
        let q = query::count_rows(dataset.physical_table, filter);
        let row = bind_params(&q).fetch_one(self.pool()).await.map_err(db_err)?;
        Ok(row.get::<i64, _>(0))
    }

    async fn sum_metric(
        &self,
        dataset: &DatasetDescriptor,
        filter: Option<&DistrictFilter>,
    ) -> Result<f64> {
        let q = query::sum_metric(dataset.physical_table, filter);
        let row = bind_params(&q).fetch_one(self.pool()).await.map_err(db_err)?;
        Ok(row.get::<f64, _>(0))
    }

    async fn group_totals(
        &self,
        dataset: &DatasetDescriptor,
        key: GroupKey,
        filter: Option<&DistrictFilter>,
    ) -> Result<Vec<GroupBucket>> {
        let q = query::group_totals(dataset.physical_table, key, filter);
        let rows = bind_params(&q).fetch_all(self.pool()).await.map_err(db_err)?;
        Ok(rows
            .iter()
            .map(|r| GroupBucket {
                label: r.get::<String, _>("label"),
                total: r.get::<f64, _>("total"),
            })
            .collect())
    }

    async fn population_summary(&self, dataset: &DatasetDescriptor) -> Result<PopulationSummary> {
        let caps = &dataset.capabilities;
        let Some(q) = query::population_summary(dataset.physical_table, caps) else {
            return Ok(PopulationSummary::default());
        };
        let row = bind_params(&q).fetch_one(self.pool()).await.map_err(db_err)?;
        Ok(PopulationSummary {
            adults: caps.adults.then(|| row.get::<f64, _>("adults")),
            juvenile: caps.juvenile.then(|| row.get::<f64, _>("juvenile")),
            nests: caps.nests.then(|| row.get::<f64, _>("nests")),
        })
    }
}

/// Decode one result cell into a JSON scalar by column type.
///
/// The census tables only use integer, float, text, bool and date/timestamp
/// columns; anything else is surfaced as text where possible.
fn cell_value(row: &PgRow, idx: usize) -> Value {
    let type_name = row.columns()[idx].type_info().name().to_string();
    match type_name.as_str() {
        "INT2" => opt(row.try_get::<Option<i16>, _>(idx).ok().flatten().map(Value::from)),
        "INT4" => opt(row.try_get::<Option<i32>, _>(idx).ok().flatten().map(Value::from)),
        "INT8" => opt(row.try_get::<Option<i64>, _>(idx).ok().flatten().map(Value::from)),
        "FLOAT4" => opt(row
            .try_get::<Option<f32>, _>(idx)
            .ok()
            .flatten()
            .map(|v| Value::from(f64::from(v)))),
        "FLOAT8" => opt(row.try_get::<Option<f64>, _>(idx).ok().flatten().map(Value::from)),
        "BOOL" => opt(row.try_get::<Option<bool>, _>(idx).ok().flatten().map(Value::from)),
        "DATE" => opt(row
            .try_get::<Option<chrono::NaiveDate>, _>(idx)
            .ok()
            .flatten()
            .map(|d| Value::from(d.to_string()))),
        "TIMESTAMP" => opt(row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)
            .ok()
            .flatten()
            .map(|d| Value::from(d.to_string()))),
        "TIMESTAMPTZ" => opt(row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)
            .ok()
            .flatten()
            .map(|d| Value::from(d.to_rfc3339()))),
        _ => opt(row.try_get::<Option<String>, _>(idx).ok().flatten().map(Value::from)),
    }
}

fn opt(value: Option<Value>) -> Value {
    value.unwrap_or(Value::Null)
}
