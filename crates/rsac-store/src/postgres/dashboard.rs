//! Transport dashboard battery over PostgreSQL.
//!
//! A fixed sequence of aggregate queries against the named infrastructure
//! tables. No dynamic resolution and no capability schema; a failure in any
//! sub-query propagates and fails the whole summary.

use async_trait::async_trait;
use sqlx::Row as SqlxRow;

use rsac_core::error::Result;
use rsac_core::models::{
    DashboardSummary, ExpresswayStats, NetworkAnalytics, SegmentStats, YearComparison,
};
use rsac_core::registry::transport;

use super::{db_err, PostgresStore};
use crate::ports::DashboardStore;

impl PostgresStore {
    /// Total network length in km for one road/rail table.
    async fn network_length(&self, table: &str) -> Result<f64> {
        let sql = format!("SELECT COALESCE(SUM(length_km), 0)::float8 FROM {table}");
        let row = sqlx::query(&sql).fetch_one(self.pool()).await.map_err(db_err)?;
        Ok(row.get::<f64, _>(0))
    }

    /// Count plus sum/max/min over one length column.
    async fn segment_stats(&self, table: &str, column: &str) -> Result<SegmentStats> {
        let sql = format!(
            "SELECT COUNT(*) AS count, COALESCE(SUM({column}), 0)::float8 AS total, \
             MAX({column})::float8 AS max, MIN({column})::float8 AS min FROM {table}"
        );
        let row = sqlx::query(&sql).fetch_one(self.pool()).await.map_err(db_err)?;
        Ok(SegmentStats {
            count: row.get::<i64, _>("count"),
            total: Some(row.get::<f64, _>("total")),
            max: row.get::<Option<f64>, _>("max"),
            min: row.get::<Option<f64>, _>("min"),
        })
    }

    async fn year_comparison(&self, table_2010: &str, table_2018: &str) -> Result<YearComparison> {
        Ok(YearComparison {
            y2010: self.network_length(table_2010).await?,
            y2018: self.network_length(table_2018).await?,
        })
    }
}

#[async_trait]
impl DashboardStore for PostgresStore {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let analytics = NetworkAnalytics {
            nh: self
                .year_comparison(transport::NATIONAL_HIGHWAY_2010, transport::NATIONAL_HIGHWAY_2018)
                .await?,
            sh: self
                .year_comparison(transport::STATE_HIGHWAY_2010, transport::STATE_HIGHWAY_2018)
                .await?,
            other: self
                .year_comparison(transport::OTHER_ROADS_2010, transport::OTHER_ROADS_2018)
                .await?,
            rail: self
                .year_comparison(transport::RAILWAY_2010, transport::RAILWAY_2018)
                .await?,
        };

        let expressways = ExpresswayStats {
            existing: self
                .segment_stats(transport::EXPRESSWAYS_EXISTING, "shape_leng")
                .await?,
            upcoming: self
                .segment_stats(transport::EXPRESSWAYS_UPCOMING, "shape_leng")
                .await?,
        };

        // The legacy dashboard reports a narrower stat set for these three.
        let mut ganga = self.segment_stats(transport::GANGA_CRUISE, "shape_leng").await?;
        ganga.min = None;

        let mut roadways = self.segment_stats(transport::ROADWAYS_ROUTES, "distance").await?;
        roadways.total = None;

        let mut rta = self.segment_stats(transport::RTA_ROUTES, "length_km").await?;
        rta.total = None;

        Ok(DashboardSummary {
            analytics,
            expressways,
            ganga,
            roadways,
            rta,
        })
    }
}
