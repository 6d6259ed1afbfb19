//! Domain models shared across the store, export and HTTP layers.

use serde::{Deserialize, Serialize};

/// One report row: ordered column name → scalar value mapping.
///
/// The column set varies per dataset (capability-driven), so rows are dynamic
/// maps rather than a fixed struct. `serde_json` is built with
/// `preserve_order`, which makes insertion order the column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// One bucket of a grouped aggregate (district / site / habitat chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBucket {
    pub label: String,
    pub total: f64,
}

/// Population sums across the whole dataset; fields follow capability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adults: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub juvenile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nests: Option<f64>,
}

impl PopulationSummary {
    pub fn is_empty(&self) -> bool {
        self.adults.is_none() && self.juvenile.is_none() && self.nests.is_none()
    }
}

/// 2010-vs-2018 network length comparison for one road/rail category, in km.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearComparison {
    pub y2010: f64,
    pub y2018: f64,
}

/// Count/sum/extrema over one transport table's segment lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

/// Length analytics for the four network categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkAnalytics {
    pub nh: YearComparison,
    pub sh: YearComparison,
    pub other: YearComparison,
    pub rail: YearComparison,
}

/// Expressway stats, existing vs upcoming corridors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpresswayStats {
    pub existing: SegmentStats,
    pub upcoming: SegmentStats,
}

/// Fixed-shape transport dashboard aggregate. No pagination, no filtering;
/// assembled from a fixed battery of queries and failed as a whole if any
/// sub-query fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub analytics: NetworkAnalytics,
    pub expressways: ExpresswayStats,
    pub ganga: SegmentStats,
    pub roadways: SegmentStats,
    pub rta: SegmentStats,
}
