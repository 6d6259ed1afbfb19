use std::sync::Arc;

use rsac_store::{DashboardStore, ReportStore};

/// Shared application state: the injected store backends. Constructed once at
/// startup; request handlers only ever borrow it.
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<dyn ReportStore>,
    pub dashboard: Arc<dyn DashboardStore>,
}

impl AppState {
    pub fn new(reports: Arc<dyn ReportStore>, dashboard: Arc<dyn DashboardStore>) -> Self {
        Self { reports, dashboard }
    }
}
