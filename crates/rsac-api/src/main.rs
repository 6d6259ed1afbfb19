use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rsac_core::config::AppConfig;
use rsac_store::memory::MemoryStore;
use rsac_store::ports::{DashboardStore, ReportStore};
use rsac_store::postgres::{PostgresConfig, PostgresStore};

use rsac_api::router::create_router;
use rsac_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rsac_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(port = config.port, "Starting RSAC reporting API server");

    // Storage backend keyed off DATABASE_URL
    let (reports, dashboard): (Arc<dyn ReportStore>, Arc<dyn DashboardStore>) =
        match &config.database_url {
            Some(database_url) => {
                tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
                match init_postgres_storage(database_url).await {
                    Ok(store) => {
                        tracing::info!("Connected to PostgreSQL");
                        (store.clone(), store)
                    }
                    Err(e) => {
                        tracing::error!("Failed to connect to PostgreSQL: {}", e);
                        tracing::error!(
                            "Remediation:\n\
                            1. Ensure PostgreSQL is running\n\
                            2. Verify DATABASE_URL is correct\n\
                            3. Check that the census and transport tables are loaded"
                        );
                        std::process::exit(1);
                    }
                }
            }
            None => {
                tracing::info!("Using in-memory demo data (set DATABASE_URL for PostgreSQL)");
                let store = Arc::new(MemoryStore::with_demo_data());
                (store.clone(), store)
            }
        };

    let state = Arc::new(AppState::new(reports, dashboard));

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}

async fn init_postgres_storage(database_url: &str) -> Result<Arc<PostgresStore>, String> {
    let config =
        PostgresConfig::new(database_url).map_err(|e| format!("Invalid DATABASE_URL: {}", e))?;

    PostgresStore::new(config)
        .await
        .map(Arc::new)
        .map_err(|e| format!("Connection failed: {}", e))
}
