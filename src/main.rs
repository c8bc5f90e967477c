//! lodge-metrics server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use lodge_metrics::api;
use lodge_metrics::app_state::AppState;
use lodge_metrics::config::MetricsConfig;
use lodge_metrics::domain::{BookingStore, EventBus};
use lodge_metrics::engine::MetricsEngine;
use lodge_metrics::persistence::PostgresPersistence;
use lodge_metrics::service::MetricsService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = MetricsConfig::from_env().context("loading configuration")?;
    tracing::info!(addr = %config.listen_addr, "starting lodge-metrics");

    // Build domain layer
    let engine = MetricsEngine::new(config.engine_config()).context("validating engine config")?;
    let store = Arc::new(BookingStore::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let mut service =
        MetricsService::new(store, engine, event_bus).with_seed(config.forecast_seed);

    if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("connecting to PostgreSQL")?;
        let persistence = PostgresPersistence::new(pool);
        persistence.migrate().await.context("running migrations")?;
        service = service.with_persistence(persistence);

        let loaded = service.hydrate().await.context("loading bookings")?;
        tracing::info!(loaded, "persistence enabled");
    }

    let metrics_service = Arc::new(service);

    if config.persistence_enabled && config.snapshot_interval_secs > 0 {
        spawn_snapshot_task(
            Arc::clone(&metrics_service),
            config.snapshot_interval_secs,
            config.cleanup_after_days,
        );
    }

    // Build router
    let app = api::build_app(AppState::new(metrics_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Periodically persists a metrics snapshot and prunes old ones.
fn spawn_snapshot_task(service: Arc<MetricsService>, interval_secs: u64, cleanup_after_days: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match service.persist_snapshot(cleanup_after_days).await {
                Ok(Some(id)) => tracing::debug!(snapshot_id = id, "metrics snapshot saved"),
                Ok(None) => {}
                Err(err) => tracing::error!(error = %err, "failed to save metrics snapshot"),
            }
        }
    });
}
