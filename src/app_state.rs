//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::MetricsService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Metrics service for all business logic.
    pub metrics_service: Arc<MetricsService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds state around a service, sharing its event bus.
    #[must_use]
    pub fn new(metrics_service: Arc<MetricsService>) -> Self {
        let event_bus = metrics_service.event_bus().clone();
        Self {
            metrics_service,
            event_bus,
        }
    }
}
