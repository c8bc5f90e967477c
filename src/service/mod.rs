//! Service layer: business logic orchestration.
//!
//! [`MetricsService`] coordinates booking mutations, delegates analytics
//! to the [`crate::engine::MetricsEngine`], and emits events through the
//! [`super::domain::EventBus`].

pub mod metrics_service;

pub use metrics_service::{ImportOutcome, MetricsService};
