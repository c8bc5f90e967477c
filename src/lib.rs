//! # lodge-metrics
//!
//! Booking metrics, occupancy and revenue forecasting service for hotel
//! and lodge dashboards.
//!
//! Loosely-typed booking documents are normalized into records, held in
//! an in-memory store (optionally backed by PostgreSQL), and turned into a
//! fresh [`engine::MetricsSnapshot`] on every request: trailing monthly
//! revenue, booking and occupancy series, today's front-desk counts,
//! growth rates, seasonal factors, distributions and naive forecasts.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── MetricsService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── BookingStore (domain/)
//!     ├── MetricsEngine (engine/)
//!     │
//!     └── PostgreSQL Persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
