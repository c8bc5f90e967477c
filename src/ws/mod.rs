//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes booking changes and metric
//! refreshes to clients subscribed to the `bookings` and `metrics` topics.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
