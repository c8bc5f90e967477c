//! Persistence layer: PostgreSQL booking documents and metric snapshots.
//!
//! Bookings are stored as the source documents they arrived as, so a
//! restart re-normalizes them with the current rules. Metric snapshots are
//! append-only history pruned by age. The concrete implementation uses
//! `sqlx::PgPool` for async PostgreSQL access.

pub mod models;
pub mod postgres;

pub use postgres::PostgresPersistence;
