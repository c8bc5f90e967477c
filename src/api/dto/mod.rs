//! Data Transfer Objects for REST request/response serialization.
//!
//! Monetary amounts are serialized as JSON strings to prevent precision
//! loss; chart values and rates are plain numbers.

pub mod booking_dto;
pub mod common_dto;
pub mod metrics_dto;

pub use booking_dto::*;
pub use common_dto::*;
pub use metrics_dto::*;
