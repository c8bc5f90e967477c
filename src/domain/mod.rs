//! Domain layer: booking types, the booking store, and the event system.
//!
//! This module contains the server-side domain model including booking
//! identity, loosely-typed source documents and their normalized records,
//! the event bus for broadcasting changes, and the concurrent booking store.

pub mod booking;
pub mod booking_event;
pub mod booking_id;
pub mod booking_store;
pub mod event_bus;

pub use booking::{BookingDocument, BookingRecord, BookingStatus, RawDate};
pub use booking_event::MetricsEvent;
pub use booking_id::BookingId;
pub use booking_store::BookingStore;
pub use event_bus::EventBus;
