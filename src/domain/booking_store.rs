//! Concurrent in-memory booking set.
//!
//! [`BookingStore`] is the materialized record set the metrics engine reads
//! from. Writers hold the outer [`tokio::sync::RwLock`] only for the map
//! operation itself; engine runs work on a cloned `Vec`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{BookingId, BookingRecord, BookingStatus};
use crate::error::MetricsError;

/// Central store for all normalized bookings.
///
/// # Concurrency
///
/// - Readers never block each other.
/// - Writes are serialized by the map lock.
/// - [`records`](Self::records) returns an owned copy, so snapshots are
///   computed without holding the lock.
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: RwLock<HashMap<BookingId, BookingRecord>>,
}

impl BookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a booking. Returns `true` if it was new.
    pub async fn upsert(&self, record: BookingRecord) -> bool {
        let mut map = self.bookings.write().await;
        map.insert(record.id.clone(), record).is_none()
    }

    /// Returns a copy of the booking with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::BookingNotFound`] if no such booking exists.
    pub async fn get(&self, id: &BookingId) -> Result<BookingRecord, MetricsError> {
        let map = self.bookings.read().await;
        map.get(id)
            .cloned()
            .ok_or_else(|| MetricsError::BookingNotFound(id.to_string()))
    }

    /// Removes a booking, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::BookingNotFound`] if no such booking exists.
    pub async fn remove(&self, id: &BookingId) -> Result<BookingRecord, MetricsError> {
        let mut map = self.bookings.write().await;
        map.remove(id)
            .ok_or_else(|| MetricsError::BookingNotFound(id.to_string()))
    }

    /// Replaces the whole set. Later duplicates of an ID win.
    pub async fn replace_all(&self, records: Vec<BookingRecord>) {
        let fresh: HashMap<BookingId, BookingRecord> = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        *self.bookings.write().await = fresh;
    }

    /// Returns bookings ordered by ID, optionally filtered by status.
    pub async fn list(&self, status_filter: Option<BookingStatus>) -> Vec<BookingRecord> {
        let map = self.bookings.read().await;
        let mut records: Vec<BookingRecord> = map
            .values()
            .filter(|r| status_filter.is_none_or(|status| r.status == status))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    /// Returns every booking, ordered by ID, for an engine run.
    pub async fn records(&self) -> Vec<BookingRecord> {
        self.list(None).await
    }

    /// Returns the number of bookings held.
    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    /// Returns `true` if the store holds no bookings.
    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}
