//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::StoredBooking;
use crate::domain::BookingDocument;
use crate::error::MetricsError;

const UPSERT_BOOKING: &str = "INSERT INTO bookings (id, document, updated_at) VALUES ($1, $2, now()) \
     ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document, updated_at = now()";

fn document_json(document: &BookingDocument) -> Result<serde_json::Value, MetricsError> {
    serde_json::to_value(document).map_err(|e| MetricsError::Internal(e.to_string()))
}

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), MetricsError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| MetricsError::PersistenceError(e.to_string()))
    }

    /// Inserts or replaces a booking document.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure.
    pub async fn save_booking(
        &self,
        id: &str,
        document: &BookingDocument,
    ) -> Result<(), MetricsError> {
        sqlx::query(UPSERT_BOOKING)
            .bind(id)
            .bind(document_json(document)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Inserts or replaces a batch of booking documents in a single
    /// transaction. Either every document is written or none is.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure;
    /// the stored set is then unchanged.
    pub async fn save_bookings(
        &self,
        documents: &[(String, BookingDocument)],
    ) -> Result<(), MetricsError> {
        let mut tx = self.pool.begin().await?;
        for (id, document) in documents {
            sqlx::query(UPSERT_BOOKING)
                .bind(id)
                .bind(document_json(document)?)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Deletes a booking document. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure.
    pub async fn delete_booking(&self, id: &str) -> Result<bool, MetricsError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replaces every stored booking in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure;
    /// the previous set is left intact.
    pub async fn replace_bookings(
        &self,
        documents: &[(String, BookingDocument)],
    ) -> Result<(), MetricsError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM bookings").execute(&mut *tx).await?;
        for (id, document) in documents {
            sqlx::query(UPSERT_BOOKING)
                .bind(id)
                .bind(document_json(document)?)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Loads every stored booking, oldest write first.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure.
    pub async fn load_bookings(&self) -> Result<Vec<StoredBooking>, MetricsError> {
        let rows = sqlx::query_as::<_, StoredBooking>(
            "SELECT id, document, updated_at FROM bookings ORDER BY updated_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Appends a metrics snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure.
    pub async fn save_snapshot(
        &self,
        headline: &serde_json::Value,
        snapshot: &serde_json::Value,
        snapshot_at: DateTime<Utc>,
    ) -> Result<i64, MetricsError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO metrics_snapshots (headline, snapshot, snapshot_at) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(headline)
        .bind(snapshot)
        .bind(snapshot_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Deletes snapshots older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricsError::PersistenceError`] on database failure.
    pub async fn delete_old_snapshots(&self, before_days: u64) -> Result<u64, MetricsError> {
        let days = i64::try_from(before_days).unwrap_or(i64::MAX);
        let cutoff = chrono::Duration::try_days(days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let result = sqlx::query("DELETE FROM metrics_snapshots WHERE snapshot_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
