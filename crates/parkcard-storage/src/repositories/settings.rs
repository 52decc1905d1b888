#![allow(async_fn_in_trait)]

use crate::error::{StorageError, StorageResult};
use crate::models::SerialSettings;
use sqlx::SqlitePool;
use tracing::info;

/// Repository for the single serial settings row.
pub trait SettingsRepository: Send + Sync {
    /// The current settings row (lowest id), if any.
    async fn find_current(&self) -> StorageResult<Option<SerialSettings>>;

    /// Insert the row if none exists, otherwise update it in place.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty port name without touching the
    /// database.
    async fn upsert(&self, port_name: &str, port_speed: i64) -> StorageResult<SerialSettings>;
}

/// SQLite implementation of SettingsRepository
#[derive(Debug, Clone)]
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    /// Create a new SQLite settings repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SettingsRepository for SqliteSettingsRepository {
    async fn find_current(&self) -> StorageResult<Option<SerialSettings>> {
        let settings = sqlx::query_as::<_, SerialSettings>(
            r#"
            SELECT id, serial_port_name, serial_port_speed
            FROM settings
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn upsert(&self, port_name: &str, port_speed: i64) -> StorageResult<SerialSettings> {
        if port_name.is_empty() {
            return Err(StorageError::Validation("port name is empty".to_string()));
        }

        // Single statement: the row id is pinned to the lowest existing id
        // (or 1), so concurrent saves converge on one row.
        let settings = sqlx::query_as::<_, SerialSettings>(
            r#"
            INSERT INTO settings (id, serial_port_name, serial_port_speed)
            VALUES ((SELECT COALESCE(MIN(id), 1) FROM settings), ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                serial_port_name = excluded.serial_port_name,
                serial_port_speed = excluded.serial_port_speed
            RETURNING id, serial_port_name, serial_port_speed
            "#,
        )
        .bind(port_name)
        .bind(port_speed)
        .fetch_one(&self.pool)
        .await?;

        info!("Serial settings saved: {}@{}", port_name, port_speed);
        Ok(settings)
    }
}
