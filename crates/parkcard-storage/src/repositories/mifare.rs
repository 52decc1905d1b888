#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::MifareSettings;
use parkcard_core::{MifareKey, SectorNumber};
use sqlx::SqlitePool;
use tracing::info;

/// Repository for the single Mifare access settings row.
pub trait MifareSettingsRepository: Send + Sync {
    /// The current settings row (lowest id), if any.
    async fn find_current(&self) -> StorageResult<Option<MifareSettings>>;

    /// Insert the row if none exists, otherwise update it in place.
    async fn upsert(&self, key: &MifareKey, sector: SectorNumber) -> StorageResult<MifareSettings>;
}

/// SQLite implementation of MifareSettingsRepository
#[derive(Debug, Clone)]
pub struct SqliteMifareSettingsRepository {
    pool: SqlitePool,
}

impl SqliteMifareSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MifareSettingsRepository for SqliteMifareSettingsRepository {
    async fn find_current(&self) -> StorageResult<Option<MifareSettings>> {
        let settings = sqlx::query_as::<_, MifareSettings>(
            r#"
            SELECT id, key, sector_number
            FROM mifare_settings
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn upsert(&self, key: &MifareKey, sector: SectorNumber) -> StorageResult<MifareSettings> {
        let key_bytes = key.as_bytes().to_vec();
        let sector_number = i64::from(sector.as_u8());

        let settings = sqlx::query_as::<_, MifareSettings>(
            r#"
            INSERT INTO mifare_settings (id, key, sector_number)
            VALUES ((SELECT COALESCE(MIN(id), 1) FROM mifare_settings), ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                key = excluded.key,
                sector_number = excluded.sector_number
            RETURNING id, key, sector_number
            "#,
        )
        .bind(key_bytes)
        .bind(sector_number)
        .fetch_one(&self.pool)
        .await?;

        info!("Mifare settings saved for sector {}", sector);
        Ok(settings)
    }
}
