use parkcard_core::{MifareKey, SectorNumber};
use serde::Serialize;

/// Mifare sector access settings row.
///
/// Stored values are checked on the way out: a row written by another tool
/// with a short key or an out-of-range sector yields an error from
/// [`key`](Self::key) or [`sector`](Self::sector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MifareSettings {
    pub id: i64,

    /// Raw 6-byte sector key
    pub key: Vec<u8>,

    /// Data sector index
    pub sector_number: i64,
}

impl MifareSettings {
    /// Parsed sector key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMifareKey` if the stored blob is not 6 bytes.
    pub fn key(&self) -> parkcard_core::Result<MifareKey> {
        MifareKey::try_from(self.key.as_slice())
    }

    /// Validated sector number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSector` if the stored value is outside 1..=15.
    pub fn sector(&self) -> parkcard_core::Result<SectorNumber> {
        SectorNumber::new(self.sector_number)
    }
}
