//! Mifare Classic access parameters: sector key and data sector index.

use crate::{
    Result,
    constants::{MAX_SECTOR_NUMBER, MIFARE_KEY_LENGTH, MIN_SECTOR_NUMBER},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 6-byte Mifare Classic sector key.
///
/// Text form is six colon-separated hex octets, e.g. `FF:FF:FF:FF:FF:FF`.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MifareKey([u8; MIFARE_KEY_LENGTH]);

impl MifareKey {
    /// Factory default transport key.
    pub const DEFAULT: Self = Self([0xFF; MIFARE_KEY_LENGTH]);

    #[must_use]
    pub const fn new(bytes: [u8; MIFARE_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; MIFARE_KEY_LENGTH] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; MIFARE_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidMifareKey(format!(
                "key must be {MIFARE_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }
}

impl std::str::FromStr for MifareKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != MIFARE_KEY_LENGTH {
            return Err(Error::InvalidMifareKey(format!(
                "expected {MIFARE_KEY_LENGTH} colon-separated octets, got {}",
                parts.len()
            )));
        }

        let mut bytes = [0u8; MIFARE_KEY_LENGTH];
        for (byte, part) in bytes.iter_mut().zip(&parts) {
            if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::InvalidMifareKey(format!("invalid octet {part:?}")));
            }
            *byte = u8::from_str_radix(part, 16)
                .map_err(|_| Error::InvalidMifareKey(format!("invalid octet {part:?}")))?;
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for MifareKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

// Keys are secrets; keep them out of debug logs.
impl fmt::Debug for MifareKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("MifareKey(**:**:**:**:**:**)")
    }
}

/// Data sector holding the card record (1-15 on a Classic 1K card).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorNumber(u8);

impl SectorNumber {
    /// Create a sector number with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidSector` if the value is outside 1-15.
    pub fn new(sector: i64) -> Result<Self> {
        match u8::try_from(sector) {
            Ok(n) if (MIN_SECTOR_NUMBER..=MAX_SECTOR_NUMBER).contains(&n) => Ok(Self(n)),
            _ => Err(Error::InvalidSector(sector)),
        }
    }

    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SectorNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
