//! Constants for the on-card sector image and reader configuration.
//!
//! # Sector Layout
//!
//! The card record occupies one 48-byte Mifare data sector (three 16-byte
//! blocks). Multi-byte integers are little-endian on the wire.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | parking enter time |
//! | 4 | 4 | last recount time |
//! | 8 | 1 | TS id |
//! | 9 | 1 | TP id |
//! | 10 | 1 | zone id |
//! | 11 | 1 | client group id |
//! | 12 | 4 | sum on card |
//! | 16 | 4 | last payment time |
//! | 20 | 4 | null time 1 |
//! | 24 | 4 | null time 2 |
//! | 28 | 4 | null time 3 |
//! | 32 | 4 | TVP |
//! | 36 | 1 | TKVP |
//! | 37 | 1 | client type id |
//! | 38 | 6 | reserved (zero) |
//! | 44 | 4 | date save card |

// ============================================================================
// Sector Image
// ============================================================================

/// Size of the encoded card record in bytes.
pub const SECTOR_SIZE: usize = 48;

/// Length of the card unique identifier (NUID) in bytes.
pub const UID_LENGTH: usize = 4;

/// Offset of the parking enter time.
pub const OFFSET_PARKING_ENTER_TIME: usize = 0;

/// Offset of the last recount time.
pub const OFFSET_LAST_RECOUNT_TIME: usize = 4;

/// Offset of the TS id byte.
pub const OFFSET_TS_ID: usize = 8;

/// Offset of the TP id byte.
pub const OFFSET_TP_ID: usize = 9;

/// Offset of the zone id byte.
pub const OFFSET_ZONE_ID: usize = 10;

/// Offset of the client group id byte.
pub const OFFSET_CLIENT_GROUP_ID: usize = 11;

/// Offset of the signed balance.
pub const OFFSET_SUM_ON_CARD: usize = 12;

/// Offset of the last payment time.
pub const OFFSET_LAST_PAYMENT_TIME: usize = 16;

/// Offset of null time 1 (free-time window reset).
pub const OFFSET_NULL_TIME_1: usize = 20;

/// Offset of null time 2 (free-entry counter reset).
pub const OFFSET_NULL_TIME_2: usize = 24;

/// Offset of null time 3 (subscription reset).
pub const OFFSET_NULL_TIME_3: usize = 28;

/// Offset of the accumulated time-per-period.
pub const OFFSET_TVP: usize = 32;

/// Offset of the entry counter for the free-pass window.
pub const OFFSET_TKVP: usize = 36;

/// Offset of the raw client type byte.
pub const OFFSET_CLIENT_TYPE: usize = 37;

/// Offset of the reserved region.
pub const OFFSET_RESERVED: usize = 38;

/// Length of the reserved region.
pub const RESERVED_LENGTH: usize = 6;

/// Offset of the last save time.
pub const OFFSET_DATE_SAVE_CARD: usize = 44;

/// Seconds between 1970-01-01T00:00:00 and the card epoch 2000-01-01T00:00:00.
pub const CARD_EPOCH_UNIX_SECONDS: i64 = 946_684_800;

// ============================================================================
// Reader Settings
// ============================================================================

/// Port name reported when no settings record exists.
///
/// Deliberately not a real device so the settings resolve as invalid.
pub const INVALID_PORT_NAME: &str = "invalid";

/// Baud rate reported when no settings record exists.
pub const DEFAULT_PORT_SPEED: i32 = 9600;

// ============================================================================
// Mifare Access
// ============================================================================

/// Length of a Mifare Classic sector key.
pub const MIFARE_KEY_LENGTH: usize = 6;

/// Lowest data sector usable for the card record (sector 0 holds the manufacturer block).
pub const MIN_SECTOR_NUMBER: u8 = 1;

/// Highest sector on a Mifare Classic 1K card.
pub const MAX_SECTOR_NUMBER: u8 = 15;
