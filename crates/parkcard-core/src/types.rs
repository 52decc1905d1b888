use crate::{Result, constants::UID_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Fold a 4-byte UID into its numeric identifier.
///
/// The bytes are read as a big-endian unsigned integer: each byte is shifted
/// in as the new low-order byte.
///
/// The fold itself would work for any length, but the inverse
/// ([`uid_from_id`]) only reproduces 4 bytes, so the contract is fixed to
/// 4-byte NUIDs.
///
/// # Examples
///
/// ```
/// use parkcard_core::id_from_uid;
///
/// assert_eq!(id_from_uid(&[0xAB, 0xCD, 0x65, 0xE8]), 2_882_364_904);
/// ```
#[must_use]
pub fn id_from_uid(uid: &[u8; UID_LENGTH]) -> u64 {
    uid.iter().fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// Unpack the numeric identifier into a 4-byte UID.
///
/// Takes the low-order four bytes of `id` and emits them most-significant
/// first. Higher bytes of `id` are discarded.
#[must_use]
pub fn uid_from_id(id: u64) -> [u8; UID_LENGTH] {
    let le = id.to_le_bytes();
    [le[3], le[2], le[1], le[0]]
}

/// Card unique identifier (4-byte Mifare NUID).
///
/// Owns the raw bytes; the numeric identifier used by the rest of the system
/// is a view computed from them, so the two can never disagree.
///
/// The text form is 8 uppercase hex digits with no separators.
///
/// # Security
/// [`CardUid::matches`] uses constant-time comparison when checking a
/// caller-supplied identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardUid([u8; UID_LENGTH]);

impl CardUid {
    /// Wrap raw UID bytes.
    #[must_use]
    pub const fn new(bytes: [u8; UID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build the UID from its numeric identifier.
    #[must_use]
    pub fn from_id(id: u64) -> Self {
        Self(uid_from_id(id))
    }

    /// Numeric identifier view.
    #[must_use]
    pub fn id(&self) -> u64 {
        id_from_uid(&self.0)
    }

    /// Raw bytes view.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; UID_LENGTH] {
        &self.0
    }

    /// Compare against a caller-supplied identifier in text form.
    ///
    /// The candidate is trimmed and upper-cased before comparison.
    #[must_use]
    pub fn matches(&self, identifier: &str) -> bool {
        let candidate = identifier.trim().to_uppercase();
        self.to_string().as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl From<[u8; UID_LENGTH]> for CardUid {
    fn from(bytes: [u8; UID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for CardUid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; UID_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidUid(format!(
                "UID must be {UID_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for CardUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != UID_LENGTH * 2 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidUid(format!(
                "expected {} hex digits, got {s:?}",
                UID_LENGTH * 2
            )));
        }

        let mut bytes = [0u8; UID_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| Error::InvalidUid(format!("invalid hex pair {pair:?}")))?;
        }
        Ok(Self(bytes))
    }
}

/// Client category stored on the card.
///
/// Discriminants match the signed codes used by the parking controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum ClientType {
    /// Raw byte outside the known codes.
    Unknown = -1,
    /// Single-visit ticket.
    OneTime = 0,
    /// Regular subscriber.
    Subscription = 1,
    /// Penalty ticket, behaves like a one-time ticket.
    Penalty = 2,
    /// Subscriber whose zone is never checked.
    Unlimited = 3,
}

impl ClientType {
    /// Decode a raw card byte. Unrecognised values map to `Unknown`.
    #[inline]
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::OneTime,
            1 => Self::Subscription,
            2 => Self::Penalty,
            3 => Self::Unlimited,
            _ => Self::Unknown,
        }
    }

    /// Signed discriminant (-1..=3).
    #[inline]
    #[must_use]
    pub fn code(self) -> i8 {
        self as i8
    }

    /// Byte written to the card for this variant. `Unknown` encodes as `0xFF`.
    #[inline]
    #[must_use]
    pub fn to_raw(self) -> u8 {
        self.code() as u8
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientType::Unknown => write!(f, "Unknown"),
            ClientType::OneTime => write!(f, "OneTime"),
            ClientType::Subscription => write!(f, "Subscription"),
            ClientType::Penalty => write!(f, "Penalty"),
            ClientType::Unlimited => write!(f, "Unlimited"),
        }
    }
}

/// Raw client type byte together with its decoded variant.
///
/// The two constructors are intentionally asymmetric:
/// - [`ClientTypeCode::from_kind`] always yields a byte that decodes back to the same variant.
/// - [`ClientTypeCode::from_raw`] keeps whatever byte was read, even when the
///   variant decodes to `Unknown`, so an unrecognised card value survives a
///   read/write cycle untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ClientTypeCode {
    raw: u8,
    kind: ClientType,
}

impl ClientTypeCode {
    #[must_use]
    pub fn from_kind(kind: ClientType) -> Self {
        Self {
            raw: kind.to_raw(),
            kind,
        }
    }

    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        Self {
            raw,
            kind: ClientType::from_raw(raw),
        }
    }

    /// Byte as stored on the card.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Decoded variant.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ClientType {
        self.kind
    }
}

impl Default for ClientTypeCode {
    fn default() -> Self {
        Self::from_kind(ClientType::OneTime)
    }
}

impl From<ClientType> for ClientTypeCode {
    fn from(kind: ClientType) -> Self {
        Self::from_kind(kind)
    }
}

impl fmt::Display for ClientTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} => {}", self.raw, self.kind)
    }
}
