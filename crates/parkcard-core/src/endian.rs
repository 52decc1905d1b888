//! Host/wire conversion for 32-bit integers.
//!
//! The card stores every multi-byte integer little-endian. This is the only
//! module that decides byte order; everything else goes through
//! [`to_wire_bytes`] and [`from_wire_bytes`].

/// Convert a host integer to its 4-byte little-endian wire image.
///
/// # Examples
///
/// ```
/// use parkcard_core::endian::to_wire_bytes;
///
/// assert_eq!(to_wire_bytes(1), [0x01, 0x00, 0x00, 0x00]);
/// assert_eq!(to_wire_bytes(-1), [0xFF, 0xFF, 0xFF, 0xFF]);
/// ```
#[inline]
#[must_use]
pub fn to_wire_bytes(value: i32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Convert a 4-byte little-endian wire image back to a host integer.
///
/// # Examples
///
/// ```
/// use parkcard_core::endian::from_wire_bytes;
///
/// assert_eq!(from_wire_bytes([0x10, 0x27, 0x00, 0x00]), 10_000);
/// ```
#[inline]
#[must_use]
pub fn from_wire_bytes(bytes: [u8; 4]) -> i32 {
    i32::from_le_bytes(bytes)
}
