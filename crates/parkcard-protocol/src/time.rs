//! Card time encoding.
//!
//! Timestamps are persisted as signed 32-bit second offsets from
//! 2000-01-01T00:00:00 (wall-clock, no time zone). Sub-second precision is
//! dropped on the way to the card.

use chrono::{NaiveDateTime, TimeDelta};
use parkcard_core::{Error, Result, constants::CARD_EPOCH_UNIX_SECONDS};

/// The card epoch, 2000-01-01T00:00:00.
#[must_use]
pub fn card_epoch() -> NaiveDateTime {
    NaiveDateTime::default() + TimeDelta::seconds(CARD_EPOCH_UNIX_SECONDS)
}

/// Whole seconds from the card epoch to `time`, rounded toward negative infinity.
///
/// # Errors
/// Returns `Error::TimeOutOfRange` if the offset does not fit in an `i32`
/// (roughly before 1931-12-13 or after 2068-01-19).
pub fn to_card_seconds(field: &'static str, time: NaiveDateTime) -> Result<i32> {
    // timestamp() floors; nanoseconds are always non-negative
    let seconds = time.and_utc().timestamp() - CARD_EPOCH_UNIX_SECONDS;
    i32::try_from(seconds).map_err(|_| Error::TimeOutOfRange { field, seconds })
}

/// Absolute time for an on-card second offset.
#[must_use]
pub fn from_card_seconds(seconds: i32) -> NaiveDateTime {
    card_epoch() + TimeDelta::seconds(i64::from(seconds))
}
