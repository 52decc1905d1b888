//! On-card data model for the parking access card.
//!
//! A [`CardRecord`] is the application-level view of one Mifare data sector.
//! [`decode_sector`] and [`encode_sector`] map it to and from the fixed
//! 48-byte image described in [`parkcard_core::constants`]. Both are pure and
//! hold no state, so they can be called from any number of tasks at once.
//!
//! ```
//! use parkcard_core::CardUid;
//! use parkcard_protocol::{decode_sector, encode_sector, CardRecord};
//!
//! let uid = CardUid::new([0xAB, 0xCD, 0x65, 0xE8]);
//! let mut record = CardRecord::new(uid);
//! record.sum_on_card = 1500;
//!
//! let sector = encode_sector(&record)?;
//! let decoded = decode_sector(uid, &sector)?;
//! assert_eq!(decoded.sum_on_card, 1500);
//! assert_eq!(decoded.id(), 2_882_364_904);
//! # Ok::<(), parkcard_core::Error>(())
//! ```

pub mod codec;
pub mod record;
pub mod time;

pub use codec::{decode_sector, decode_sector_into, encode_sector};
pub use record::CardRecord;
pub use time::{card_epoch, from_card_seconds, to_card_seconds};
