use chrono::NaiveDateTime;
use parkcard_core::{CardUid, ClientType, ClientTypeCode};
use serde::Serialize;
use std::fmt;

use crate::time::card_epoch;

/// Application-level view of a parking access card.
///
/// Fields with an `on-card` note are persisted in the 48-byte sector image;
/// the rest come from the terminal or the card database and are never
/// written by [`encode_sector`](crate::encode_sector).
///
/// The identifier is held once, as [`CardUid`]; the numeric id is a view of
/// it ([`CardRecord::id`]), so the two cannot drift apart.
///
/// # Examples
///
/// ```
/// use parkcard_core::{CardUid, ClientType};
/// use parkcard_protocol::CardRecord;
///
/// let mut record = CardRecord::from_id(2_882_364_904);
/// assert_eq!(record.uid().to_string(), "ABCD65E8");
///
/// record.set_client_type_raw(99);
/// assert_eq!(record.client_type(), ClientType::Unknown);
/// assert_eq!(record.client_type_raw(), 99);
///
/// record.set_client_type(ClientType::Subscription);
/// assert_eq!(record.client_type_raw(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    uid: CardUid,

    /// Time the vehicle entered the parking (on-card).
    pub parking_enter_time: NaiveDateTime,

    /// Last time money and tariffs were recalculated (on-card).
    pub last_recount_time: NaiveDateTime,

    /// Last payment time (on-card).
    pub last_payment_time: NaiveDateTime,

    /// Reset time of the free-time window (on-card).
    pub null_time_1: NaiveDateTime,

    /// Reset time of the free-entry counter (on-card).
    pub null_time_2: NaiveDateTime,

    /// Reset time of the subscription (on-card).
    pub null_time_3: NaiveDateTime,

    /// Accumulated time in the current period; crossing `null_time_1` resets it (on-card).
    pub tvp: NaiveDateTime,

    /// Balance in raw currency units (on-card).
    pub sum_on_card: i32,

    /// One-time TS id (on-card).
    pub ts_id: u8,

    /// One-time TP id (on-card).
    pub tp_id: u8,

    /// Current zone, updated on entry (on-card).
    pub zone_id: u8,

    /// Zone as read from the card; mirrors `zone_id` after decoding.
    pub zone_at_read: u8,

    /// One-time client group (on-card).
    pub client_group_id: u8,

    /// Entries counted in the free-pass window (on-card).
    pub tkvp: u8,

    client_type: ClientTypeCode,

    /// Time the sector was last written (on-card).
    pub date_save_card: NaiveDateTime,

    /// Blocked flag from the card database.
    pub is_blocked: bool,

    /// Time the card was blocked, from the card database.
    pub block_time: Option<NaiveDateTime>,

    /// Terminal (rack) number that handled the card.
    pub rack_number: i32,

    /// Ticket creation time, from the card database.
    pub created_at: Option<NaiveDateTime>,

    /// Last raw sector image read, kept for diagnostics.
    pub raw_data: Vec<u8>,
}

impl CardRecord {
    /// Fresh record for a card: every timestamp at the card epoch, every code zero.
    #[must_use]
    pub fn new(uid: CardUid) -> Self {
        let epoch = card_epoch();
        Self {
            uid,
            parking_enter_time: epoch,
            last_recount_time: epoch,
            last_payment_time: epoch,
            null_time_1: epoch,
            null_time_2: epoch,
            null_time_3: epoch,
            tvp: epoch,
            sum_on_card: 0,
            ts_id: 0,
            tp_id: 0,
            zone_id: 0,
            zone_at_read: 0,
            client_group_id: 0,
            tkvp: 0,
            client_type: ClientTypeCode::default(),
            date_save_card: epoch,
            is_blocked: false,
            block_time: None,
            rack_number: 0,
            created_at: None,
            raw_data: Vec::new(),
        }
    }

    /// Fresh record keyed by numeric id.
    #[must_use]
    pub fn from_id(id: u64) -> Self {
        Self::new(CardUid::from_id(id))
    }

    #[must_use]
    pub fn uid(&self) -> CardUid {
        self.uid
    }

    /// Numeric card id derived from the UID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.uid.id()
    }

    pub fn set_uid(&mut self, uid: CardUid) {
        self.uid = uid;
    }

    /// Replace the identifier from its numeric form; the UID follows.
    pub fn set_id(&mut self, id: u64) {
        self.uid = CardUid::from_id(id);
    }

    #[must_use]
    pub fn client_type(&self) -> ClientType {
        self.client_type.kind()
    }

    #[must_use]
    pub fn client_type_raw(&self) -> u8 {
        self.client_type.raw()
    }

    #[must_use]
    pub fn client_type_code(&self) -> ClientTypeCode {
        self.client_type
    }

    /// Set the category; the raw byte is re-encoded.
    pub fn set_client_type(&mut self, kind: ClientType) {
        self.client_type = ClientTypeCode::from_kind(kind);
    }

    /// Set the raw byte verbatim; the category may become `Unknown`.
    pub fn set_client_type_raw(&mut self, raw: u8) {
        self.client_type = ClientTypeCode::from_raw(raw);
    }
}

impl Default for CardRecord {
    fn default() -> Self {
        Self::new(CardUid::default())
    }
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{Card}}")?;
        writeln!(f, "  CardId {} ({})", self.id(), self.uid)?;
        writeln!(f, "  ParkingEnterTime: {}", self.parking_enter_time)?;
        writeln!(f, "  DateSaveCard: {}", self.date_save_card)?;
        writeln!(f, "  NullTime1 {}", self.null_time_1)?;
        writeln!(f, "  NullTime2 {}", self.null_time_2)?;
        writeln!(f, "  NullTime3 {}", self.null_time_3)?;
        writeln!(f, "  LastPaymentTime {}", self.last_payment_time)?;
        writeln!(f, "  LastRecountTime {}", self.last_recount_time)?;
        writeln!(f, "  TVP {}", self.tvp)?;
        writeln!(f, "  ClientGroupId {}", self.client_group_id)?;
        writeln!(f, "  ClientType: {}", self.client_type)?;
        writeln!(f, "  SumOnCard: {}", self.sum_on_card)?;
        writeln!(f, "  TKVP {}", self.tkvp)?;
        writeln!(f, "  TPId {}", self.tp_id)?;
        writeln!(f, "  TSId {}", self.ts_id)?;
        write!(f, "  ZoneId {}", self.zone_id)
    }
}
