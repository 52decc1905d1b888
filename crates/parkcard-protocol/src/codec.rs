//! 48-byte sector codec for [`CardRecord`].
//!
//! # Wire Format
//!
//! See [`parkcard_core::constants`] for the offset table. Every 4-byte field
//! goes through [`parkcard_core::endian`]; timestamps go through
//! [`crate::time`] first.
//!
//! # Error Handling
//!
//! - A sector shorter than [`SECTOR_SIZE`] is rejected with
//!   `Error::SectorLength`; nothing is padded or truncated. Longer input
//!   (e.g. a dump including the sector trailer) is accepted and only the
//!   first 48 bytes are interpreted.
//! - A timestamp whose epoch offset does not fit 32 bits fails encoding with
//!   `Error::TimeOutOfRange`.
//! - An unrecognised client type byte is not an error; it decodes to
//!   `ClientType::Unknown` with the byte preserved.

use bytes::{BufMut, BytesMut};
use chrono::NaiveDateTime;
use parkcard_core::{
    CardUid, Error, Result,
    constants::*,
    endian::{from_wire_bytes, to_wire_bytes},
};

use crate::record::CardRecord;
use crate::time::{from_card_seconds, to_card_seconds};

/// Decode a sector image read from the card with the given UID.
///
/// # Errors
/// Returns `Error::SectorLength` if `sector` is shorter than 48 bytes.
///
/// # Examples
///
/// ```
/// use parkcard_core::{CardUid, ClientType};
/// use parkcard_protocol::{card_epoch, decode_sector};
///
/// let mut sector = [0u8; 48];
/// sector[36] = 1;
/// sector[37] = 2;
///
/// let record = decode_sector(CardUid::new([0xAB, 0xCD, 0x65, 0xE8]), &sector)?;
/// assert_eq!(record.tkvp, 1);
/// assert_eq!(record.client_type(), ClientType::Penalty);
/// assert_eq!(record.parking_enter_time, card_epoch());
/// # Ok::<(), parkcard_core::Error>(())
/// ```
pub fn decode_sector(uid: CardUid, sector: &[u8]) -> Result<CardRecord> {
    let mut record = CardRecord::new(uid);
    decode_sector_into(&mut record, uid, sector)?;
    Ok(record)
}

/// Decode a sector image over an existing record.
///
/// Only the identifier, the on-card fields, `zone_at_read` and `raw_data`
/// are replaced. Database-side fields (`is_blocked`, `block_time`,
/// `rack_number`, `created_at`) keep their values. On error the record is
/// left untouched.
///
/// # Errors
/// Returns `Error::SectorLength` if `sector` is shorter than 48 bytes.
pub fn decode_sector_into(record: &mut CardRecord, uid: CardUid, sector: &[u8]) -> Result<()> {
    if sector.len() < SECTOR_SIZE {
        return Err(Error::SectorLength {
            expected: SECTOR_SIZE,
            actual: sector.len(),
        });
    }

    record.set_uid(uid);
    record.parking_enter_time = read_time(sector, OFFSET_PARKING_ENTER_TIME);
    record.last_recount_time = read_time(sector, OFFSET_LAST_RECOUNT_TIME);
    record.ts_id = sector[OFFSET_TS_ID];
    record.tp_id = sector[OFFSET_TP_ID];
    record.zone_id = sector[OFFSET_ZONE_ID];
    record.zone_at_read = record.zone_id;
    record.client_group_id = sector[OFFSET_CLIENT_GROUP_ID];
    record.sum_on_card = read_i32(sector, OFFSET_SUM_ON_CARD);
    record.last_payment_time = read_time(sector, OFFSET_LAST_PAYMENT_TIME);
    record.null_time_1 = read_time(sector, OFFSET_NULL_TIME_1);
    record.null_time_2 = read_time(sector, OFFSET_NULL_TIME_2);
    record.null_time_3 = read_time(sector, OFFSET_NULL_TIME_3);
    record.tvp = read_time(sector, OFFSET_TVP);
    record.tkvp = sector[OFFSET_TKVP];
    record.set_client_type_raw(sector[OFFSET_CLIENT_TYPE]);
    record.date_save_card = read_time(sector, OFFSET_DATE_SAVE_CARD);
    record.raw_data = sector.to_vec();

    Ok(())
}

/// Encode the on-card fields of `record` into a sector image.
///
/// The identifier, `zone_at_read`, the database-side fields and raw data
/// are not part of the image; the caller passes the UID to the reader
/// separately.
///
/// # Errors
/// Returns `Error::TimeOutOfRange` if any timestamp is outside the 32-bit
/// second range around the card epoch.
pub fn encode_sector(record: &CardRecord) -> Result<[u8; SECTOR_SIZE]> {
    let mut buf = BytesMut::with_capacity(SECTOR_SIZE);

    put_time(&mut buf, "parking_enter_time", record.parking_enter_time)?;
    put_time(&mut buf, "last_recount_time", record.last_recount_time)?;
    buf.put_u8(record.ts_id);
    buf.put_u8(record.tp_id);
    buf.put_u8(record.zone_id);
    buf.put_u8(record.client_group_id);
    buf.put_slice(&to_wire_bytes(record.sum_on_card));
    put_time(&mut buf, "last_payment_time", record.last_payment_time)?;
    put_time(&mut buf, "null_time_1", record.null_time_1)?;
    put_time(&mut buf, "null_time_2", record.null_time_2)?;
    put_time(&mut buf, "null_time_3", record.null_time_3)?;
    put_time(&mut buf, "tvp", record.tvp)?;
    buf.put_u8(record.tkvp);
    buf.put_u8(record.client_type_raw());
    buf.put_bytes(0, RESERVED_LENGTH);
    put_time(&mut buf, "date_save_card", record.date_save_card)?;

    debug_assert_eq!(buf.len(), SECTOR_SIZE);

    let mut sector = [0u8; SECTOR_SIZE];
    sector.copy_from_slice(&buf);
    Ok(sector)
}

fn read_i32(sector: &[u8], offset: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&sector[offset..offset + 4]);
    from_wire_bytes(raw)
}

fn read_time(sector: &[u8], offset: usize) -> NaiveDateTime {
    from_card_seconds(read_i32(sector, offset))
}

fn put_time(buf: &mut BytesMut, field: &'static str, time: NaiveDateTime) -> Result<()> {
    buf.put_slice(&to_wire_bytes(to_card_seconds(field, time)?));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::card_epoch;
    use chrono::{NaiveDate, TimeDelta};
    use parkcard_core::ClientType;
    use rstest::rstest;

    const UID: CardUid = CardUid::new([0xAB, 0xCD, 0x65, 0xE8]);

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_decode_zero_sector() {
        let record = decode_sector(UID, &[0u8; SECTOR_SIZE]).unwrap();

        assert_eq!(record.parking_enter_time, at(2000, 1, 1, 0, 0, 0));
        assert_eq!(record.date_save_card, card_epoch());
        assert_eq!(record.sum_on_card, 0);
        assert_eq!(record.client_type(), ClientType::OneTime);
        assert_eq!(record.id(), 2_882_364_904);
    }

    #[test]
    fn test_decode_counter_and_client_type() {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[OFFSET_TKVP] = 1;
        sector[OFFSET_CLIENT_TYPE] = 2;

        let record = decode_sector(UID, &sector).unwrap();
        assert_eq!(record.tkvp, 1);
        assert_eq!(record.client_type(), ClientType::Penalty);
    }

    #[test]
    fn test_decode_unknown_client_type_keeps_byte() {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[OFFSET_CLIENT_TYPE] = 99;

        let record = decode_sector(UID, &sector).unwrap();
        assert_eq!(record.client_type(), ClientType::Unknown);
        assert_eq!(record.client_type_raw(), 99);

        let encoded = encode_sector(&record).unwrap();
        assert_eq!(encoded[OFFSET_CLIENT_TYPE], 99);
    }

    #[test]
    fn test_decode_field_offsets() {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[OFFSET_PARKING_ENTER_TIME..OFFSET_PARKING_ENTER_TIME + 4]
            .copy_from_slice(&[0x3C, 0x00, 0x00, 0x00]); // 60 s
        sector[OFFSET_TS_ID] = 7;
        sector[OFFSET_TP_ID] = 8;
        sector[OFFSET_ZONE_ID] = 9;
        sector[OFFSET_CLIENT_GROUP_ID] = 10;
        sector[OFFSET_SUM_ON_CARD..OFFSET_SUM_ON_CARD + 4]
            .copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]); // -1
        sector[OFFSET_TVP..OFFSET_TVP + 4].copy_from_slice(&[0x80, 0x51, 0x01, 0x00]); // 86 400 s
        sector[OFFSET_DATE_SAVE_CARD..OFFSET_DATE_SAVE_CARD + 4]
            .copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]); // -1 s

        let record = decode_sector(UID, &sector).unwrap();
        assert_eq!(record.parking_enter_time, at(2000, 1, 1, 0, 1, 0));
        assert_eq!(record.ts_id, 7);
        assert_eq!(record.tp_id, 8);
        assert_eq!(record.zone_id, 9);
        assert_eq!(record.zone_at_read, 9);
        assert_eq!(record.client_group_id, 10);
        assert_eq!(record.sum_on_card, -1);
        assert_eq!(record.tvp, at(2000, 1, 2, 0, 0, 0));
        assert_eq!(record.date_save_card, at(1999, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_decode_ignores_reserved_bytes() {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[OFFSET_RESERVED..OFFSET_RESERVED + RESERVED_LENGTH].fill(0xAA);

        let record = decode_sector(UID, &sector).unwrap();
        assert_eq!(record.raw_data, sector.to_vec());

        let encoded = encode_sector(&record).unwrap();
        assert_eq!(
            &encoded[OFFSET_RESERVED..OFFSET_RESERVED + RESERVED_LENGTH],
            &[0u8; RESERVED_LENGTH]
        );
    }

    #[rstest]
    #[case(0)]
    #[case(16)]
    #[case(47)]
    fn test_decode_short_sector(#[case] len: usize) {
        let sector = vec![0u8; len];
        assert!(matches!(
            decode_sector(UID, &sector),
            Err(Error::SectorLength { expected: 48, actual }) if actual == len
        ));
    }

    #[test]
    fn test_decode_accepts_trailing_bytes() {
        let mut sector = vec![0u8; 64];
        sector[OFFSET_TKVP] = 5;
        sector[60] = 0xEE;

        let record = decode_sector(UID, &sector).unwrap();
        assert_eq!(record.tkvp, 5);
        assert_eq!(record.raw_data.len(), 64);
    }

    #[test]
    fn test_decode_into_keeps_database_fields() {
        let created = at(2024, 3, 1, 8, 0, 0);
        let mut record = CardRecord::new(CardUid::new([1, 2, 3, 4]));
        record.is_blocked = true;
        record.block_time = Some(at(2024, 3, 2, 9, 30, 0));
        record.rack_number = 7;
        record.created_at = Some(created);
        record.sum_on_card = 999;

        let mut sector = [0u8; SECTOR_SIZE];
        sector[OFFSET_ZONE_ID] = 4;
        sector[OFFSET_CLIENT_TYPE] = 2;
        decode_sector_into(&mut record, UID, &sector).unwrap();

        assert_eq!(record.uid(), UID);
        assert_eq!(record.sum_on_card, 0);
        assert_eq!(record.zone_at_read, 4);
        assert_eq!(record.client_type(), ClientType::Penalty);
        assert!(record.is_blocked);
        assert_eq!(record.block_time, Some(at(2024, 3, 2, 9, 30, 0)));
        assert_eq!(record.rack_number, 7);
        assert_eq!(record.created_at, Some(created));
    }

    #[test]
    fn test_decode_into_short_sector_leaves_record_untouched() {
        let mut record = CardRecord::new(CardUid::new([1, 2, 3, 4]));
        record.sum_on_card = 999;
        let before = record.clone();

        assert!(decode_sector_into(&mut record, UID, &[0u8; 20]).is_err());
        assert_eq!(record, before);
    }

    #[test]
    fn test_encode_layout() {
        let mut record = CardRecord::new(UID);
        record.parking_enter_time = at(2000, 1, 1, 0, 1, 0);
        record.sum_on_card = 10_000;
        record.zone_id = 3;
        record.zone_at_read = 200;
        record.tkvp = 4;
        record.set_client_type(ClientType::Subscription);
        record.date_save_card = at(2000, 1, 2, 0, 0, 0);
        record.is_blocked = true;
        record.raw_data = vec![0xAA; 48];

        let sector = encode_sector(&record).unwrap();
        assert_eq!(&sector[0..4], &[0x3C, 0x00, 0x00, 0x00]);
        assert_eq!(sector[OFFSET_ZONE_ID], 3);
        assert_eq!(&sector[12..16], &[0x10, 0x27, 0x00, 0x00]);
        assert_eq!(sector[OFFSET_TKVP], 4);
        assert_eq!(sector[OFFSET_CLIENT_TYPE], 1);
        assert_eq!(&sector[44..48], &[0x80, 0x51, 0x01, 0x00]);
        // zone_at_read, is_blocked and raw_data are not persisted
        assert!(!sector.contains(&200));
        assert!(!sector.contains(&0xAA));
    }

    #[test]
    fn test_encode_drops_sub_second_precision() {
        let mut record = CardRecord::new(UID);
        record.last_payment_time = at(2010, 5, 5, 5, 5, 5) + TimeDelta::milliseconds(750);

        let decoded = decode_sector(UID, &encode_sector(&record).unwrap()).unwrap();
        assert_eq!(decoded.last_payment_time, at(2010, 5, 5, 5, 5, 5));
    }

    #[test]
    fn test_encode_time_out_of_range() {
        let mut record = CardRecord::new(UID);
        record.null_time_2 = at(2100, 1, 1, 0, 0, 0);

        assert!(matches!(
            encode_sector(&record),
            Err(Error::TimeOutOfRange {
                field: "null_time_2",
                ..
            })
        ));
    }
}
