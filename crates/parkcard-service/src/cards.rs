//! Card read/write on top of a reader transport.
//!
//! Writing is guarded: the UID of the card currently in the field must match
//! the identifier the caller expects, so a card swapped between read and
//! write is never overwritten.

use chrono::NaiveDateTime;
use parkcard_core::{MifareKey, SectorNumber};
use parkcard_hardware::traits::CardReaderTransport;
use parkcard_protocol::{CardRecord, decode_sector, decode_sector_into, encode_sector};
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Reads and writes [`CardRecord`]s through a [`CardReaderTransport`].
///
/// # Examples
///
/// ```
/// use parkcard_core::{CardUid, MifareKey, SectorNumber};
/// use parkcard_hardware::mock::MockCardReader;
/// use parkcard_service::CardService;
///
/// #[tokio::main]
/// async fn main() -> parkcard_service::ServiceResult<()> {
///     let (reader, handle) = MockCardReader::new();
///     handle.present_card(CardUid::new([0xAB, 0xCD, 0x65, 0xE8]), MifareKey::DEFAULT);
///
///     let mut service = CardService::new(reader);
///     let sector = SectorNumber::new(1).unwrap();
///     let record = service.read_card(&MifareKey::DEFAULT, sector).await?;
///     assert_eq!(record.id(), 2_882_364_904);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct CardService<T> {
    transport: T,
}

impl<T: CardReaderTransport> CardService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Read and decode the record stored in `sector` of the card in the field.
    ///
    /// # Errors
    ///
    /// Returns `Hardware` for reader failures and `Codec` for a short sector.
    pub async fn read_card(
        &mut self,
        key: &MifareKey,
        sector: SectorNumber,
    ) -> ServiceResult<CardRecord> {
        let raw = self.transport.read_sector(key, sector).await?;
        let record = decode_sector(raw.uid, &raw.data)?;
        debug!("Read card {} from sector {}", record.uid(), sector);
        Ok(record)
    }

    /// Re-read the card into an existing record, keeping its database-side
    /// fields (blocking state, rack number, creation time).
    ///
    /// # Errors
    ///
    /// Same as [`read_card`](Self::read_card); `record` is unchanged on error.
    pub async fn refresh_card(
        &mut self,
        record: &mut CardRecord,
        key: &MifareKey,
        sector: SectorNumber,
    ) -> ServiceResult<()> {
        let raw = self.transport.read_sector(key, sector).await?;
        decode_sector_into(record, raw.uid, &raw.data)?;
        debug!("Refreshed card {} from sector {}", record.uid(), sector);
        Ok(())
    }

    /// Stamp `record` with `saved_at` and write it to the card in the field.
    ///
    /// Returns the record as written.
    ///
    /// # Errors
    ///
    /// Returns `ForeignCard` if the card in the field does not render as
    /// `expected_identifier`; nothing is written in that case.
    pub async fn write_card(
        &mut self,
        expected_identifier: &str,
        key: &MifareKey,
        sector: SectorNumber,
        mut record: CardRecord,
        saved_at: NaiveDateTime,
    ) -> ServiceResult<CardRecord> {
        let uid = self.transport.card_uid().await?;
        if !uid.matches(expected_identifier) {
            warn!(
                "Refusing to write: card {} in reader, expected {}",
                uid, expected_identifier
            );
            return Err(ServiceError::ForeignCard {
                expected: expected_identifier.trim().to_string(),
                actual: uid,
            });
        }

        record.set_uid(uid);
        record.date_save_card = saved_at;
        let image = encode_sector(&record)?;

        self.transport.write_sector(key, sector, &image).await?;
        record.raw_data = image.to_vec();
        info!("Wrote card {} sector {}", uid, sector);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use parkcard_core::constants::SECTOR_SIZE;
    use parkcard_core::{CardUid, ClientType};
    use parkcard_hardware::HardwareError;
    use parkcard_hardware::mock::{MockCardReader, MockCardReaderHandle};
    use parkcard_protocol::card_epoch;
    use rstest::rstest;

    const UID: CardUid = CardUid::new([0xAB, 0xCD, 0x65, 0xE8]);

    fn sector() -> SectorNumber {
        SectorNumber::new(2).unwrap()
    }

    fn service_with_card() -> (CardService<MockCardReader>, MockCardReaderHandle) {
        let (reader, handle) = MockCardReader::new();
        handle.present_card(UID, MifareKey::DEFAULT);
        (CardService::new(reader), handle)
    }

    #[tokio::test]
    async fn test_read_blank_card() {
        let (mut service, _handle) = service_with_card();

        let record = service.read_card(&MifareKey::DEFAULT, sector()).await.unwrap();
        assert_eq!(record.uid(), UID);
        assert_eq!(record.parking_enter_time, card_epoch());
        assert_eq!(record.client_type(), ClientType::OneTime);
        assert_eq!(record.raw_data, vec![0; SECTOR_SIZE]);
    }

    #[tokio::test]
    async fn test_write_then_read_back() {
        let (mut service, handle) = service_with_card();
        let saved_at = card_epoch() + TimeDelta::days(9000);

        let mut record = CardRecord::new(UID);
        record.sum_on_card = 2500;
        record.zone_id = 3;
        record.set_client_type(ClientType::Subscription);

        let written = service
            .write_card("abcd65e8", &MifareKey::DEFAULT, sector(), record, saved_at)
            .await
            .unwrap();
        assert_eq!(written.date_save_card, saved_at);
        assert_eq!(handle.sector(sector()), Some(written.raw_data.clone()));

        let read = service.read_card(&MifareKey::DEFAULT, sector()).await.unwrap();
        assert_eq!(read.sum_on_card, 2500);
        assert_eq!(read.zone_id, 3);
        assert_eq!(read.client_type(), ClientType::Subscription);
        assert_eq!(read.date_save_card, saved_at);
    }

    #[tokio::test]
    async fn test_refresh_keeps_database_fields() {
        let (mut service, handle) = service_with_card();
        let mut stored = CardRecord::new(UID);
        stored.sum_on_card = 700;
        handle
            .set_sector(sector(), encode_sector(&stored).unwrap().to_vec())
            .unwrap();

        let created = card_epoch() + TimeDelta::days(8000);
        let mut record = CardRecord::new(CardUid::default());
        record.is_blocked = true;
        record.rack_number = 12;
        record.created_at = Some(created);

        service
            .refresh_card(&mut record, &MifareKey::DEFAULT, sector())
            .await
            .unwrap();

        assert_eq!(record.uid(), UID);
        assert_eq!(record.sum_on_card, 700);
        assert!(record.is_blocked);
        assert_eq!(record.rack_number, 12);
        assert_eq!(record.created_at, Some(created));
    }

    #[rstest]
    #[case("01020304")]
    #[case("")]
    #[case("ABCD65E9")]
    #[tokio::test]
    async fn test_write_refuses_foreign_card(#[case] expected: &str) {
        let (mut service, handle) = service_with_card();

        let result = service
            .write_card(
                expected,
                &MifareKey::DEFAULT,
                sector(),
                CardRecord::new(UID),
                card_epoch(),
            )
            .await;

        assert!(matches!(result, Err(ServiceError::ForeignCard { actual, .. }) if actual == UID));
        assert_eq!(handle.write_count(), 0);
        assert!(handle.sector(sector()).is_none());
    }

    #[tokio::test]
    async fn test_write_without_card() {
        let (reader, _handle) = MockCardReader::new();
        let mut service = CardService::new(reader);

        let result = service
            .write_card(
                "ABCD65E8",
                &MifareKey::DEFAULT,
                sector(),
                CardRecord::new(UID),
                card_epoch(),
            )
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Hardware(HardwareError::NoCard))
        ));
    }

    #[tokio::test]
    async fn test_read_with_wrong_key() {
        let (mut service, _handle) = service_with_card();
        let key = MifareKey::new([1, 2, 3, 4, 5, 6]);

        let result = service.read_card(&key, sector()).await;
        assert!(matches!(
            result,
            Err(ServiceError::Hardware(HardwareError::AuthenticationFailed { sector: 2 }))
        ));
    }

    #[tokio::test]
    async fn test_read_short_sector_is_codec_error() {
        let (mut service, handle) = service_with_card();
        handle.set_sector(sector(), vec![0; 16]).unwrap();

        let result = service.read_card(&MifareKey::DEFAULT, sector()).await;
        assert!(matches!(result, Err(ServiceError::Codec(_))));
    }

    #[tokio::test]
    async fn test_write_out_of_range_time_is_codec_error() {
        let (mut service, handle) = service_with_card();
        let far_future = card_epoch() + TimeDelta::days(365 * 100);

        let result = service
            .write_card(
                "ABCD65E8",
                &MifareKey::DEFAULT,
                sector(),
                CardRecord::new(UID),
                far_future,
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Codec(_))));
        assert_eq!(handle.write_count(), 0);
    }
}
