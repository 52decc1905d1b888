//! Mock card reader transport.
//!
//! Simulates a single Mifare Classic card that can be placed in or removed
//! from the reader field. Each card carries one sector key; reads and writes
//! with any other key fail authentication.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use parkcard_core::constants::SECTOR_SIZE;
use parkcard_core::{CardUid, MifareKey, SectorNumber};

use crate::traits::CardReaderTransport;
use crate::{HardwareError, RawSector, Result};

#[derive(Debug, Clone)]
struct MockCard {
    uid: CardUid,
    key: MifareKey,
    sectors: HashMap<SectorNumber, Vec<u8>>,
}

#[derive(Debug, Default)]
struct ReaderState {
    card: Option<MockCard>,
    reads: usize,
    writes: usize,
}

/// Mock card reader for tests.
///
/// # Examples
///
/// ```
/// use parkcard_core::{CardUid, MifareKey, SectorNumber};
/// use parkcard_hardware::mock::MockCardReader;
/// use parkcard_hardware::traits::CardReaderTransport;
///
/// #[tokio::main]
/// async fn main() -> parkcard_hardware::Result<()> {
///     let (mut reader, handle) = MockCardReader::new();
///     let uid = CardUid::new([0xAB, 0xCD, 0x65, 0xE8]);
///     handle.present_card(uid, MifareKey::DEFAULT);
///
///     let sector = SectorNumber::new(2).unwrap();
///     let raw = reader.read_sector(&MifareKey::DEFAULT, sector).await?;
///     assert_eq!(raw.uid, uid);
///     assert_eq!(raw.data.len(), 48);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCardReader {
    state: Arc<Mutex<ReaderState>>,
}

impl MockCardReader {
    /// Create an empty reader and its control handle.
    pub fn new() -> (Self, MockCardReaderHandle) {
        let state = Arc::new(Mutex::new(ReaderState::default()));
        let handle = MockCardReaderHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl Default for MockCardReader {
    fn default() -> Self {
        Self::new().0
    }
}

impl CardReaderTransport for MockCardReader {
    async fn card_uid(&mut self) -> Result<CardUid> {
        let state = lock(&self.state);
        state
            .card
            .as_ref()
            .map(|card| card.uid)
            .ok_or(HardwareError::NoCard)
    }

    async fn read_sector(&mut self, key: &MifareKey, sector: SectorNumber) -> Result<RawSector> {
        let mut state = lock(&self.state);
        state.reads += 1;

        let card = authenticate(state.card.as_ref(), key, sector)?;
        let data = card
            .sectors
            .get(&sector)
            .cloned()
            .unwrap_or_else(|| vec![0; SECTOR_SIZE]);

        Ok(RawSector {
            uid: card.uid,
            data,
        })
    }

    async fn write_sector(
        &mut self,
        key: &MifareKey,
        sector: SectorNumber,
        data: &[u8],
    ) -> Result<()> {
        let mut state = lock(&self.state);
        state.writes += 1;

        authenticate(state.card.as_ref(), key, sector)?;
        if data.len() != SECTOR_SIZE {
            return Err(HardwareError::card_write(format!(
                "sector image must be {SECTOR_SIZE} bytes, got {}",
                data.len()
            )));
        }

        if let Some(card) = state.card.as_mut() {
            card.sectors.insert(sector, data.to_vec());
        }
        Ok(())
    }
}

fn authenticate<'a>(
    card: Option<&'a MockCard>,
    key: &MifareKey,
    sector: SectorNumber,
) -> Result<&'a MockCard> {
    let card = card.ok_or(HardwareError::NoCard)?;
    if card.key != *key {
        return Err(HardwareError::AuthenticationFailed {
            sector: sector.as_u8(),
        });
    }
    Ok(card)
}

/// Control handle for [`MockCardReader`].
#[derive(Debug, Clone)]
pub struct MockCardReaderHandle {
    state: Arc<Mutex<ReaderState>>,
}

impl MockCardReaderHandle {
    /// Place a blank card in the field, replacing any previous one.
    pub fn present_card(&self, uid: CardUid, key: MifareKey) {
        lock(&self.state).card = Some(MockCard {
            uid,
            key,
            sectors: HashMap::new(),
        });
    }

    /// Take the card out of the field.
    pub fn remove_card(&self) {
        lock(&self.state).card = None;
    }

    /// Whether a card is in the field.
    pub fn has_card(&self) -> bool {
        lock(&self.state).card.is_some()
    }

    /// Overwrite a sector of the card in the field.
    ///
    /// # Errors
    ///
    /// Returns `NoCard` if the field is empty.
    pub fn set_sector(&self, sector: SectorNumber, data: Vec<u8>) -> Result<()> {
        let mut state = lock(&self.state);
        let card = state.card.as_mut().ok_or(HardwareError::NoCard)?;
        card.sectors.insert(sector, data);
        Ok(())
    }

    /// Current contents of a sector, if it was ever written.
    pub fn sector(&self, sector: SectorNumber) -> Option<Vec<u8>> {
        lock(&self.state)
            .card
            .as_ref()
            .and_then(|card| card.sectors.get(&sector).cloned())
    }

    /// Number of `read_sector` calls so far.
    pub fn read_count(&self) -> usize {
        lock(&self.state).reads
    }

    /// Number of `write_sector` calls so far.
    pub fn write_count(&self) -> usize {
        lock(&self.state).writes
    }
}

fn lock(state: &Mutex<ReaderState>) -> MutexGuard<'_, ReaderState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
