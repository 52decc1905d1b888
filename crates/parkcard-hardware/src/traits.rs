//! Hardware device traits.
//!
//! Two seams separate the application from the physical reader:
//!
//! - [`SerialConnection`] is the session handle: port parameters plus
//!   open/close. Exactly one owner (the reconnection worker) drives it.
//! - [`CardReaderTransport`] moves raw sector bytes to and from the card in
//!   the field. Its wire protocol and key handling belong to the
//!   implementation.
//!
//! Methods return `impl Future + Send` rather than using bare `async fn` so
//! generic owners can be moved onto Tokio worker threads. Implementations
//! may still be written with `async fn`.
//!
//! # Examples
//!
//! ```no_run
//! use parkcard_hardware::traits::SerialConnection;
//! use parkcard_hardware::{PortSettings, Result};
//!
//! async fn reopen<C: SerialConnection>(conn: &mut C) -> Result<()> {
//!     conn.configure(PortSettings::new("/dev/ttyUSB0", 9600))?;
//!     conn.connect().await
//! }
//! ```

use std::future::Future;

use parkcard_core::{CardUid, MifareKey, SectorNumber};

use crate::{PortSettings, RawSector, Result};

/// Owned handle to the serial session with the card reader.
///
/// # Idempotence
///
/// - `connect` on an open port with unchanged settings is a no-op.
/// - `disconnect` on a closed port is a no-op.
/// - `configure` with settings different from the open port's closes it;
///   the next `connect` opens with the new parameters.
pub trait SerialConnection: Send {
    /// Set port name and speed for the next `connect`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for parameters the backend cannot use.
    fn configure(&mut self, settings: PortSettings) -> Result<()>;

    /// Open the port with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if `configure` was never called, or the
    /// backend's open error.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the port.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the port is currently open.
    fn is_connected(&self) -> bool;

    /// Settings applied by the last `configure`.
    fn settings(&self) -> Option<&PortSettings>;
}

/// Sector-level access to the card in the reader field.
pub trait CardReaderTransport: Send {
    /// UID of the card currently in the field.
    ///
    /// # Errors
    ///
    /// Returns `NoCard` if the field is empty.
    fn card_uid(&mut self) -> impl Future<Output = Result<CardUid>> + Send;

    /// Authenticate with `key` and read the data blocks of `sector`.
    ///
    /// # Errors
    ///
    /// Returns `NoCard`, `AuthenticationFailed`, or a read error.
    fn read_sector(
        &mut self,
        key: &MifareKey,
        sector: SectorNumber,
    ) -> impl Future<Output = Result<RawSector>> + Send;

    /// Authenticate with `key` and write `data` to the data blocks of `sector`.
    ///
    /// # Errors
    ///
    /// Returns `NoCard`, `AuthenticationFailed`, or a write error.
    fn write_sector(
        &mut self,
        key: &MifareKey,
        sector: SectorNumber,
        data: &[u8],
    ) -> impl Future<Output = Result<()>> + Send;
}
