//! Hardware abstraction for the parking card reader.
//!
//! The reader hangs off a serial port. This crate owns two seams:
//!
//! - [`SerialConnection`] opens and closes that port with a given name and
//!   speed. The reconnection worker in `parkcard-service` is its only owner.
//! - [`CardReaderTransport`] moves raw 48-byte sector images between the
//!   application and the card in the field.
//!
//! The serial side has a system backend and a mock, wrapped for runtime
//! selection in [`devices`]. The reader side has a mock. [`available_ports`] lists the serial ports the OS knows about.
//!
//! # Example
//!
//! ```no_run
//! use parkcard_hardware::traits::SerialConnection;
//! use parkcard_hardware::{PortSettings, Result, SerialPortConnection};
//!
//! async fn open() -> Result<SerialPortConnection> {
//!     let mut conn = SerialPortConnection::new();
//!     conn.configure(PortSettings::new("/dev/ttyUSB0", 9600))?;
//!     conn.connect().await?;
//!     Ok(conn)
//! }
//! ```
//!
//! [`SerialConnection`]: traits::SerialConnection
//! [`CardReaderTransport`]: traits::CardReaderTransport

pub mod devices;
pub mod error;
pub mod mock;
pub mod serial;
pub mod traits;
pub mod types;

pub use devices::AnySerialConnection;
pub use error::{HardwareError, Result};
pub use serial::{SerialPortConnection, available_ports, port_exists};
pub use traits::{CardReaderTransport, SerialConnection};
pub use types::{ConnectionState, PortInfo, PortSettings, RawSector};
