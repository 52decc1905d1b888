//! Mock device implementations for testing and development.
//!
//! Each mock is created together with a handle that shares its state, so a
//! test can hand the device to its owner and still steer or inspect it.

pub mod reader;
pub mod serial;

pub use reader::{MockCardReader, MockCardReaderHandle};
pub use serial::{ConnectionCall, MockSerialConnection, MockSerialHandle};
