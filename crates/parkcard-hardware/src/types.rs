//! Common types shared across hardware device implementations.

use parkcard_core::CardUid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serial port parameters for the card reader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortSettings {
    /// OS port name (e.g., "COM3", "/dev/ttyUSB0").
    pub name: String,

    /// Baud rate in bits per second.
    pub baud_rate: u32,
}

impl PortSettings {
    /// Create new port settings.
    pub fn new(name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            name: name.into(),
            baud_rate,
        }
    }
}

impl fmt::Display for PortSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.baud_rate)
    }
}

/// State of the shared reader connection as seen by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No settings have been applied yet.
    Idle,

    /// Port is open with the current settings.
    Connected,

    /// Port is closed (invalid settings, failed open, or shutdown).
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// A serial port known to the operating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    /// OS port name.
    pub name: String,

    /// Whether the port could be opened at enumeration time.
    pub available: bool,
}

/// Raw sector image as delivered by the reader transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSector {
    /// UID of the card in the field.
    pub uid: CardUid,

    /// Sector data bytes (48 for a Classic data sector).
    pub data: Vec<u8>,
}
