//! Enum wrapper for serial backend dispatch.
//!
//! Traits with `impl Future` returns are not object-safe, so owners that
//! pick a backend at runtime hold this enum instead of a
//! `Box<dyn ...>`.
//!
//! # Examples
//!
//! ```
//! use parkcard_hardware::devices::AnySerialConnection;
//! use parkcard_hardware::mock::MockSerialConnection;
//!
//! let (conn, _handle) = MockSerialConnection::new();
//! let any_conn = AnySerialConnection::Mock(conn);
//! ```

use crate::mock::MockSerialConnection;
use crate::serial::SerialPortConnection;
use crate::traits::SerialConnection;
use crate::{PortSettings, Result};

/// Serial connection backend chosen at startup.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySerialConnection {
    /// System serial port.
    Serial(SerialPortConnection),

    /// Mock port for development and testing.
    Mock(MockSerialConnection),
}

impl SerialConnection for AnySerialConnection {
    fn configure(&mut self, settings: PortSettings) -> Result<()> {
        match self {
            Self::Serial(conn) => conn.configure(settings),
            Self::Mock(conn) => conn.configure(settings),
        }
    }

    async fn connect(&mut self) -> Result<()> {
        match self {
            Self::Serial(conn) => conn.connect().await,
            Self::Mock(conn) => conn.connect().await,
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        match self {
            Self::Serial(conn) => conn.disconnect().await,
            Self::Mock(conn) => conn.disconnect().await,
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            Self::Serial(conn) => conn.is_connected(),
            Self::Mock(conn) => conn.is_connected(),
        }
    }

    fn settings(&self) -> Option<&PortSettings> {
        match self {
            Self::Serial(conn) => conn.settings(),
            Self::Mock(conn) => conn.settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ConnectionCall;

    #[tokio::test]
    async fn test_any_serial_connection_dispatches_to_mock() {
        let (conn, handle) = MockSerialConnection::new();
        let mut any_conn = AnySerialConnection::Mock(conn);

        any_conn.configure(PortSettings::new("COM5", 9600)).unwrap();
        any_conn.connect().await.unwrap();
        assert!(any_conn.is_connected());
        assert_eq!(any_conn.settings(), Some(&PortSettings::new("COM5", 9600)));

        any_conn.disconnect().await.unwrap();
        assert!(!any_conn.is_connected());
        assert_eq!(handle.calls().last(), Some(&ConnectionCall::Disconnect));
    }

    #[tokio::test]
    async fn test_any_serial_connection_system_port_starts_closed() {
        let any_conn = AnySerialConnection::Serial(SerialPortConnection::new());
        assert!(!any_conn.is_connected());
        assert!(any_conn.settings().is_none());
    }
}
