//! Serial connection backed by the `serialport` crate.
//!
//! Opening a port is a blocking system call, so it runs on Tokio's blocking
//! pool. Closing is just dropping the handle.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::traits::SerialConnection;
use crate::{HardwareError, PortInfo, PortSettings, Result};

/// Default read/write timeout applied to opened ports.
pub const DEFAULT_PORT_TIMEOUT: Duration = Duration::from_millis(500);

/// Card reader session over a system serial port.
///
/// # Examples
///
/// ```no_run
/// use parkcard_hardware::serial::SerialPortConnection;
/// use parkcard_hardware::traits::SerialConnection;
/// use parkcard_hardware::PortSettings;
///
/// # async fn example() -> parkcard_hardware::Result<()> {
/// let mut conn = SerialPortConnection::new();
/// conn.configure(PortSettings::new("/dev/ttyUSB0", 9600))?;
/// conn.connect().await?;
/// assert!(conn.is_connected());
/// conn.disconnect().await?;
/// # Ok(())
/// # }
/// ```
pub struct SerialPortConnection {
    settings: Option<PortSettings>,
    port: Option<Box<dyn serialport::SerialPort>>,
    timeout: Duration,
}

impl SerialPortConnection {
    /// Create an unconfigured, closed connection.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PORT_TIMEOUT)
    }

    /// Create a connection with a custom port I/O timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            settings: None,
            port: None,
            timeout,
        }
    }
}

impl Default for SerialPortConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SerialPortConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortConnection")
            .field("settings", &self.settings)
            .field("open", &self.port.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SerialConnection for SerialPortConnection {
    fn configure(&mut self, settings: PortSettings) -> Result<()> {
        if settings.name.is_empty() {
            return Err(HardwareError::configuration("port name is empty"));
        }
        if settings.baud_rate == 0 {
            return Err(HardwareError::configuration("baud rate must be positive"));
        }

        if self.settings.as_ref() == Some(&settings) {
            return Ok(());
        }

        if self.port.take().is_some() {
            info!("Closing {} to apply new settings {}", self.describe(), settings);
        }
        self.settings = Some(settings);
        Ok(())
    }

    async fn connect(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let settings = self
            .settings
            .clone()
            .ok_or_else(|| HardwareError::configuration("serial port not configured"))?;
        let timeout = self.timeout;

        debug!("Opening serial port {}", settings);
        let port = tokio::task::spawn_blocking(move || {
            serialport::new(settings.name.as_str(), settings.baud_rate)
                .timeout(timeout)
                .open()
        })
        .await
        .map_err(|e| HardwareError::other(format!("port open task failed: {e}")))??;

        self.port = Some(port);
        info!("Serial port {} opened", self.describe());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            info!("Serial port {} closed", self.describe());
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn settings(&self) -> Option<&PortSettings> {
        self.settings.as_ref()
    }
}

impl SerialPortConnection {
    fn describe(&self) -> String {
        self.settings
            .as_ref()
            .map_or_else(|| "<unconfigured>".to_string(), ToString::to_string)
    }
}

/// Enumerate system serial ports and check whether each can be opened.
///
/// # Errors
///
/// Returns the enumeration error from the OS.
pub fn available_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|p| {
            let available = port_exists(&p.port_name);
            PortInfo {
                name: p.port_name,
                available,
            }
        })
        .collect())
}

/// Whether `name` can be opened right now.
pub fn port_exists(name: &str) -> bool {
    match serialport::new(name, 9600).timeout(Duration::from_millis(50)).open() {
        Ok(_) => true,
        Err(e) => {
            warn!("Port {} not available: {}", name, e);
            false
        }
    }
}
