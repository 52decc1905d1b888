//! Mock serial connection.
//!
//! Records every call made through [`SerialConnection`] and lets the test
//! force `connect` failures.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::SerialConnection;
use crate::{HardwareError, PortSettings, Result};

/// A call observed by the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCall {
    Configure(PortSettings),
    Connect,
    Disconnect,
}

#[derive(Debug, Default)]
struct MockSerialState {
    settings: Option<PortSettings>,
    connected: bool,
    fail_connect: bool,
    calls: Vec<ConnectionCall>,
}

/// Mock serial connection for tests.
///
/// # Examples
///
/// ```
/// use parkcard_hardware::mock::MockSerialConnection;
/// use parkcard_hardware::traits::SerialConnection;
/// use parkcard_hardware::PortSettings;
///
/// #[tokio::main]
/// async fn main() -> parkcard_hardware::Result<()> {
///     let (mut conn, handle) = MockSerialConnection::new();
///
///     conn.configure(PortSettings::new("COM3", 9600))?;
///     conn.connect().await?;
///
///     assert!(handle.is_connected());
///     assert_eq!(handle.connect_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSerialConnection {
    state: Arc<Mutex<MockSerialState>>,
    settings: Option<PortSettings>,
}

impl MockSerialConnection {
    /// Create a closed, unconfigured mock and its control handle.
    pub fn new() -> (Self, MockSerialHandle) {
        let state = Arc::new(Mutex::new(MockSerialState::default()));
        let handle = MockSerialHandle {
            state: Arc::clone(&state),
        };
        (
            Self {
                state,
                settings: None,
            },
            handle,
        )
    }

    fn state(&self) -> MutexGuard<'_, MockSerialState> {
        lock(&self.state)
    }
}

impl Default for MockSerialConnection {
    fn default() -> Self {
        Self::new().0
    }
}

impl SerialConnection for MockSerialConnection {
    fn configure(&mut self, settings: PortSettings) -> Result<()> {
        let mut state = lock(&self.state);
        state.calls.push(ConnectionCall::Configure(settings.clone()));
        if state.settings.as_ref() != Some(&settings) {
            state.connected = false;
        }
        state.settings = Some(settings.clone());
        self.settings = Some(settings);
        Ok(())
    }

    async fn connect(&mut self) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ConnectionCall::Connect);

        let Some(settings) = state.settings.clone() else {
            return Err(HardwareError::configuration("serial port not configured"));
        };
        if state.fail_connect {
            state.connected = false;
            return Err(HardwareError::communication(format!(
                "mock open failure on {settings}"
            )));
        }
        state.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let mut state = self.state();
        state.calls.push(ConnectionCall::Disconnect);
        state.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state().connected
    }

    fn settings(&self) -> Option<&PortSettings> {
        self.settings.as_ref()
    }
}

/// Control and inspection handle for [`MockSerialConnection`].
#[derive(Debug, Clone)]
pub struct MockSerialHandle {
    state: Arc<Mutex<MockSerialState>>,
}

impl MockSerialHandle {
    /// Make subsequent `connect` calls fail (or succeed again).
    pub fn set_fail_connect(&self, fail: bool) {
        lock(&self.state).fail_connect = fail;
    }

    /// Whether the mock port is open.
    pub fn is_connected(&self) -> bool {
        lock(&self.state).connected
    }

    /// Settings from the last `configure`.
    pub fn settings(&self) -> Option<PortSettings> {
        lock(&self.state).settings.clone()
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<ConnectionCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of `connect` calls so far.
    pub fn connect_count(&self) -> usize {
        self.count(|c| matches!(c, ConnectionCall::Connect))
    }

    /// Number of `disconnect` calls so far.
    pub fn disconnect_count(&self) -> usize {
        self.count(|c| matches!(c, ConnectionCall::Disconnect))
    }

    /// Number of `configure` calls so far.
    pub fn configure_count(&self) -> usize {
        self.count(|c| matches!(c, ConnectionCall::Configure(_)))
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        lock(&self.state).calls.clear();
    }

    fn count(&self, pred: impl Fn(&ConnectionCall) -> bool) -> usize {
        lock(&self.state).calls.iter().filter(|c| pred(c)).count()
    }
}

fn lock(state: &Mutex<MockSerialState>) -> MutexGuard<'_, MockSerialState> {
    // A panicking test thread must not wedge the other side.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
