//! Reader reconnection worker.
//!
//! A single task owns the serial connection. Request handlers never touch
//! it; after saving new reader settings they push one
//! [`WorkerMessage::UpdateConfig`] through a [`ConfigNotifier`], and the
//! worker re-reads the settings and reconfigures the port.
//!
//! ```text
//! ┌────────────────┐ UpdateConfig ┌────────────────────┐ configure/connect
//! │ ConfigNotifier ├─────────────►│ ReconnectionWorker ├──────────────────► SerialConnection
//! │    (clones)    │    (mpsc)    │  resolve settings  │
//! └────────────────┘              └─────────┬──────────┘
//!                                           │ watch
//!                                           ▼
//!                                    ConnectionState
//! ```
//!
//! The queue is polled: a pending message is handled at once, otherwise the
//! worker sleeps for the poll interval. Cancellation is checked on every
//! iteration and also interrupts the sleep. Failed connects are not retried
//! until the next `UpdateConfig`. The worker runs until cancelled, even after
//! every notifier has been dropped.
//!
//! # Examples
//!
//! ```no_run
//! use parkcard_hardware::mock::MockSerialConnection;
//! use parkcard_service::worker::{ReconnectionWorker, WorkerConfig};
//! use parkcard_storage::{Database, ReaderSettingsResolver, SqliteSettingsRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory().await?;
//! let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));
//! let (conn, _mock) = MockSerialConnection::new();
//!
//! let handle = ReconnectionWorker::spawn(conn, resolver.clone(), WorkerConfig::default());
//!
//! resolver.save("COM3", 9600).await?;
//! handle.notifier().notify()?;
//!
//! let _conn = handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use parkcard_hardware::traits::SerialConnection;
use parkcard_hardware::{ConnectionState, PortSettings};
use parkcard_storage::{ReaderSettings, ReaderSettingsSource};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Default delay between queue polls when no message is pending.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Messages understood by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Persisted reader settings changed.
    UpdateConfig,
}

/// Producer side of the worker queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ConfigNotifier {
    tx: mpsc::UnboundedSender<WorkerMessage>,
}

impl ConfigNotifier {
    /// Enqueue one `UpdateConfig`.
    ///
    /// # Errors
    ///
    /// Returns `WorkerStopped` if the worker has exited.
    pub fn notify(&self) -> ServiceResult<()> {
        self.tx
            .send(WorkerMessage::UpdateConfig)
            .map_err(|_| ServiceError::WorkerStopped)
    }
}

/// Worker tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Sleep between queue polls when idle.
    pub poll_interval: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WorkerConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Background task that keeps the reader connection in line with the
/// stored settings.
pub struct ReconnectionWorker<C, S> {
    connection: C,
    settings: S,
    rx: mpsc::UnboundedReceiver<WorkerMessage>,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    config: WorkerConfig,
}

impl<C, S> ReconnectionWorker<C, S>
where
    C: SerialConnection + 'static,
    S: ReaderSettingsSource + 'static,
{
    /// Start the worker on the current Tokio runtime.
    ///
    /// The first resolve-and-apply cycle runs immediately, without waiting
    /// for a message.
    pub fn spawn(connection: C, settings: S, config: WorkerConfig) -> WorkerHandle<C> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let cancel = CancellationToken::new();

        let worker = Self {
            connection,
            settings,
            rx,
            state_tx,
            cancel: cancel.clone(),
            config,
        };
        let task = tokio::spawn(worker.run());

        WorkerHandle {
            notifier: ConfigNotifier { tx },
            state_rx,
            cancel,
            task,
        }
    }

    async fn run(mut self) -> C {
        info!(
            "Reconnection worker started (poll interval {:?})",
            self.config.poll_interval
        );

        self.apply_settings().await;

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            match self.rx.try_recv() {
                Ok(WorkerMessage::UpdateConfig) => {
                    debug!("UpdateConfig received");
                    self.apply_settings().await;
                }
                Err(TryRecvError::Empty) => {
                    tokio::select! {
                        _ = self.cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Err(TryRecvError::Disconnected) => {
                    // No producer left; hold the connection until cancelled.
                    debug!("All notifiers dropped, waiting for shutdown");
                    self.cancel.cancelled().await;
                    break;
                }
            }
        }

        if let Err(e) = self.connection.disconnect().await {
            warn!("Disconnect on shutdown failed: {}", e);
        }
        self.state_tx.send_replace(ConnectionState::Disconnected);
        info!("Reconnection worker stopped");

        self.connection
    }

    /// Resolve settings and bring the connection in line with them.
    /// Failures are logged and leave the connection closed.
    async fn apply_settings(&mut self) {
        let settings = match self.settings.resolve().await {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to resolve reader settings: {}", e);
                self.close().await;
                return;
            }
        };

        let Some(port) = port_settings(&settings) else {
            warn!("Reader settings {} are not valid, staying disconnected", settings);
            self.close().await;
            return;
        };

        if let Err(e) = self.connection.configure(port.clone()) {
            warn!("Failed to configure reader port {}: {}", port, e);
            self.close().await;
            return;
        }

        match self.connection.connect().await {
            Ok(()) => {
                info!("Reader connected on {}", port);
                self.state_tx.send_replace(ConnectionState::Connected);
            }
            Err(e) => {
                warn!("Failed to connect reader on {}: {}", port, e);
                self.state_tx.send_replace(ConnectionState::Disconnected);
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.connection.disconnect().await {
            warn!("Failed to disconnect reader: {}", e);
        }
        self.state_tx.send_replace(ConnectionState::Disconnected);
    }
}

fn port_settings(settings: &ReaderSettings) -> Option<PortSettings> {
    if !settings.is_valid() {
        return None;
    }
    let baud_rate = u32::try_from(settings.port_speed).ok()?;
    Some(PortSettings::new(settings.port_name.clone(), baud_rate))
}

/// Control handle for a running [`ReconnectionWorker`].
#[derive(Debug)]
pub struct WorkerHandle<C> {
    notifier: ConfigNotifier,
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    task: JoinHandle<C>,
}

impl<C> WorkerHandle<C> {
    /// A producer for `UpdateConfig` messages.
    pub fn notifier(&self) -> ConfigNotifier {
        self.notifier.clone()
    }

    /// Latest published connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Wait until the worker publishes `target`.
    ///
    /// # Errors
    ///
    /// Returns `WorkerStopped` if the worker exits first.
    pub async fn wait_for_state(&self, target: ConnectionState) -> ServiceResult<()> {
        let mut rx = self.state_rx.clone();
        rx.wait_for(|state| *state == target)
            .await
            .map(|_| ())
            .map_err(|_| ServiceError::WorkerStopped)
    }

    /// Whether the worker task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the worker, close the connection and hand it back.
    ///
    /// # Errors
    ///
    /// Returns `WorkerFailed` if the task panicked.
    pub async fn shutdown(self) -> ServiceResult<C> {
        self.cancel.cancel();
        Ok(self.task.await?)
    }
}
