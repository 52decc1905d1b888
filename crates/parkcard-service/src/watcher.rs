//! Settings change detection for the serving process.
//!
//! `parkcard settings set` writes the settings table from another process,
//! so nothing in the serving process knows the row changed. The watcher
//! re-resolves the settings on an interval and sends one
//! [`UpdateConfig`](crate::WorkerMessage::UpdateConfig) for each change it
//! observes. Several saves between two checks collapse into one message,
//! which applies the latest row.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use parkcard_hardware::mock::MockSerialConnection;
//! use parkcard_service::{ReconnectionWorker, SettingsWatcher, WorkerConfig};
//! use parkcard_storage::{Database, ReaderSettingsResolver, SqliteSettingsRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::in_memory().await?;
//! let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));
//! let (conn, _mock) = MockSerialConnection::new();
//!
//! let watcher = SettingsWatcher::new(resolver.clone(), Duration::from_secs(1)).await;
//! let worker = ReconnectionWorker::spawn(conn, resolver, WorkerConfig::default());
//! let watching = watcher.spawn(worker.notifier());
//!
//! watching.shutdown().await?;
//! worker.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use parkcard_storage::{ReaderSettings, ReaderSettingsSource};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::worker::ConfigNotifier;

/// Default delay between settings checks.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Polls a settings source and notifies the worker when the value changes.
#[derive(Debug)]
pub struct SettingsWatcher<S> {
    settings: S,
    interval: Duration,
    last: Option<ReaderSettings>,
}

impl<S> SettingsWatcher<S>
where
    S: ReaderSettingsSource + 'static,
{
    /// Snapshot the current settings as the baseline.
    ///
    /// Take the snapshot before spawning the worker: a save that lands in
    /// between is then reported once more instead of being missed.
    pub async fn new(settings: S, interval: Duration) -> Self {
        let last = match settings.resolve().await {
            Ok(current) => Some(current),
            Err(e) => {
                warn!("Failed to read baseline reader settings: {}", e);
                None
            }
        };
        Self {
            settings,
            interval,
            last,
        }
    }

    /// Resolve once and notify if the value differs from the last one seen.
    ///
    /// Returns whether a message was sent.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the settings cannot be read and `WorkerStopped`
    /// if the worker has exited.
    pub async fn check(&mut self, notifier: &ConfigNotifier) -> ServiceResult<bool> {
        let current = self.settings.resolve().await?;
        if self.last.as_ref() == Some(&current) {
            return Ok(false);
        }

        info!("Reader settings changed to {}", current);
        notifier.notify()?;
        self.last = Some(current);
        Ok(true)
    }

    /// Run [`check`](Self::check) on the interval until shut down or the
    /// worker exits.
    pub fn spawn(self, notifier: ConfigNotifier) -> WatcherHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(notifier, cancel.clone()));
        WatcherHandle { cancel, task }
    }

    async fn run(mut self, notifier: ConfigNotifier, cancel: CancellationToken) {
        debug!("Settings watcher started (interval {:?})", self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            match self.check(&notifier).await {
                Ok(_) => {}
                Err(ServiceError::WorkerStopped) => {
                    debug!("Worker gone, settings watcher stopping");
                    break;
                }
                Err(e) => warn!("Settings check failed: {}", e),
            }
        }
    }
}

/// Control handle for a spawned [`SettingsWatcher`].
#[derive(Debug)]
pub struct WatcherHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Whether the watcher task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop watching.
    ///
    /// # Errors
    ///
    /// Returns `WorkerFailed` if the task panicked.
    pub async fn shutdown(self) -> ServiceResult<()> {
        self.cancel.cancel();
        Ok(self.task.await?)
    }
}
