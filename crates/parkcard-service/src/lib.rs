//! Application services for the parking card reader.
//!
//! - [`worker`] keeps the serial reader connection in line with the stored
//!   settings. It is the only owner of the connection.
//! - [`watcher`] notices settings saved by another process and tells the
//!   worker.
//! - [`cards`] reads and writes card records through a reader transport.

pub mod cards;
pub mod error;
pub mod watcher;
pub mod worker;

pub use cards::CardService;
pub use error::{ServiceError, ServiceResult};
pub use watcher::{SettingsWatcher, WatcherHandle};
pub use worker::{
    ConfigNotifier, ReconnectionWorker, WorkerConfig, WorkerHandle, WorkerMessage,
};
