//! Persistence for the parking card reader settings.
//!
//! Two single-row tables back the application:
//!
//! - `settings` holds the serial port name and speed of the reader.
//! - `mifare_settings` holds the sector key and data sector number used to
//!   read and write cards.
//!
//! Both are reached through repository traits with SQLite implementations.
//! [`ReaderSettingsResolver`] sits on top of the serial settings and turns a
//! possibly missing row into port parameters plus a validity flag, which is
//! all the reconnection worker needs.
//!
//! # Example
//!
//! ```no_run
//! use parkcard_storage::{Database, DatabaseConfig, ReaderSettingsResolver};
//! use parkcard_storage::repositories::SqliteSettingsRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("parkcard.db")).await?;
//! let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));
//!
//! resolver.save("COM3", 9600).await?;
//! let settings = resolver.resolve().await?;
//! assert!(settings.is_valid());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod resolver;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::{MifareSettings, SerialSettings};
pub use repositories::{
    MifareSettingsRepository, SettingsRepository, SqliteMifareSettingsRepository,
    SqliteSettingsRepository,
};
pub use resolver::{ReaderSettings, ReaderSettingsResolver, ReaderSettingsSource};
