pub mod mifare;
pub mod settings;

pub use mifare::{MifareSettingsRepository, SqliteMifareSettingsRepository};
pub use settings::{SettingsRepository, SqliteSettingsRepository};
