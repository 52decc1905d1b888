//! Row types for the settings tables.

mod mifare;
mod settings;

pub use mifare::MifareSettings;
pub use settings::SerialSettings;
