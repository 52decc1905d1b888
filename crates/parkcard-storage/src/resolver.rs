//! Reader settings resolution.
//!
//! Turns whatever is (or is not) in the settings table into port parameters
//! plus a validity flag. A missing row resolves to a sentinel that is always
//! invalid, so the reader is never opened on a guessed port.

use std::fmt;
use std::future::Future;

use parkcard_core::constants::{DEFAULT_PORT_SPEED, INVALID_PORT_NAME};
use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::models::SerialSettings;
use crate::repositories::{SettingsRepository, SqliteSettingsRepository};

/// Resolved reader port parameters.
///
/// Validity is fixed at construction: [`new`](Self::new) applies the
/// name/speed rule, [`sentinel`](Self::sentinel) is always invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderSettings {
    pub port_name: String,
    pub port_speed: i32,
    valid: bool,
}

impl ReaderSettings {
    pub fn new(port_name: impl Into<String>, port_speed: i32) -> Self {
        let port_name = port_name.into();
        let valid = !port_name.is_empty() && port_speed > 0;
        Self {
            port_name,
            port_speed,
            valid,
        }
    }

    /// Placeholder returned when nothing is stored.
    pub fn sentinel() -> Self {
        Self {
            port_name: INVALID_PORT_NAME.to_string(),
            port_speed: DEFAULT_PORT_SPEED,
            valid: false,
        }
    }

    /// Whether the reader may be opened with these parameters.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl From<SerialSettings> for ReaderSettings {
    fn from(row: SerialSettings) -> Self {
        let port_speed = i32::try_from(row.serial_port_speed).unwrap_or_else(|_| {
            warn!(
                "Stored serial speed {} out of range, treating as 0",
                row.serial_port_speed
            );
            0
        });
        Self::new(row.serial_port_name.unwrap_or_default(), port_speed)
    }
}

impl fmt::Display for ReaderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.port_name, self.port_speed)
    }
}

/// Anything the reconnection worker can ask for the current settings.
pub trait ReaderSettingsSource: Send + Sync {
    fn resolve(&self) -> impl Future<Output = StorageResult<ReaderSettings>> + Send;
}

/// Resolves and saves reader settings through a [`SettingsRepository`].
#[derive(Debug, Clone)]
pub struct ReaderSettingsResolver<R> {
    repository: R,
}

impl<R: SettingsRepository> ReaderSettingsResolver<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Current settings, or the invalid sentinel when none are stored.
    pub async fn resolve(&self) -> StorageResult<ReaderSettings> {
        let settings = match self.repository.find_current().await? {
            Some(row) => ReaderSettings::from(row),
            None => {
                debug!("No serial settings stored, using sentinel");
                ReaderSettings::sentinel()
            }
        };
        Ok(settings)
    }

    /// Upsert the single settings row.
    ///
    /// The caller is responsible for notifying the reconnection worker.
    pub async fn save(&self, port_name: &str, port_speed: i32) -> StorageResult<ReaderSettings> {
        let row = self.repository.upsert(port_name, i64::from(port_speed)).await?;
        Ok(ReaderSettings::from(row))
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

impl ReaderSettingsSource for ReaderSettingsResolver<SqliteSettingsRepository> {
    async fn resolve(&self) -> StorageResult<ReaderSettings> {
        ReaderSettingsResolver::resolve(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::error::StorageError;
    use rstest::rstest;

    #[rstest]
    #[case("COM3", 9600, true)]
    #[case("COM3", 1, true)]
    #[case("COM3", 0, false)]
    #[case("COM3", -9600, false)]
    #[case("", 9600, false)]
    #[case("", 0, false)]
    fn test_is_valid(#[case] name: &str, #[case] speed: i32, #[case] expected: bool) {
        assert_eq!(ReaderSettings::new(name, speed).is_valid(), expected);
    }

    #[test]
    fn test_sentinel_is_invalid() {
        let sentinel = ReaderSettings::sentinel();
        assert_eq!(sentinel.port_name, "invalid");
        assert_eq!(sentinel.port_speed, 9600);
        assert!(!sentinel.is_valid());
    }

    #[test]
    fn test_from_row_with_null_name() {
        let row = SerialSettings {
            id: 1,
            serial_port_name: None,
            serial_port_speed: 9600,
        };
        let settings = ReaderSettings::from(row);
        assert_eq!(settings.port_name, "");
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_from_row_with_overflowing_speed() {
        let row = SerialSettings {
            id: 1,
            serial_port_name: Some("COM3".to_string()),
            serial_port_speed: i64::from(i32::MAX) + 1,
        };
        let settings = ReaderSettings::from(row);
        assert_eq!(settings.port_speed, 0);
        assert!(!settings.is_valid());
    }

    #[tokio::test]
    async fn test_resolve_empty_store_returns_sentinel() {
        let db = Database::in_memory().await.unwrap();
        let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));

        let settings = resolver.resolve().await.unwrap();
        assert_eq!(settings, ReaderSettings::sentinel());
        assert!(!settings.is_valid());
    }

    #[tokio::test]
    async fn test_save_then_resolve() {
        let db = Database::in_memory().await.unwrap();
        let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));

        resolver.save("COM7", 115_200).await.unwrap();
        let settings = resolver.resolve().await.unwrap();
        assert_eq!(settings, ReaderSettings::new("COM7", 115_200));
        assert!(settings.is_valid());
    }

    #[tokio::test]
    async fn test_save_rejects_empty_name() {
        let db = Database::in_memory().await.unwrap();
        let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));

        let result = resolver.save("", 9600).await;
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }

    #[tokio::test]
    async fn test_resolve_through_source_trait() {
        async fn via_source<S: ReaderSettingsSource>(source: &S) -> ReaderSettings {
            source.resolve().await.unwrap()
        }

        let db = Database::in_memory().await.unwrap();
        let resolver = ReaderSettingsResolver::new(SqliteSettingsRepository::new(db.pool().clone()));
        resolver.save("/dev/ttyS0", 9600).await.unwrap();

        assert_eq!(via_source(&resolver).await.port_name, "/dev/ttyS0");
    }
}
