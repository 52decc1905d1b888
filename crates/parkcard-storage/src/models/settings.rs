use serde::{Deserialize, Serialize};

/// Serial port settings row.
///
/// The table holds at most one logical row. `serial_port_name` is nullable
/// so a row created before the operator picked a port is still readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SerialSettings {
    /// Auto-increment primary key
    pub id: i64,

    /// OS port name, e.g. "COM3"
    pub serial_port_name: Option<String>,

    /// Baud rate
    pub serial_port_speed: i64,
}

impl SerialSettings {
    /// Port name, or the empty string when unset.
    pub fn port_name(&self) -> &str {
        self.serial_port_name.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_name_defaults_to_empty() {
        let settings = SerialSettings {
            id: 1,
            serial_port_name: None,
            serial_port_speed: 9600,
        };
        assert_eq!(settings.port_name(), "");
    }

    #[test]
    fn test_serialization() {
        let settings = SerialSettings {
            id: 1,
            serial_port_name: Some("COM3".to_string()),
            serial_port_speed: 19200,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"serial_port_name":"COM3","serial_port_speed":19200}"#
        );
    }
}
