//! Error types for hardware operations.
//!
//! Covers the serial session (open/close/configuration) and the card-reader
//! transport (card presence, sector authentication, read/write).

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Device configuration error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// No card is present in the reader field.
    #[error("No card in reader field")]
    NoCard,

    /// Sector key rejected by the card.
    #[error("Authentication failed for sector {sector}")]
    AuthenticationFailed { sector: u8 },

    /// Card writing error.
    #[error("Card write error: {message}")]
    CardWriteError { message: String },

    /// Serial port error.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a new card write error.
    pub fn card_write(message: impl Into<String>) -> Self {
        Self::CardWriteError {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
