//! Error types for the service layer.

use parkcard_core::CardUid;
use parkcard_hardware::HardwareError;
use parkcard_storage::StorageError;

/// Result type alias for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the card service and the worker handle.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Reader or serial port failure.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Settings store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Sector decode or encode failure.
    #[error("Codec error: {0}")]
    Codec(#[from] parkcard_core::Error),

    /// The card in the field is not the one the caller asked to write.
    #[error("Card {actual} in reader does not match expected {expected}")]
    ForeignCard { expected: String, actual: CardUid },

    /// The reconnection worker is no longer running.
    #[error("Reconnection worker stopped")]
    WorkerStopped,

    /// The worker task panicked or was aborted.
    #[error("Reconnection worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),
}
