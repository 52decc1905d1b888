use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Sector image errors
    #[error("Sector too short: expected at least {expected} bytes, got {actual}")]
    SectorLength { expected: usize, actual: usize },

    #[error("Time out of range for field {field}: {seconds}s from card epoch does not fit 32 bits")]
    TimeOutOfRange { field: &'static str, seconds: i64 },

    // Identifier errors
    #[error("Invalid card UID: {0}")]
    InvalidUid(String),

    // Mifare access errors
    #[error("Invalid Mifare key: {0}")]
    InvalidMifareKey(String),

    #[error("Invalid sector number: {0}")]
    InvalidSector(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
