//! Amplifier Link Error Types

use thiserror::Error;

/// Errors that can occur while talking to the amplifier
#[derive(Debug, Error)]
pub enum AmpError {
    /// Serial port open/read/write failure
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// No port has been opened
    #[error("Serial port not connected")]
    NotConnected,

    /// Telemetry frame checksum mismatch
    #[error("Checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumError { expected: u8, actual: u8 },

    /// No telemetry within the watchdog period
    #[error("No telemetry for {0}ms")]
    LinkTimeout(u64),
}

impl AmpError {
    /// Whether the decoding pipeline recovers on its own
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AmpError::ChecksumError { .. } | AmpError::LinkTimeout(_))
    }
}

impl From<std::io::Error> for AmpError {
    fn from(err: std::io::Error) -> Self {
        AmpError::SerialError(err.to_string())
    }
}

impl From<tokio_serial::Error> for AmpError {
    fn from(err: tokio_serial::Error) -> Self {
        AmpError::SerialError(err.to_string())
    }
}
