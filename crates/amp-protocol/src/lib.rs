//! ACOM Amplifier Protocol Implementation
//!
//! This crate speaks the binary RS232 protocol of the ACOM 600S/700S/1000S/1200S
//! solid state amplifiers: fixed command frames sent to the amplifier and the
//! 72-byte telemetry frame it streams back.

mod cat;
mod checksum;
mod command;
mod decoder;
mod error;
mod fault;
mod mock;
mod model;
mod status;
mod telemetry;
mod transport;

pub use cat::{CatBaud, CatConfig, CatMode, CatPort};
pub use checksum::{checksum, complement, is_valid};
pub use command::{Command, OutgoingCommand};
pub use decoder::{DecoderStats, FrameDecoder};
pub use error::AmpError;
pub use fault::{classify, DeviceFault, Severity};
pub use mock::{FrameBuilder, MockTransport};
pub use model::AmpModel;
pub use status::AmpStatus;
pub use telemetry::{band_name, TelemetrySnapshot, BAND_NAMES};
pub use transport::{SerialTransport, Transport, DEFAULT_BAUD_RATE};

/// Telemetry frame layout (byte offsets, 0-indexed)
pub mod layout {
    /// Total telemetry frame length in bytes
    pub const FRAME_LEN: usize = 72;
    /// First synchronization marker byte
    pub const MARKER_0: u8 = 0x55;
    /// Second synchronization marker byte
    pub const MARKER_1: u8 = 0x2F;
    /// Status code lives in the high nibble
    pub const STATUS: usize = 3;
    /// Temperature in Kelvin, little-endian u16
    pub const TEMPERATURE: usize = 16;
    /// Drive power, little-endian u16 (0.1 W units)
    pub const DRIVE_POWER: usize = 20;
    /// Forward (PA) power, little-endian u16
    pub const FORWARD_POWER: usize = 22;
    /// Reflected power, little-endian u16
    pub const REFLECTED_POWER: usize = 24;
    /// SWR x 100, little-endian u16
    pub const SWR: usize = 26;
    /// Device error code
    pub const ERROR_CODE: usize = 66;
    /// Fan index (high nibble) and band index (low nibble)
    pub const FAN_BAND: usize = 69;
    /// Trailing checksum byte
    pub const CHECKSUM: usize = 71;
}

/// Decoding constants fixed by the protocol
pub mod scale {
    /// Kelvin offset subtracted from the raw temperature
    pub const KELVIN_OFFSET: i32 = 273;
    /// Gain applied to the raw forward power reading
    pub const FORWARD_POWER_GAIN: f64 = 1.02;
    /// Divider turning the raw SWR into a ratio
    pub const SWR_DIVIDER: f64 = 100.0;
    /// Plausible temperature range in degrees C
    pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<i32> = 0..=100;
}
