//! Telemetry Snapshot
//!
//! Field extraction from one checksum-validated 72-byte frame.

use crate::fault::{classify, DeviceFault};
use crate::layout;
use crate::scale;
use crate::status::AmpStatus;

/// Band names indexed by the low nibble of byte 69
pub const BAND_NAMES: [&str; 16] = [
    "?m", "160m", "80m", "40/60m", "30m", "20m", "17m", "15m", "12m", "10m", "6m", "?m", "?m",
    "?m", "?m", "?m",
];

/// Name of a band index, `?m` when out of the table
pub fn band_name(index: u8) -> &'static str {
    BAND_NAMES.get(index as usize).copied().unwrap_or("?m")
}

/// Decoded content of one telemetry frame
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Raw status nibble
    pub status_code: u8,
    pub status: AmpStatus,
    /// Heatsink temperature in degrees C
    pub temperature_c: i32,
    /// Active fan stage 1-4
    pub fan: Option<u8>,
    /// Drive power, 0.1 W units
    pub drive_power: f64,
    /// Reflected power in W
    pub reflected_power: f64,
    /// Forward power in W, gain applied
    pub forward_power: f64,
    /// SWR ratio
    pub swr: f64,
    /// Band index into [`BAND_NAMES`]
    pub band: u8,
    /// Raw device error code
    pub error_code: u8,
}

fn le_u16(frame: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([frame[offset], frame[offset + 1]])
}

impl TelemetrySnapshot {
    /// Decode a complete frame
    ///
    /// The caller is responsible for checksum validation; this only extracts
    /// fields.
    pub fn decode(frame: &[u8; layout::FRAME_LEN]) -> Self {
        let status_code = (frame[layout::STATUS] & 0xF0) >> 4;
        let temperature_c = le_u16(frame, layout::TEMPERATURE) as i32 - scale::KELVIN_OFFSET;

        let fan = match (frame[layout::FAN_BAND] & 0xF0) >> 4 {
            n @ 1..=4 => Some(n),
            _ => None,
        };

        Self {
            status_code,
            status: AmpStatus::from_code(status_code),
            temperature_c,
            fan,
            drive_power: le_u16(frame, layout::DRIVE_POWER) as f64,
            reflected_power: le_u16(frame, layout::REFLECTED_POWER) as f64,
            forward_power: scale::FORWARD_POWER_GAIN * le_u16(frame, layout::FORWARD_POWER) as f64,
            swr: le_u16(frame, layout::SWR) as f64 / scale::SWR_DIVIDER,
            band: frame[layout::FAN_BAND] & 0x0F,
            error_code: frame[layout::ERROR_CODE],
        }
    }

    /// Whether the temperature passed the sanity range check
    pub fn temperature_plausible(&self) -> bool {
        scale::TEMPERATURE_RANGE.contains(&self.temperature_c)
    }

    pub fn band_name(&self) -> &'static str {
        band_name(self.band)
    }

    /// Classified device fault
    pub fn fault(&self) -> DeviceFault {
        classify(self.error_code)
    }
}
