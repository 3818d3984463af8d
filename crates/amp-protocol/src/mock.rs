//! Mock Transport and Frame Builder
//!
//! Hardware-free stand-ins used by tests and by the console's mock mode.

use crate::checksum::complement;
use crate::error::AmpError;
use crate::layout;
use crate::transport::Transport;
use std::collections::VecDeque;
use tracing::debug;

/// Scripted in-memory transport
#[derive(Debug, Default)]
pub struct MockTransport {
    incoming: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    control_lines: (bool, bool),
    fail_writes: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the amplifier had sent them
    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes);
    }

    /// Make every following write fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Frames written so far, oldest first
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Drain recorded writes
    pub fn take_writes(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.writes)
    }

    /// Current (RTS, DTR) levels
    pub fn control_lines(&self) -> (bool, bool) {
        self.control_lines
    }
}

impl Transport for MockTransport {
    fn bytes_available(&mut self) -> Result<usize, AmpError> {
        Ok(self.incoming.len())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, AmpError> {
        Ok(self.incoming.pop_front())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AmpError> {
        if self.fail_writes {
            return Err(AmpError::SerialError("mock write failure".to_string()));
        }
        debug!("Mock write: {:02X?}", bytes);
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn set_control_lines(&mut self, rts: bool, dtr: bool) -> Result<(), AmpError> {
        self.control_lines = (rts, dtr);
        Ok(())
    }
}

/// Builds valid telemetry frames field by field
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    frame: [u8; layout::FRAME_LEN],
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// Standby, 25 C, no fault
    pub fn new() -> Self {
        let mut frame = [0u8; layout::FRAME_LEN];
        frame[0] = layout::MARKER_0;
        frame[1] = layout::MARKER_1;
        frame[layout::ERROR_CODE] = crate::fault::CLEAR_CODE;
        Self { frame }.status(5).temperature_raw(298)
    }

    fn put_u16(mut self, offset: usize, value: u16) -> Self {
        self.frame[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        self
    }

    /// Status nibble (high nibble of byte 3)
    pub fn status(mut self, code: u8) -> Self {
        self.frame[layout::STATUS] = (code & 0x0F) << 4;
        self
    }

    /// Raw temperature in Kelvin
    pub fn temperature_raw(self, kelvin: u16) -> Self {
        self.put_u16(layout::TEMPERATURE, kelvin)
    }

    /// Temperature in degrees C
    pub fn temperature_c(self, celsius: i32) -> Self {
        let kelvin = (celsius + crate::scale::KELVIN_OFFSET).clamp(0, u16::MAX as i32) as u16;
        self.temperature_raw(kelvin)
    }

    pub fn drive_power(self, raw: u16) -> Self {
        self.put_u16(layout::DRIVE_POWER, raw)
    }

    pub fn forward_power(self, raw: u16) -> Self {
        self.put_u16(layout::FORWARD_POWER, raw)
    }

    pub fn reflected_power(self, raw: u16) -> Self {
        self.put_u16(layout::REFLECTED_POWER, raw)
    }

    /// SWR x 100
    pub fn swr(self, raw: u16) -> Self {
        self.put_u16(layout::SWR, raw)
    }

    pub fn error_code(mut self, code: u8) -> Self {
        self.frame[layout::ERROR_CODE] = code;
        self
    }

    pub fn fan(mut self, fan: u8) -> Self {
        let byte = &mut self.frame[layout::FAN_BAND];
        *byte = (*byte & 0x0F) | ((fan & 0x0F) << 4);
        self
    }

    pub fn band(mut self, band: u8) -> Self {
        let byte = &mut self.frame[layout::FAN_BAND];
        *byte = (*byte & 0xF0) | (band & 0x0F);
        self
    }

    /// Finish the frame with a valid checksum
    pub fn build(mut self) -> [u8; layout::FRAME_LEN] {
        self.frame[layout::CHECKSUM] = complement(&self.frame[..layout::CHECKSUM]);
        self.frame
    }
}
