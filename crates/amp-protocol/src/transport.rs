//! Serial Transport
//!
//! The core never blocks: it asks how many bytes are waiting and reads only
//! those. Writes are fire-and-forget; failures are returned, not retried.

use crate::error::AmpError;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::time::Duration;
use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

/// Default baud rate of the amplifier's RS232 port
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Byte transport between the host and the amplifier
pub trait Transport {
    /// Bytes that can be read without blocking
    fn bytes_available(&mut self) -> Result<usize, AmpError>;

    /// Read one byte if one is ready
    fn read_byte(&mut self) -> Result<Option<u8>, AmpError>;

    /// Write a complete frame
    fn write(&mut self, bytes: &[u8]) -> Result<(), AmpError>;

    /// Drive the RTS and DTR lines (the amplifier uses them as a power-on line)
    fn set_control_lines(&mut self, rts: bool, dtr: bool) -> Result<(), AmpError>;
}

/// RS232 link to the amplifier
pub struct SerialTransport {
    /// Serial port device path (e.g., "/dev/ttyUSB0" or "COM3")
    device: String,
    port: Box<dyn SerialPort>,
    /// Bytes already pulled from the driver but not yet handed out
    pending: VecDeque<u8>,
}

impl SerialTransport {
    /// Open the port at 8N1 without flow control and raise RTS/DTR
    pub fn open(device: &str, baud_rate: u32) -> Result<Self, AmpError> {
        if device.is_empty() {
            return Err(AmpError::NotConnected);
        }

        info!("Opening amplifier port {} at {} baud", device, baud_rate);

        let port = tokio_serial::new(device, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(0))
            .open()?;

        let mut transport = Self {
            device: device.to_string(),
            port,
            pending: VecDeque::new(),
        };
        transport.set_control_lines(true, true)?;
        Ok(transport)
    }
}

impl Transport for SerialTransport {
    fn bytes_available(&mut self) -> Result<usize, AmpError> {
        let waiting = self.port.bytes_to_read()? as usize;
        Ok(self.pending.len() + waiting)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, AmpError> {
        if self.pending.is_empty() {
            let waiting = self.port.bytes_to_read()? as usize;
            if waiting == 0 {
                return Ok(None);
            }
            let mut chunk = vec![0u8; waiting];
            let read = self.port.read(&mut chunk)?;
            self.pending.extend(&chunk[..read]);
        }
        Ok(self.pending.pop_front())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AmpError> {
        self.port.flush()?;
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn set_control_lines(&mut self, rts: bool, dtr: bool) -> Result<(), AmpError> {
        debug!("{}: RTS={} DTR={}", self.device, rts, dtr);
        self.port.write_request_to_send(rts)?;
        self.port.write_data_terminal_ready(dtr)?;
        Ok(())
    }
}
