//! Outgoing Command Frames
//!
//! Every command is a fixed-layout literal except CAT-setup, whose two
//! configuration bytes come from [`CatConfig`]. The trailing checksum byte is
//! always computed, never stored.

use crate::cat::CatConfig;
use crate::checksum::complement;
use std::fmt;

/// Longest command frame in bytes
const MAX_COMMAND_LEN: usize = 8;

/// Commands understood by the amplifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the telemetry stream
    EnableTelemetry,
    /// Stop the telemetry stream
    DisableTelemetry,
    /// Switch to operate
    Operate,
    /// Switch to standby (also powers the amplifier up)
    Standby,
    /// Power down
    Off,
    /// Restart the controller
    Restart,
    /// Configure the CAT interface
    CatSetup(CatConfig),
}

impl Command {
    /// Frame body without the checksum byte
    fn body(&self) -> ([u8; MAX_COMMAND_LEN], usize) {
        let mut body = [0u8; MAX_COMMAND_LEN];
        let len = match self {
            Command::EnableTelemetry => {
                body[..3].copy_from_slice(&[0x55, 0x92, 0x04]);
                3
            }
            Command::DisableTelemetry => {
                body[..3].copy_from_slice(&[0x55, 0x91, 0x04]);
                3
            }
            Command::Operate => Self::mode_body(&mut body, 0x06),
            Command::Standby => Self::mode_body(&mut body, 0x05),
            Command::Off => Self::mode_body(&mut body, 0x0A),
            Command::Restart => Self::mode_body(&mut body, 0x02),
            Command::CatSetup(cat) => {
                let (first, second) = cat.config_bytes();
                body[..7].copy_from_slice(&[0x55, 0x81, 0x08, 0x05, first, second, 0x00]);
                7
            }
        };
        (body, len)
    }

    fn mode_body(body: &mut [u8; MAX_COMMAND_LEN], mode: u8) -> usize {
        body[..7].copy_from_slice(&[0x55, 0x81, 0x08, 0x02, 0x00, mode, 0x00]);
        7
    }

    /// Build the wire frame, checksum included
    pub fn build(&self) -> OutgoingCommand {
        let (mut bytes, len) = self.body();
        bytes[len] = complement(&bytes[..len]);
        OutgoingCommand {
            command: *self,
            bytes,
            len: len + 1,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::EnableTelemetry => "enable-telemetry",
            Command::DisableTelemetry => "disable-telemetry",
            Command::Operate => "operate",
            Command::Standby => "standby",
            Command::Off => "off",
            Command::Restart => "restart",
            Command::CatSetup(_) => "cat-setup",
        }
    }
}

/// An encoded command ready for the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutgoingCommand {
    command: Command,
    bytes: [u8; MAX_COMMAND_LEN],
    len: usize,
}

impl OutgoingCommand {
    /// Wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for OutgoingCommand {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for OutgoingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.command.name())?;
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        write!(f, "]")
    }
}
