//! Amplifier Status Codes

use std::fmt;

/// Operating state reported in the high nibble of telemetry byte 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AmpStatus {
    /// Code not in the device table
    #[default]
    Unknown,
    /// Powering down (code 10)
    PoweredDown,
    Standby,
    Receive,
    Transmit,
    Reset,
    Init,
    Debug,
    Service,
    System,
}

impl AmpStatus {
    /// Map a status nibble to a status
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => AmpStatus::Reset,
            2 => AmpStatus::Init,
            3 => AmpStatus::Debug,
            4 => AmpStatus::Service,
            5 => AmpStatus::Standby,
            6 => AmpStatus::Receive,
            7 => AmpStatus::Transmit,
            9 => AmpStatus::System,
            10 => AmpStatus::PoweredDown,
            _ => AmpStatus::Unknown,
        }
    }

    /// Label shown on the front panel
    pub fn label(&self) -> &'static str {
        match self {
            AmpStatus::Unknown => "UNKNOWN",
            AmpStatus::PoweredDown => "OFF",
            AmpStatus::Standby => "STANDBY",
            AmpStatus::Receive => "RECEIVE",
            AmpStatus::Transmit => "TRANSMIT",
            AmpStatus::Reset => "RESET",
            AmpStatus::Init => "INIT",
            AmpStatus::Debug => "DEBUG",
            AmpStatus::Service => "SERVICE",
            AmpStatus::System => "SYSTEM",
        }
    }

    /// Whether the amplifier is shutting down or off
    pub fn is_powered_down(&self) -> bool {
        matches!(self, AmpStatus::PoweredDown)
    }
}

impl fmt::Display for AmpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
