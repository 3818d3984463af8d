//! CAT Interface Selectors
//!
//! The amplifier can follow a transceiver over its accessory port. The
//! CAT-setup command carries three selectors; each one is the position of
//! the option in the amplifier's own menu.

use serde::{Deserialize, Serialize};

/// Physical CAT port on the accessory connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatPort {
    None,
    #[serde(alias = "RS232")]
    Rs232,
    #[default]
    #[serde(alias = "TTL")]
    Ttl,
    #[serde(alias = "BDC")]
    Bdc,
    Analog,
}

impl CatPort {
    pub fn selector(&self) -> u8 {
        match self {
            CatPort::None => 0,
            CatPort::Rs232 => 1,
            CatPort::Ttl => 2,
            CatPort::Bdc => 3,
            CatPort::Analog => 4,
        }
    }
}

/// Transceiver dialect spoken on the CAT port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatMode {
    None,
    #[default]
    #[serde(alias = "ICOM")]
    Icom,
    /// Yaesu FT-450
    YaesuFt450,
    /// Yaesu FT-817 family
    YaesuFt817,
    /// Yaesu FT-1000MP family
    YaesuFt1000mp,
    /// Elecraft / Kenwood
    ElecraftKenwood,
}

impl CatMode {
    pub fn selector(&self) -> u8 {
        match self {
            CatMode::None => 0,
            CatMode::Icom => 1,
            CatMode::YaesuFt450 => 2,
            CatMode::YaesuFt817 => 3,
            CatMode::YaesuFt1000mp => 4,
            CatMode::ElecraftKenwood => 5,
        }
    }
}

/// CAT port baud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CatBaud {
    None,
    B1200,
    #[default]
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
}

impl CatBaud {
    pub fn selector(&self) -> u8 {
        match self {
            CatBaud::None => 0,
            CatBaud::B1200 => 1,
            CatBaud::B4800 => 2,
            CatBaud::B9600 => 3,
            CatBaud::B19200 => 4,
            CatBaud::B38400 => 5,
            CatBaud::B57600 => 6,
        }
    }

    /// Baud rate in bits per second, 0 for `None`
    pub fn rate(&self) -> u32 {
        match self {
            CatBaud::None => 0,
            CatBaud::B1200 => 1200,
            CatBaud::B4800 => 4800,
            CatBaud::B9600 => 9600,
            CatBaud::B19200 => 19200,
            CatBaud::B38400 => 38400,
            CatBaud::B57600 => 57600,
        }
    }
}

impl TryFrom<u32> for CatBaud {
    type Error = String;

    fn try_from(rate: u32) -> Result<Self, Self::Error> {
        match rate {
            0 => Ok(CatBaud::None),
            1200 => Ok(CatBaud::B1200),
            4800 => Ok(CatBaud::B4800),
            9600 => Ok(CatBaud::B9600),
            19200 => Ok(CatBaud::B19200),
            38400 => Ok(CatBaud::B38400),
            57600 => Ok(CatBaud::B57600),
            other => Err(format!("unsupported CAT baud rate {other}")),
        }
    }
}

impl From<CatBaud> for u32 {
    fn from(baud: CatBaud) -> Self {
        baud.rate()
    }
}

/// Complete CAT selection forwarded to the amplifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatConfig {
    pub port: CatPort,
    pub mode: CatMode,
    pub baud: CatBaud,
}

impl CatConfig {
    /// The two configuration bytes of the CAT-setup command
    ///
    /// First byte: port in the high nibble, mode in the low nibble.
    /// Second byte: baud in the high nibble.
    pub fn config_bytes(&self) -> (u8, u8) {
        let first = (self.port.selector() << 4) | self.mode.selector();
        let second = self.baud.selector() << 4;
        (first, second)
    }
}
