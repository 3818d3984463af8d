//! Amplifier Models
//!
//! The model only sets the full-scale range of the front panel meters; the
//! telemetry format is identical across the family.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported amplifier models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AmpModel {
    #[serde(rename = "600S")]
    Acom600S,
    #[default]
    #[serde(rename = "700S")]
    Acom700S,
    #[serde(rename = "1000S")]
    Acom1000S,
    #[serde(rename = "1200S")]
    Acom1200S,
}

impl AmpModel {
    /// Full-scale forward power in watts
    pub fn max_power(&self) -> f64 {
        match self {
            AmpModel::Acom600S => 700.0,
            AmpModel::Acom700S => 800.0,
            AmpModel::Acom1000S => 1200.0,
            AmpModel::Acom1200S => 1400.0,
        }
    }

    /// Full-scale reflected power in watts
    pub fn max_reflected(&self) -> f64 {
        match self {
            AmpModel::Acom600S => 150.0,
            AmpModel::Acom700S => 170.0,
            AmpModel::Acom1000S => 250.0,
            AmpModel::Acom1200S => 300.0,
        }
    }

    /// Full-scale temperature in degrees C
    pub fn max_temperature(&self) -> f64 {
        100.0
    }

    pub fn name(&self) -> &'static str {
        match self {
            AmpModel::Acom600S => "600S",
            AmpModel::Acom700S => "700S",
            AmpModel::Acom1000S => "1000S",
            AmpModel::Acom1200S => "1200S",
        }
    }
}

impl fmt::Display for AmpModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ACOM {}", self.name())
    }
}
