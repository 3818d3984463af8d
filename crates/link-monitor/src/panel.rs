//! Front Panel Model
//!
//! What an operator display shows: peak-held meters, status, band, fan and
//! the current device fault. `None` readings render as "unavailable".

use amp_protocol::{AmpModel, AmpStatus, DeviceFault, Severity};

/// Displayed amplifier state
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub status: AmpStatus,
    /// Peak forward power in W
    pub forward_power: Option<f64>,
    /// Peak reflected power in W
    pub reflected_power: Option<f64>,
    /// Last plausible temperature in degrees C
    pub temperature: Option<i32>,
    pub band: Option<&'static str>,
    /// Peak drive power in W
    pub drive: Option<f64>,
    /// Peak SWR
    pub swr: Option<f64>,
    pub fan: Option<u8>,
    /// Shown device fault, `None` when clear
    pub fault: Option<DeviceFault>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::powered_down()
    }
}

fn fraction(value: Option<f64>, full_scale: f64) -> f64 {
    match value {
        Some(v) if full_scale > 0.0 => (v / full_scale).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

impl PanelState {
    /// Every reading unavailable, message cleared
    pub fn powered_down() -> Self {
        Self {
            status: AmpStatus::PoweredDown,
            forward_power: None,
            reflected_power: None,
            temperature: None,
            band: None,
            drive: None,
            swr: None,
            fan: None,
            fault: None,
        }
    }

    /// Switch to the powered-down display in place
    pub fn power_down(&mut self) {
        *self = Self::powered_down();
    }

    pub fn power_text(&self) -> String {
        match self.forward_power {
            Some(w) => format!("{}W", w as i64),
            None => "--W".to_string(),
        }
    }

    pub fn reflected_text(&self) -> String {
        match self.reflected_power {
            Some(w) => format!("{}R", w as i64),
            None => "--R".to_string(),
        }
    }

    pub fn temperature_text(&self) -> String {
        match self.temperature {
            Some(t) => format!("{}C", t),
            None => "--C".to_string(),
        }
    }

    pub fn band_text(&self) -> &'static str {
        self.band.unwrap_or("--m")
    }

    pub fn drive_text(&self) -> String {
        self.drive
            .map(|w| format!("{}W", w as i64))
            .unwrap_or_default()
    }

    pub fn swr_text(&self) -> String {
        self.swr.map(|s| format!("{:.1}", s)).unwrap_or_default()
    }

    pub fn fan_text(&self) -> String {
        self.fan.map(|n| format!("Fan {}", n)).unwrap_or_default()
    }

    pub fn message_text(&self) -> &'static str {
        self.fault.map(|f| f.message).unwrap_or("")
    }

    /// Whether an error (not a warning) is shown
    pub fn has_error(&self) -> bool {
        matches!(self.fault, Some(f) if f.severity == Severity::Error)
    }

    /// Forward power bar position for the model's full scale
    pub fn power_fraction(&self, model: AmpModel) -> f64 {
        fraction(self.forward_power, model.max_power())
    }

    pub fn reflected_fraction(&self, model: AmpModel) -> f64 {
        fraction(self.reflected_power, model.max_reflected())
    }

    pub fn temperature_fraction(&self, model: AmpModel) -> f64 {
        fraction(self.temperature.map(f64::from), model.max_temperature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_protocol::classify;

    #[test]
    fn test_powered_down_texts() {
        let panel = PanelState::powered_down();
        assert_eq!(panel.power_text(), "--W");
        assert_eq!(panel.reflected_text(), "--R");
        assert_eq!(panel.temperature_text(), "--C");
        assert_eq!(panel.band_text(), "--m");
        assert_eq!(panel.swr_text(), "");
        assert_eq!(panel.fan_text(), "");
        assert_eq!(panel.drive_text(), "");
        assert_eq!(panel.message_text(), "");
        assert_eq!(panel.status.label(), "OFF");
    }

    #[test]
    fn test_live_texts() {
        let panel = PanelState {
            status: AmpStatus::Transmit,
            forward_power: Some(612.0),
            reflected_power: Some(14.0),
            temperature: Some(41),
            band: Some("20m"),
            drive: Some(25.5),
            swr: Some(1.34),
            fan: Some(2),
            fault: Some(classify(0x70)),
        };
        assert_eq!(panel.power_text(), "612W");
        assert_eq!(panel.reflected_text(), "14R");
        assert_eq!(panel.temperature_text(), "41C");
        assert_eq!(panel.drive_text(), "25W");
        assert_eq!(panel.swr_text(), "1.3");
        assert_eq!(panel.fan_text(), "Fan 2");
        assert_eq!(panel.message_text(), "CAT error");
        assert!(!panel.has_error());
    }

    #[test]
    fn test_bar_fractions_clamp_to_model_range() {
        let panel = PanelState {
            forward_power: Some(1000.0),
            reflected_power: Some(85.0),
            temperature: Some(50),
            ..PanelState::powered_down()
        };
        assert_eq!(panel.power_fraction(AmpModel::Acom700S), 1.0);
        assert!((panel.power_fraction(AmpModel::Acom1200S) - 1000.0 / 1400.0).abs() < 1e-9);
        assert!((panel.reflected_fraction(AmpModel::Acom700S) - 0.5).abs() < 1e-9);
        assert!((panel.temperature_fraction(AmpModel::Acom600S) - 0.5).abs() < 1e-9);
        assert_eq!(PanelState::powered_down().power_fraction(AmpModel::Acom700S), 0.0);
    }
}
