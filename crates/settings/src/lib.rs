//! Monitor Settings
//!
//! Settings come from an optional TOML file overlaid with `ACOM_`-prefixed
//! environment variables (`ACOM_SERIAL__PORT=/dev/ttyUSB0`,
//! `ACOM_MODEL=1200S`, `ACOM_CAT__BAUD=9600`, ...). Missing values fall back
//! to the defaults below.

use amp_protocol::{AmpModel, CatConfig, DEFAULT_BAUD_RATE};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "acom.toml";

/// Environment variable prefix
const ENV_PREFIX: &str = "ACOM";

/// Errors while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File or environment could not be read or parsed
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Values parsed but make no sense
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Serial port settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Device path, empty when not yet chosen
    pub port: String,
    pub baud_rate: u32,
    /// Use an in-memory transport instead of a real port
    pub mock: bool,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            mock: false,
        }
    }
}

/// Loop timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Transport drain interval (milliseconds)
    pub poll_interval_ms: u64,
    /// Link watchdog period (milliseconds)
    pub watchdog_period_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 20,
            watchdog_period_ms: 500,
        }
    }
}

/// Everything the monitor needs from the settings store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub serial: SerialSettings,
    /// Amplifier model, sets display ranges only
    pub model: AmpModel,
    pub cat: CatConfig,
    pub timing: TimingSettings,
}

impl AppSettings {
    /// Load from `path` (if it exists) and the process environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path.as_ref(), None)
    }

    fn load_with_env(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        info!("Loading settings from {}", path.display());

        let settings: AppSettings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Self::environment(env))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Settings: {:?}", settings);
        Ok(settings)
    }

    /// Parse settings from a TOML string (no environment overlay)
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings: AppSettings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn environment(source: Option<HashMap<String, String>>) -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(source)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.serial.baud_rate == 0 {
            return Err(SettingsError::Invalid {
                field: "serial.baud_rate",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "timing.poll_interval_ms",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.timing.watchdog_period_ms <= self.timing.poll_interval_ms {
            return Err(SettingsError::Invalid {
                field: "timing.watchdog_period_ms",
                reason: format!(
                    "{}ms must exceed the poll interval ({}ms)",
                    self.timing.watchdog_period_ms, self.timing.poll_interval_ms
                ),
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timing.poll_interval_ms)
    }

    pub fn watchdog_period(&self) -> Duration {
        Duration::from_millis(self.timing.watchdog_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_protocol::{CatBaud, CatMode, CatPort};

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.serial.port, "");
        assert_eq!(settings.serial.baud_rate, 9600);
        assert_eq!(settings.model, AmpModel::Acom700S);
        assert_eq!(settings.cat.port, CatPort::Ttl);
        assert_eq!(settings.cat.mode, CatMode::Icom);
        assert_eq!(settings.cat.baud, CatBaud::B4800);
        assert_eq!(settings.poll_interval(), Duration::from_millis(20));
        assert_eq!(settings.watchdog_period(), Duration::from_millis(500));
    }

    #[test]
    fn test_from_toml() {
        let settings = AppSettings::from_toml_str(
            r#"
            model = "1200S"

            [serial]
            port = "/dev/ttyUSB0"

            [cat]
            port = "rs232"
            mode = "elecraft-kenwood"
            baud = 38400
            "#,
        )
        .unwrap();
        assert_eq!(settings.model, AmpModel::Acom1200S);
        assert_eq!(settings.serial.port, "/dev/ttyUSB0");
        assert_eq!(settings.serial.baud_rate, 9600);
        assert_eq!(settings.cat.port, CatPort::Rs232);
        assert_eq!(settings.cat.mode, CatMode::ElecraftKenwood);
        assert_eq!(settings.cat.baud, CatBaud::B38400);
        assert_eq!(settings.timing, TimingSettings::default());
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(AppSettings::from_toml_str(r#"model = "2000S""#).is_err());
    }

    #[test]
    fn test_bad_timing_rejected() {
        let err = AppSettings::from_toml_str(
            r#"
            [timing]
            poll_interval_ms = 500
            watchdog_period_ms = 100
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "timing.watchdog_period_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_uses_environment() {
        let mut env = HashMap::new();
        env.insert("ACOM_SERIAL__PORT".to_string(), "COM3".to_string());
        env.insert("ACOM_MODEL".to_string(), "600S".to_string());
        env.insert("ACOM_TIMING__WATCHDOG_PERIOD_MS".to_string(), "750".to_string());

        let settings =
            AppSettings::load_with_env(Path::new("does-not-exist.toml"), Some(env)).unwrap();
        assert_eq!(settings.serial.port, "COM3");
        assert_eq!(settings.model, AmpModel::Acom600S);
        assert_eq!(settings.watchdog_period(), Duration::from_millis(750));
    }
}
