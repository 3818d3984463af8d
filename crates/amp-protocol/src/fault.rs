//! Device Error Codes
//!
//! Byte 66 of the telemetry frame carries the amplifier's own fault code.
//! The mapping below is the device taxonomy and is reproduced as-is.

use std::fmt;

/// Code meaning "no fault", clears any shown message
pub const CLEAR_CODE: u8 = 0xFF;

/// Message for codes missing from the table
const UNLISTED_MESSAGE: &str = "ERROR - See display";

/// Fault severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Clear,
    Warning,
    Error,
}

/// (code, severity, message)
const FAULT_TABLE: &[(u8, Severity, &str)] = &[
    (0x00, Severity::Error, "Hot switching"),
    (0x08, Severity::Error, "Hot switching"),
    (0x03, Severity::Error, "Drive power at wrong time"),
    (0x04, Severity::Error, "Reflected power warning"),
    (0x05, Severity::Error, "Reflected power warning"),
    (0x06, Severity::Error, "Drive power too high"),
    (0x07, Severity::Error, "Drive power too high"),
    (0x0C, Severity::Error, "RF power at wrong time"),
    (0x0E, Severity::Error, "Stop transmission first"),
    (0x0F, Severity::Error, "Remove drive power"),
    (0x24, Severity::Error, "Excessive PAM current"),
    (0x25, Severity::Error, "Excessive PAM current"),
    (0x39, Severity::Error, "Excessive PAM current"),
    (0x44, Severity::Error, "Excessive PAM current"),
    (0x45, Severity::Error, "Excessive PAM current"),
    (0x59, Severity::Error, "Excessive PAM current"),
    (0x70, Severity::Warning, "CAT error"),
];

/// A classified device fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFault {
    /// Raw code from the frame
    pub code: u8,
    pub severity: Severity,
    /// Human readable category, empty when clear
    pub message: &'static str,
}

impl DeviceFault {
    pub fn is_clear(&self) -> bool {
        self.severity == Severity::Clear
    }
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Clear => write!(f, "clear"),
            _ => write!(f, "{} (code 0x{:02X})", self.message, self.code),
        }
    }
}

/// Classify a device error code
pub fn classify(code: u8) -> DeviceFault {
    if code == CLEAR_CODE {
        return DeviceFault {
            code,
            severity: Severity::Clear,
            message: "",
        };
    }

    FAULT_TABLE
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(code, severity, message)| DeviceFault {
            code,
            severity,
            message,
        })
        .unwrap_or(DeviceFault {
            code,
            severity: Severity::Warning,
            message: UNLISTED_MESSAGE,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_switching() {
        let fault = classify(0x00);
        assert_eq!(fault.severity, Severity::Error);
        assert_eq!(fault.message, "Hot switching");
        assert_eq!(classify(0x08).message, "Hot switching");
    }

    #[test]
    fn test_clear_code() {
        let fault = classify(0xFF);
        assert!(fault.is_clear());
        assert_eq!(fault.message, "");
    }

    #[test]
    fn test_pam_current_codes() {
        for code in [0x24, 0x25, 0x39, 0x44, 0x45, 0x59] {
            assert_eq!(classify(code).message, "Excessive PAM current");
        }
    }

    #[test]
    fn test_cat_error_is_warning() {
        let fault = classify(0x70);
        assert_eq!(fault.severity, Severity::Warning);
        assert_eq!(fault.message, "CAT error");
    }

    #[test]
    fn test_unlisted_code_is_generic_warning() {
        let fault = classify(0x42);
        assert_eq!(fault.severity, Severity::Warning);
        assert_eq!(fault.message, "ERROR - See display");
        assert_eq!(fault.to_string(), "ERROR - See display (code 0x42)");
    }
}
