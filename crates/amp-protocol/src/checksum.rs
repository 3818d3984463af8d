//! Frame Checksum
//!
//! Telemetry frames and commands share one rule: the unsigned sum of every
//! byte, modulo 256, is zero.

/// Sum of all bytes modulo 256
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Byte that, appended to `bytes`, makes the whole sum zero
pub fn complement(bytes: &[u8]) -> u8 {
    0u8.wrapping_sub(checksum(bytes))
}

/// Check a complete frame (checksum byte included)
pub fn is_valid(frame: &[u8]) -> bool {
    checksum(frame) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_complement_of_enable_telemetry() {
        // 55 92 04 -> 0x15
        assert_eq!(complement(&[0x55, 0x92, 0x04]), 0x15);
        assert!(is_valid(&[0x55, 0x92, 0x04, 0x15]));
    }

    #[test]
    fn test_complement_of_zero_sum() {
        assert_eq!(complement(&[0x80, 0x80]), 0);
    }
}
