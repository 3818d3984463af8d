//! Telemetry Frame Synchronizer and Decoder
//!
//! Bytes are fed one at a time. The decoder hunts for the two marker bytes,
//! buffers exactly one frame, validates the checksum and decodes it.
//!
//! Marker matching is byte-by-byte rather than a sliding window: a wrong
//! second marker byte drops the partial frame and that byte is not retried
//! as a new first marker. A bad checksum likewise drops the whole frame and
//! synchronization restarts with the next byte.

use crate::checksum::checksum;
use crate::error::AmpError;
use crate::layout::{FRAME_LEN, MARKER_0, MARKER_1};
use crate::telemetry::TelemetrySnapshot;
use tracing::{debug, trace};

/// Running counters for the decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames that passed the checksum
    pub frames_decoded: u64,
    /// Frames dropped on a checksum mismatch
    pub frames_rejected: u64,
    /// Bytes discarded while hunting for a marker
    pub bytes_discarded: u64,
}

/// Byte-stream frame decoder
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    buffer: [u8; FRAME_LEN],
    len: usize,
    stats: DecoderStats,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: [0u8; FRAME_LEN],
            len: 0,
            stats: DecoderStats::default(),
        }
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(snapshot))` when a valid frame completes, `Ok(None)`
    /// when more bytes are needed, and `Err(AmpError::ChecksumError)` when a
    /// completed frame fails validation.
    pub fn feed(&mut self, byte: u8) -> Result<Option<TelemetrySnapshot>, AmpError> {
        match self.len {
            0 => {
                if byte == MARKER_0 {
                    self.push(byte);
                } else {
                    self.stats.bytes_discarded += 1;
                }
                return Ok(None);
            }
            1 => {
                if byte == MARKER_1 {
                    self.push(byte);
                } else {
                    trace!("Second marker mismatch ({:02X}), resynchronizing", byte);
                    self.stats.bytes_discarded += 2;
                    self.reset();
                }
                return Ok(None);
            }
            _ => self.push(byte),
        }

        if self.len < FRAME_LEN {
            return Ok(None);
        }

        let sum = checksum(&self.buffer);
        let result = if sum == 0 {
            self.stats.frames_decoded += 1;
            Ok(Some(TelemetrySnapshot::decode(&self.buffer)))
        } else {
            self.stats.frames_rejected += 1;
            debug!("Dropping telemetry frame, checksum sum {:02X}", sum);
            Err(AmpError::ChecksumError {
                expected: 0,
                actual: sum,
            })
        };
        self.reset();
        result
    }

    fn push(&mut self, byte: u8) {
        self.buffer[self.len] = byte;
        self.len += 1;
    }

    /// Drop any partially assembled frame
    fn reset(&mut self) {
        self.len = 0;
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }
}
