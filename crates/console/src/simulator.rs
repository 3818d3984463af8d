//! Simulated Amplifier
//!
//! Stands in for the serial port when `serial.mock` is set. Obeys the
//! command frames it is sent and streams pseudo-random telemetry while
//! telemetry is enabled.

use amp_protocol::{AmpError, Command, FrameBuilder, Transport};
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use tracing::{debug, info};

/// Polls between two emitted frames
const DEFAULT_FRAME_EVERY: u32 = 5;

/// Leading bytes of every CAT-setup frame
const CAT_SETUP_PREFIX: &[u8] = &[0x55, 0x81, 0x08, 0x05];

/// Amplifier behind a fake serial port
#[derive(Debug)]
pub struct SimulatedAmplifier {
    outgoing: VecDeque<u8>,
    telemetry: bool,
    status: u8,
    polls: u32,
    sequence: u64,
    frame_every: u32,
}

impl Default for SimulatedAmplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedAmplifier {
    /// Powered-down amplifier with telemetry off
    pub fn new() -> Self {
        info!("Creating simulated amplifier");
        Self {
            outgoing: VecDeque::new(),
            telemetry: false,
            status: 10,
            polls: 0,
            sequence: 0,
            frame_every: DEFAULT_FRAME_EVERY,
        }
    }

    /// Emit one frame every `polls` transport polls
    pub fn with_frame_every(mut self, polls: u32) -> Self {
        self.frame_every = polls.max(1);
        self
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.telemetry
    }

    fn recognise(bytes: &[u8]) -> Option<Command> {
        let literals = [
            Command::EnableTelemetry,
            Command::DisableTelemetry,
            Command::Operate,
            Command::Standby,
            Command::Off,
            Command::Restart,
        ];
        literals
            .into_iter()
            .find(|c| c.build().as_bytes() == bytes)
    }

    fn next_frame(&mut self) -> [u8; 72] {
        let mut hasher = DefaultHasher::new();
        self.sequence.hash(&mut hasher);
        self.status.hash(&mut hasher);
        let hash = hasher.finish();
        self.sequence += 1;

        let builder = FrameBuilder::new()
            .status(self.status)
            .temperature_c(30 + (hash % 25) as i32)
            .fan(1 + (hash % 4) as u8)
            .band(6);
        let builder = if self.status == 7 {
            builder
                .drive_power(150 + (hash % 200) as u16)
                .forward_power(400 + (hash % 300) as u16)
                .reflected_power(5 + (hash % 20) as u16)
                .swr(105 + (hash % 40) as u16)
        } else {
            builder
        };
        builder.build()
    }
}

impl Transport for SimulatedAmplifier {
    fn bytes_available(&mut self) -> Result<usize, AmpError> {
        if self.telemetry && self.outgoing.is_empty() {
            self.polls += 1;
            if self.polls >= self.frame_every {
                self.polls = 0;
                let frame = self.next_frame();
                self.outgoing.extend(frame);
            }
        }
        Ok(self.outgoing.len())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, AmpError> {
        Ok(self.outgoing.pop_front())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AmpError> {
        if bytes.starts_with(CAT_SETUP_PREFIX) {
            info!("Simulator CAT setup {:02X?}", &bytes[4..]);
            return Ok(());
        }
        match Self::recognise(bytes) {
            Some(Command::EnableTelemetry) => self.telemetry = true,
            Some(Command::DisableTelemetry) => self.telemetry = false,
            // no radio attached, so operate reports a keyed transmitter
            Some(Command::Operate) => self.status = 7,
            Some(Command::Standby) => self.status = 5,
            Some(Command::Off) => self.status = 10,
            Some(Command::Restart) => self.status = 5,
            Some(Command::CatSetup(_)) | None => debug!("Simulator ignoring {:02X?}", bytes),
        }
        Ok(())
    }

    fn set_control_lines(&mut self, rts: bool, dtr: bool) -> Result<(), AmpError> {
        debug!("Simulator control lines RTS={} DTR={}", rts, dtr);
        Ok(())
    }
}
