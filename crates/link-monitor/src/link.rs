//! Amplifier Link Session
//!
//! Owns the transport and every piece of per-link state. All mutation goes
//! through `&mut self`, so one task owning the session needs no locking.

use crate::panel::PanelState;
use crate::watchdog::{LinkWatchdog, Verdict};
use amp_protocol::{
    AmpError, AmpModel, AmpStatus, CatConfig, Command, FrameDecoder, TelemetrySnapshot, Transport,
};
use peak_tracker::{PeakTracker, Quantity};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drive power arrives in tenths of a watt
const DRIVE_UNITS_PER_WATT: f64 = 10.0;

/// Result of draining the transport once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    pub bytes_read: usize,
    pub frames_decoded: usize,
    pub frames_rejected: usize,
}

/// Telemetry session with one amplifier
pub struct AmpLink<T: Transport> {
    transport: T,
    decoder: FrameDecoder,
    peaks: PeakTracker,
    watchdog: LinkWatchdog,
    panel: PanelState,
    model: AmpModel,
    status: AmpStatus,
}

impl<T: Transport> AmpLink<T> {
    /// Create a session over an open transport
    pub fn new(transport: T, model: AmpModel, watchdog_period: Duration) -> Self {
        info!("Creating amplifier link for {}", model);
        Self {
            transport,
            decoder: FrameDecoder::new(),
            peaks: PeakTracker::default(),
            watchdog: LinkWatchdog::new(watchdog_period),
            panel: PanelState::powered_down(),
            model,
            status: AmpStatus::PoweredDown,
        }
    }

    /// Drain every byte the transport has ready and decode it
    ///
    /// Never blocks. Transport failures are returned; bad frames are counted
    /// and dropped.
    pub fn poll(&mut self) -> Result<PollReport, AmpError> {
        let mut report = PollReport::default();
        let available = self.transport.bytes_available()?;

        for _ in 0..available {
            let Some(byte) = self.transport.read_byte()? else {
                break;
            };
            report.bytes_read += 1;
            self.watchdog.observe_byte();

            match self.decoder.feed(byte) {
                Ok(Some(snapshot)) => {
                    report.frames_decoded += 1;
                    self.apply_snapshot(&snapshot);
                }
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    report.frames_rejected += 1;
                    debug!("Telemetry frame dropped: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    fn apply_snapshot(&mut self, snapshot: &TelemetrySnapshot) {
        if snapshot.status != self.status {
            info!("Amplifier status {} -> {}", self.status, snapshot.status);
        }
        self.status = snapshot.status;

        if snapshot.status.is_powered_down() {
            self.panel.power_down();
            return;
        }
        self.panel.status = snapshot.status;

        if snapshot.temperature_plausible() {
            self.panel.temperature = Some(snapshot.temperature_c);
        } else {
            debug!("Ignoring implausible temperature {}C", snapshot.temperature_c);
        }
        self.panel.fan = snapshot.fan;

        self.peaks.put(Quantity::Drive, snapshot.drive_power);
        self.peaks.put(Quantity::Reflected, snapshot.reflected_power);
        self.peaks.put(Quantity::Swr, snapshot.swr);
        self.peaks.put(Quantity::ForwardPower, snapshot.forward_power);

        self.panel.forward_power = Some(self.peaks.max(Quantity::ForwardPower));
        self.panel.reflected_power = Some(self.peaks.max(Quantity::Reflected));
        self.panel.swr = Some(self.peaks.max(Quantity::Swr));
        self.panel.drive = Some(self.peaks.max(Quantity::Drive) / DRIVE_UNITS_PER_WATT);
        self.panel.band = Some(snapshot.band_name());

        let fault = snapshot.fault();
        if fault.is_clear() {
            self.panel.fault = None;
        } else {
            if self.panel.fault != Some(fault) {
                warn!("Amplifier fault: {}", fault);
            }
            self.panel.fault = Some(fault);
        }
    }

    /// Watchdog period elapsed
    ///
    /// A silent period powers the panel down and re-enables telemetry. A
    /// failed write is logged and left to the next silent period.
    pub fn watchdog_tick(&mut self) -> Verdict {
        let verdict = self.watchdog.tick();

        if let Verdict::Dead { silent_periods } = verdict {
            if silent_periods == 1 {
                let timeout = AmpError::LinkTimeout(self.watchdog.period().as_millis() as u64);
                warn!("{}, re-enabling telemetry", timeout);
            } else {
                debug!("Link silent for {} periods", silent_periods);
            }
            self.status = AmpStatus::PoweredDown;
            self.panel.power_down();
            if let Err(e) = self.send(Command::EnableTelemetry) {
                warn!("Telemetry enable not sent: {}", e);
            }
        }

        verdict
    }

    /// Encode and write one command
    pub fn send(&mut self, command: Command) -> Result<(), AmpError> {
        let frame = command.build();
        debug!("Sending {}", frame);
        self.transport.write(frame.as_bytes())
    }

    /// Raise RTS/DTR and request standby
    pub fn power_on(&mut self) -> Result<(), AmpError> {
        info!("Powering amplifier on");
        self.transport.set_control_lines(true, true)?;
        self.send(Command::Standby)
    }

    /// Request power off and drop RTS/DTR
    pub fn power_off(&mut self) -> Result<(), AmpError> {
        info!("Powering amplifier off");
        self.send(Command::Off)?;
        self.transport.set_control_lines(false, false)
    }

    pub fn operate(&mut self) -> Result<(), AmpError> {
        self.send(Command::Operate)
    }

    pub fn standby(&mut self) -> Result<(), AmpError> {
        self.send(Command::Standby)
    }

    pub fn restart(&mut self) -> Result<(), AmpError> {
        self.send(Command::Restart)
    }

    /// Return to operate after a fault; no-op when nothing is shown
    pub fn acknowledge_fault(&mut self) -> Result<bool, AmpError> {
        match self.panel.fault {
            Some(fault) => {
                info!("Acknowledging {}", fault);
                self.send(Command::Operate)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Push the CAT selection to the amplifier
    pub fn configure_cat(&mut self, cat: CatConfig) -> Result<(), AmpError> {
        info!(
            "Configuring CAT: port {:?}, mode {:?}, {} baud",
            cat.port,
            cat.mode,
            cat.baud.rate()
        );
        self.send(Command::CatSetup(cat))
    }

    /// Stop the telemetry stream before the link is closed
    pub fn shutdown(&mut self) -> Result<(), AmpError> {
        info!("Disabling telemetry");
        self.send(Command::DisableTelemetry)
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Model whose ranges scale the panel bars
    pub fn model(&self) -> AmpModel {
        self.model
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_protocol::{FrameBuilder, MockTransport};

    fn link() -> AmpLink<MockTransport> {
        AmpLink::new(
            MockTransport::new(),
            AmpModel::Acom700S,
            Duration::from_millis(500),
        )
    }

    fn enable() -> Vec<u8> {
        Command::EnableTelemetry.build().as_bytes().to_vec()
    }

    #[test]
    fn test_frame_updates_panel() {
        let mut link = link();
        let frame = FrameBuilder::new()
            .status(7)
            .temperature_c(42)
            .forward_power(500)
            .reflected_power(20)
            .drive_power(300)
            .swr(140)
            .fan(1)
            .band(5)
            .build();
        link.transport_mut().push_incoming(&frame);

        let report = link.poll().unwrap();
        assert_eq!(report.bytes_read, 72);
        assert_eq!(report.frames_decoded, 1);

        let panel = link.panel();
        assert_eq!(panel.status, AmpStatus::Transmit);
        assert_eq!(panel.temperature, Some(42));
        assert_eq!(panel.power_text(), "510W");
        assert_eq!(panel.reflected_text(), "20R");
        assert_eq!(panel.drive_text(), "30W");
        assert_eq!(panel.swr_text(), "1.4");
        assert_eq!(panel.fan_text(), "Fan 1");
        assert_eq!(panel.band_text(), "20m");
        assert_eq!(link.watchdog_tick(), Verdict::Alive);
    }

    #[test]
    fn test_peak_holds_between_frames() {
        let mut link = link();
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(7).forward_power(600).build());
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(7).forward_power(100).build());
        link.poll().unwrap();
        assert_eq!(link.panel().power_text(), "612W");
    }

    #[test]
    fn test_implausible_temperature_keeps_previous() {
        let mut link = link();
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().temperature_c(35).build());
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().temperature_raw(0).build());
        link.poll().unwrap();
        assert_eq!(link.panel().temperature, Some(35));
    }

    #[test]
    fn test_temperature_above_range_keeps_previous() {
        let mut link = link();
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().temperature_c(100).build());
        link.poll().unwrap();
        assert_eq!(link.panel().temperature, Some(100));

        link.transport_mut()
            .push_incoming(&FrameBuilder::new().temperature_c(101).build());
        link.poll().unwrap();
        assert_eq!(link.panel().temperature, Some(100));
    }

    #[test]
    fn test_fault_shown_and_cleared() {
        let mut link = link();
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(6).error_code(0x00).build());
        link.poll().unwrap();
        assert_eq!(link.panel().message_text(), "Hot switching");
        assert!(link.panel().has_error());

        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(6).error_code(0xFF).build());
        link.poll().unwrap();
        assert_eq!(link.panel().message_text(), "");
    }

    #[test]
    fn test_powered_down_frame_blanks_panel() {
        let mut link = link();
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(6).forward_power(300).build());
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(10).forward_power(300).build());
        link.poll().unwrap();
        assert_eq!(link.panel(), &PanelState::powered_down());
    }

    #[test]
    fn test_rejected_frame_counted() {
        let mut link = link();
        let mut bad = FrameBuilder::new().status(7).build();
        bad[30] ^= 0x10;
        link.transport_mut().push_incoming(&bad);
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(6).build());
        let report = link.poll().unwrap();
        assert_eq!(report.frames_rejected, 1);
        assert_eq!(report.frames_decoded, 1);
        assert_eq!(link.panel().status, AmpStatus::Receive);
    }

    #[test]
    fn test_silent_periods_reenable_telemetry_each_time() {
        let mut link = link();
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(6).build());
        link.poll().unwrap();
        assert_eq!(link.watchdog_tick(), Verdict::Alive);
        assert!(link.transport().writes().is_empty());

        assert_eq!(link.watchdog_tick(), Verdict::Dead { silent_periods: 1 });
        assert_eq!(link.panel(), &PanelState::powered_down());
        assert_eq!(link.transport().writes(), &[enable()]);

        assert_eq!(link.watchdog_tick(), Verdict::Dead { silent_periods: 2 });
        assert_eq!(link.transport().writes(), &[enable(), enable()]);
    }

    #[test]
    fn test_noise_counts_as_alive() {
        let mut link = link();
        link.transport_mut().push_incoming(&[0x01, 0x02]);
        link.poll().unwrap();
        assert_eq!(link.watchdog_tick(), Verdict::Alive);
    }

    #[test]
    fn test_failed_enable_write_is_not_fatal() {
        let mut link = link();
        link.transport_mut().fail_writes(true);
        assert_eq!(link.watchdog_tick(), Verdict::Dead { silent_periods: 1 });
        link.transport_mut().fail_writes(false);
        assert_eq!(link.watchdog_tick(), Verdict::Dead { silent_periods: 2 });
        assert_eq!(link.transport().writes().len(), 1);
    }

    #[test]
    fn test_power_on_and_off() {
        let mut link = link();
        link.power_on().unwrap();
        assert_eq!(link.transport().control_lines(), (true, true));
        link.power_off().unwrap();
        assert_eq!(link.transport().control_lines(), (false, false));
        assert_eq!(
            link.transport().writes(),
            &[
                Command::Standby.build().as_bytes().to_vec(),
                Command::Off.build().as_bytes().to_vec(),
            ]
        );
    }

    #[test]
    fn test_acknowledge_only_with_fault() {
        let mut link = link();
        assert!(!link.acknowledge_fault().unwrap());
        link.transport_mut()
            .push_incoming(&FrameBuilder::new().status(6).error_code(0x06).build());
        link.poll().unwrap();
        assert!(link.acknowledge_fault().unwrap());
        assert_eq!(
            link.transport().writes(),
            &[Command::Operate.build().as_bytes().to_vec()]
        );
    }

    #[test]
    fn test_configure_cat_and_shutdown() {
        let mut link = link();
        link.configure_cat(CatConfig::default()).unwrap();
        link.shutdown().unwrap();
        let writes = link.transport().writes();
        assert_eq!(writes[0], vec![0x55, 0x81, 0x08, 0x05, 0x21, 0x20, 0x00, 0xDC]);
        assert_eq!(writes[1], vec![0x55, 0x91, 0x04, 0x16]);
    }
}
