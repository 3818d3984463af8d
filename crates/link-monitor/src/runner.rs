//! Session Runner
//!
//! A single task multiplexes the byte poll, the watchdog period and operator
//! commands, so the session state is only ever touched from one place.

use crate::link::AmpLink;
use crate::panel::PanelState;
use crate::watchdog::DEFAULT_PERIOD_MS;
use amp_protocol::{AmpError, CatConfig, Transport};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Configuration for the session runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// How often the transport is drained (default: 20ms)
    pub poll_interval: Duration,
    /// Watchdog period (default: 500ms)
    pub watchdog_period: Duration,
    /// CAT selection sent on [`Operator::ConfigureCat`]
    pub cat: CatConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(20),
            watchdog_period: Duration::from_millis(DEFAULT_PERIOD_MS),
            cat: CatConfig::default(),
        }
    }
}

/// Operator requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    PowerOn,
    Operate,
    Standby,
    Restart,
    PowerOff,
    /// Clear a shown fault by returning to operate
    Acknowledge,
    ConfigureCat,
    /// Disable telemetry and stop the runner
    Shutdown,
}

fn publish(panel_tx: &watch::Sender<PanelState>, panel: &PanelState) {
    panel_tx.send_if_modified(|current| {
        if current != panel {
            *current = panel.clone();
            true
        } else {
            false
        }
    });
}

fn apply<T: Transport>(link: &mut AmpLink<T>, op: Operator, config: &RunnerConfig) {
    let result = match op {
        Operator::PowerOn => link.power_on(),
        Operator::Operate => link.operate(),
        Operator::Standby => link.standby(),
        Operator::Restart => link.restart(),
        Operator::PowerOff => link.power_off(),
        Operator::Acknowledge => link.acknowledge_fault().map(|_| ()),
        Operator::ConfigureCat => link.configure_cat(config.cat),
        Operator::Shutdown => link.shutdown(),
    };
    if let Err(e) = result {
        warn!("{:?} failed: {}", op, e);
    }
}

/// Drive a session until shutdown
///
/// Ends cleanly (telemetry disabled) on [`Operator::Shutdown`] or when every
/// command sender is dropped. A transport read failure ends the run with the
/// error and leaves the panel powered down.
pub async fn run<T: Transport>(
    link: &mut AmpLink<T>,
    config: &RunnerConfig,
    mut commands: mpsc::Receiver<Operator>,
    panel_tx: watch::Sender<PanelState>,
) -> Result<(), AmpError> {
    info!(
        "Starting link runner (poll {:?}, watchdog {:?})",
        config.poll_interval, config.watchdog_period
    );

    let mut poll = tokio::time::interval(config.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut watchdog = tokio::time::interval(config.watchdog_period);
    watchdog.set_missed_tick_behavior(MissedTickBehavior::Delay);

    publish(&panel_tx, link.panel());

    loop {
        tokio::select! {
            biased;

            _ = poll.tick() => {
                if let Err(e) = link.poll() {
                    error!("Transport read failed: {}", e);
                    let mut panel = link.panel().clone();
                    panel.power_down();
                    publish(&panel_tx, &panel);
                    return Err(e);
                }
            }
            _ = watchdog.tick() => {
                link.watchdog_tick();
            }
            op = commands.recv() => match op {
                Some(Operator::Shutdown) | None => break,
                Some(op) => apply(link, op, config),
            },
        }

        publish(&panel_tx, link.panel());
    }

    apply(link, Operator::Shutdown, config);
    let stats = link.decoder().stats();
    info!(
        "Link runner stopped: {} frames decoded, {} rejected, {} bytes discarded",
        stats.frames_decoded, stats.frames_rejected, stats.bytes_discarded
    );
    Ok(())
}
