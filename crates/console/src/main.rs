//! ACOM Amplifier Monitor - Main Entry Point

use amp_protocol::{SerialTransport, Transport};
use anyhow::{Context, Result};
use console::simulator::SimulatedAmplifier;
use console::{display_panel, init_logging, parse_operator, shutdown_on, OPERATOR_HELP};
use link_monitor::{run, AmpLink, Operator, PanelState, RunnerConfig};
use settings::{AppSettings, DEFAULT_SETTINGS_FILE};
use std::io::BufRead;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== ACOM Amplifier Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string());
    let settings = AppSettings::load(&path)
        .with_context(|| format!("loading settings from {}", path))?;

    if settings.serial.mock {
        session(SimulatedAmplifier::new(), &settings).await
    } else {
        let transport = SerialTransport::open(&settings.serial.port, settings.serial.baud_rate)
            .with_context(|| format!("opening serial port '{}'", settings.serial.port))?;
        session(transport, &settings).await
    }
}

async fn session<T: Transport>(transport: T, settings: &AppSettings) -> Result<()> {
    let mut link = AmpLink::new(transport, settings.model, settings.watchdog_period());
    info!("Monitoring {}", settings.model);

    if let Err(e) = link.configure_cat(settings.cat) {
        warn!("CAT setup failed: {}", e);
    }

    let config = RunnerConfig {
        poll_interval: settings.poll_interval(),
        watchdog_period: settings.watchdog_period(),
        cat: settings.cat,
    };

    let (op_tx, op_rx) = mpsc::channel(16);
    let (panel_tx, panel_rx) = watch::channel(PanelState::powered_down());

    let display = tokio::spawn(display_panel(panel_rx, link.model()));
    spawn_operator_input(op_tx.clone());

    tokio::spawn(shutdown_on(tokio::signal::ctrl_c(), op_tx));

    info!("{}", OPERATOR_HELP);
    run(&mut link, &config, op_rx, panel_tx).await?;

    display.await?;
    Ok(())
}

/// Forward stdin words to the runner from a plain thread
fn spawn_operator_input(op_tx: mpsc::Sender<Operator>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_operator(&line) {
                Some(op) => {
                    if op_tx.blocking_send(op).is_err() {
                        break;
                    }
                }
                None => warn!("Unknown command '{}'; {}", line.trim(), OPERATOR_HELP),
            }
        }
    });
}
