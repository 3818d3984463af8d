//! ACOM Amplifier Console
//!
//! Terminal front end: operator words on stdin, panel updates in the log.

use amp_protocol::AmpModel;
use link_monitor::{Operator, PanelState};
use std::future::Future;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod simulator;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

/// Map an operator word to a request
pub fn parse_operator(line: &str) -> Option<Operator> {
    match line.trim().to_ascii_lowercase().as_str() {
        "on" => Some(Operator::PowerOn),
        "operate" | "op" => Some(Operator::Operate),
        "standby" | "stby" => Some(Operator::Standby),
        "restart" => Some(Operator::Restart),
        "off" => Some(Operator::PowerOff),
        "ack" => Some(Operator::Acknowledge),
        "cat" => Some(Operator::ConfigureCat),
        "quit" | "exit" => Some(Operator::Shutdown),
        _ => None,
    }
}

/// Help line listing the accepted words
pub const OPERATOR_HELP: &str = "commands: on, operate, standby, restart, off, ack, cat, quit";

/// Text meter, `width` cells wide
fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

/// One-line rendering of the panel
pub fn render_panel(panel: &PanelState, model: AmpModel) -> String {
    let mut line = format!(
        "{:<8} PWR [{}] {:>5} REF [{}] {:>5} TMP [{}] {:>4} | band {:>6} | drive {:>4} | SWR {:>4} | {:>5}",
        panel.status.label(),
        bar(panel.power_fraction(model), 10),
        panel.power_text(),
        bar(panel.reflected_fraction(model), 10),
        panel.reflected_text(),
        bar(panel.temperature_fraction(model), 10),
        panel.temperature_text(),
        panel.band_text(),
        panel.drive_text(),
        panel.swr_text(),
        panel.fan_text(),
    );
    if let Some(fault) = panel.fault {
        line.push_str(&format!(" | {:?}: {}", fault.severity, fault.message));
    }
    line
}

/// Request shutdown once `signal` fires
///
/// Returns whether the runner was still there to receive it.
pub async fn shutdown_on<F>(signal: F, op_tx: mpsc::Sender<Operator>) -> bool
where
    F: Future<Output = std::io::Result<()>>,
{
    if signal.await.is_err() {
        return false;
    }
    info!("Interrupted, shutting down");
    if op_tx.send(Operator::Shutdown).await.is_err() {
        debug!("Runner already stopped");
        return false;
    }
    true
}

/// Log the current panel, then every change until the runner drops its sender
///
/// Returns the number of panels shown.
pub async fn display_panel(mut panel_rx: watch::Receiver<PanelState>, model: AmpModel) -> usize {
    let mut shown = 0;
    loop {
        let line = render_panel(&panel_rx.borrow_and_update(), model);
        info!(target: "panel", "{}", line);
        shown += 1;
        if panel_rx.changed().await.is_err() {
            return shown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_protocol::{classify, AmpStatus, MockTransport};
    use link_monitor::{run, AmpLink, RunnerConfig};
    use std::time::Duration;

    #[test]
    fn test_parse_operator_words() {
        assert_eq!(parse_operator("on"), Some(Operator::PowerOn));
        assert_eq!(parse_operator(" Operate \n"), Some(Operator::Operate));
        assert_eq!(parse_operator("stby"), Some(Operator::Standby));
        assert_eq!(parse_operator("ack"), Some(Operator::Acknowledge));
        assert_eq!(parse_operator("quit"), Some(Operator::Shutdown));
        assert_eq!(parse_operator("bogus"), None);
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0.0, 4), "....");
        assert_eq!(bar(0.5, 4), "##..");
        assert_eq!(bar(2.0, 4), "####");
    }

    #[test]
    fn test_render_powered_down() {
        let line = render_panel(&PanelState::powered_down(), AmpModel::Acom700S);
        assert!(line.starts_with("OFF"));
        assert!(line.contains("--W"));
        assert!(line.contains("--m"));
    }

    #[test]
    fn test_render_fault() {
        let panel = PanelState {
            status: AmpStatus::Receive,
            forward_power: Some(400.0),
            fault: Some(classify(0x0C)),
            ..PanelState::powered_down()
        };
        let line = render_panel(&panel, AmpModel::Acom700S);
        assert!(line.contains("RECEIVE"));
        assert!(line.contains("[#####.....]  400W"));
        assert!(line.ends_with("Error: RF power at wrong time"));
    }

    #[tokio::test]
    async fn test_display_panel_ends_with_sender() {
        let (panel_tx, panel_rx) = watch::channel(PanelState::powered_down());
        panel_tx.send_modify(|panel| panel.status = AmpStatus::Standby);
        drop(panel_tx);

        let shown = display_panel(panel_rx, AmpModel::Acom700S).await;
        assert_eq!(shown, 1);
    }

    #[tokio::test]
    async fn test_display_panel_shows_initial_panel() {
        let (panel_tx, panel_rx) = watch::channel(PanelState::powered_down());
        drop(panel_tx);
        assert_eq!(display_panel(panel_rx, AmpModel::Acom700S).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_session_renders_powered_down_panel() {
        let mut link = AmpLink::new(
            MockTransport::new(),
            AmpModel::Acom700S,
            Duration::from_millis(500),
        );
        let (_op_tx, op_rx) = mpsc::channel(4);
        let (panel_tx, panel_rx) = watch::channel(PanelState::powered_down());
        let display = tokio::spawn(display_panel(panel_rx, link.model()));

        let result = tokio::time::timeout(
            Duration::from_millis(1600),
            run(&mut link, &RunnerConfig::default(), op_rx, panel_tx),
        )
        .await;
        assert!(result.is_err());

        // the panel never changes over silence, so only the startup render
        assert_eq!(display.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_forwarded_on_signal() {
        let (op_tx, mut op_rx) = mpsc::channel(1);
        assert!(shutdown_on(async { Ok(()) }, op_tx).await);
        assert_eq!(op_rx.recv().await, Some(Operator::Shutdown));
    }

    #[tokio::test]
    async fn test_shutdown_after_runner_stopped() {
        let (op_tx, op_rx) = mpsc::channel(1);
        drop(op_rx);
        assert!(!shutdown_on(async { Ok(()) }, op_tx).await);
    }
}
