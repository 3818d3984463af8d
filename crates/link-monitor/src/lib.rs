//! Amplifier Link Monitor
//!
//! Ties the frame decoder, the peak tracker and the link watchdog into one
//! session that owns the transport, and drives it from a single async task.

mod link;
mod panel;
mod runner;
mod watchdog;

pub use link::{AmpLink, PollReport};
pub use panel::PanelState;
pub use runner::{run, Operator, RunnerConfig};
pub use watchdog::{LinkWatchdog, Verdict, DEFAULT_PERIOD_MS};
