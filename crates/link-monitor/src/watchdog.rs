//! Link Watchdog
//!
//! A heartbeat on whole periods of silence: any byte during a period keeps
//! the link alive for that period. It cannot tell real telemetry from line
//! noise, only silence from traffic.

use std::time::Duration;

/// Default watchdog period
pub const DEFAULT_PERIOD_MS: u64 = 500;

/// Liveness within the current period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Liveness {
    /// Waiting for the first byte of the period
    #[default]
    Armed,
    /// At least one byte arrived this period
    Alive,
}

/// Outcome of a watchdog tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Alive,
    /// No byte for a whole period; `silent_periods` counts consecutive ones
    Dead { silent_periods: u32 },
}

/// Armed/Alive cycle, re-armed on every tick
#[derive(Debug, Clone)]
pub struct LinkWatchdog {
    liveness: Liveness,
    period: Duration,
    silent_periods: u32,
}

impl LinkWatchdog {
    pub fn new(period: Duration) -> Self {
        Self {
            liveness: Liveness::Armed,
            period,
            silent_periods: 0,
        }
    }

    /// A byte arrived from the amplifier
    pub fn observe_byte(&mut self) {
        self.liveness = Liveness::Alive;
    }

    /// Judge the period that just ended and start the next one
    pub fn tick(&mut self) -> Verdict {
        let verdict = match self.liveness {
            Liveness::Alive => {
                self.silent_periods = 0;
                Verdict::Alive
            }
            Liveness::Armed => {
                self.silent_periods = self.silent_periods.saturating_add(1);
                Verdict::Dead {
                    silent_periods: self.silent_periods,
                }
            }
        };
        self.liveness = Liveness::Armed;
        verdict
    }

    pub fn period(&self) -> Duration {
        self.period
    }

}

impl Default for LinkWatchdog {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PERIOD_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_armed() {
        let mut w = LinkWatchdog::default();
        assert_eq!(w.liveness, Liveness::Armed);
        assert_eq!(w.tick(), Verdict::Dead { silent_periods: 1 });
    }

    #[test]
    fn test_byte_keeps_period_alive() {
        let mut w = LinkWatchdog::default();
        w.observe_byte();
        assert_eq!(w.tick(), Verdict::Alive);
        // re-armed after every tick
        assert_eq!(w.liveness, Liveness::Armed);
        assert_eq!(w.tick(), Verdict::Dead { silent_periods: 1 });
    }

    #[test]
    fn test_silent_periods_accumulate_and_reset() {
        let mut w = LinkWatchdog::new(Duration::from_millis(100));
        w.tick();
        w.tick();
        assert_eq!(w.tick(), Verdict::Dead { silent_periods: 3 });
        w.observe_byte();
        assert_eq!(w.tick(), Verdict::Alive);
        assert_eq!(w.silent_periods, 0);
        assert_eq!(w.period(), Duration::from_millis(100));
    }
}
