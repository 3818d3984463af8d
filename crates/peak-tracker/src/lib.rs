//! Peak Tracker
//!
//! Noisy instantaneous readings go into a small overwrite-oldest ring buffer
//! per quantity; the display shows the largest value currently held.

mod buffer;
mod tracker;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
pub use tracker::{PeakTracker, Quantity};
