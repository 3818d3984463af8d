//! Peak Tracker for the Four Power Meters

use crate::buffer::{RingBuffer, DEFAULT_CAPACITY};

/// Tracked telemetry quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Drive power from the transceiver
    Drive,
    /// Reflected power
    Reflected,
    /// Standing wave ratio
    Swr,
    /// Forward (PA output) power
    ForwardPower,
}

impl Quantity {
    fn index(&self) -> usize {
        match self {
            Quantity::Drive => 0,
            Quantity::Reflected => 1,
            Quantity::Swr => 2,
            Quantity::ForwardPower => 3,
        }
    }
}

/// One independent ring buffer per [`Quantity`]
#[derive(Debug, Clone)]
pub struct PeakTracker {
    buffers: [RingBuffer<f64>; 4],
}

impl PeakTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: std::array::from_fn(|_| RingBuffer::new(capacity)),
        }
    }

    /// Record an instantaneous reading
    pub fn put(&mut self, quantity: Quantity, value: f64) {
        self.buffers[quantity.index()].push(value);
    }

    /// Peak of the recent readings
    pub fn max(&self, quantity: Quantity) -> f64 {
        self.buffers[quantity.index()].max()
    }
}

impl Default for PeakTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
