//! Overwrite-Oldest Ring Buffer

/// Default buffer capacity (8 frames = ~160 ms at the 20 ms poll rate)
pub const DEFAULT_CAPACITY: usize = 8;

/// Fixed-capacity ring buffer that only ever overwrites
///
/// Every slot starts at `T::default()`, so the buffer is never empty and
/// [`RingBuffer::max`] always has an answer.
#[derive(Debug, Clone)]
pub struct RingBuffer<T = f64> {
    /// Pre-allocated storage
    storage: Box<[T]>,
    /// Next slot to overwrite
    head: usize,
}

impl<T: Copy + Default + PartialOrd> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    ///
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            storage: vec![T::default(); capacity].into_boxed_slice(),
            head: 0,
        }
    }

    /// Create a buffer with default capacity (8 values)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Store a value, overwriting the oldest one
    pub fn push(&mut self, value: T) {
        self.storage[self.head] = value;
        self.head = (self.head + 1) % self.storage.len();
    }

    /// Largest value currently held
    pub fn max(&self) -> T {
        let mut max = self.storage[0];
        for &v in self.storage.iter().skip(1) {
            if v > max {
                max = v;
            }
        }
        max
    }

}

impl<T: Copy + Default + PartialOrd> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
