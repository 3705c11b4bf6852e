use std::collections::VecDeque;

/// Fixed-capacity FIFO window over the most recent values.
///
/// Bounds memory for trailing-window consumers such as charts of the last
/// `N` ticks.
#[derive(Debug, Clone)]
pub struct HistoryWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryWindow<T> {
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history window capacity must be at least 1");
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting the oldest on overflow, and return the window oldest-first.
    pub fn push(&mut self, value: T) -> &[T] {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
        self.buffer.make_contiguous()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Most recently pushed value.
    pub fn latest(&self) -> Option<&T> {
        self.buffer.back()
    }

    /// Values oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }
}
