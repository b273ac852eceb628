use std::collections::VecDeque;
use std::fmt::Debug;

/// Bounded FIFO over the most recent `capacity` values.
///
/// Pushing into a full window evicts the oldest value.
#[derive(Clone, Debug)]
pub struct SlidingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone + Debug> SlidingWindow<T> {
    /// Create an empty window. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SlidingWindow {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a value, returning the evicted oldest value if the window overflowed
    pub fn push(&mut self, value: T) -> Option<T> {
        self.items.push_back(value);
        if self.items.len() > self.capacity {
            self.items.pop_front()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
