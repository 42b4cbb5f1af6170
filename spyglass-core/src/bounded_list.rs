// Fixed-capacity append-only list with batched trim-on-overflow.
// Backs the log-entry store: trimming a batch of oldest entries amortizes
// eviction cost under high-frequency logging instead of paying one
// eviction per insert.

use std::collections::VecDeque;

use crate::error::{ConsoleError, ConsoleResult};

/// Append-only buffer that never grows past `capacity`. When an add would
/// overflow, the oldest `trim_count` items are evicted in a single batch
/// before the new item is appended.
pub struct BoundedList<T> {
    items: VecDeque<T>,
    capacity: usize,
    trim_count: usize,
    total_count: usize,
    trimmed_count: usize,
}

impl<T> BoundedList<T> {
    /// Create a list. Contract: `capacity > 0` and `1 <= trim_count <= capacity`.
    pub fn new(capacity: usize, trim_count: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        assert!(
            (1..=capacity).contains(&trim_count),
            "trim_count must be in 1..=capacity"
        );
        BoundedList {
            items: VecDeque::with_capacity(capacity),
            capacity,
            trim_count,
            total_count: 0,
            trimmed_count: 0,
        }
    }

    /// Append an item, batch-evicting the oldest `trim_count` items first
    /// if the list is full.
    pub fn add(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.drain(..self.trim_count);
            self.trimmed_count += self.trim_count;
        }
        self.items.push_back(item);
        self.total_count += 1;
    }

    /// Item at `index`, or `IndexOutOfRange` when `index >= count`.
    /// Never clamps: an out-of-range index is a caller contract violation.
    pub fn get(&self, index: usize) -> ConsoleResult<&T> {
        self.items.get(index).ok_or(ConsoleError::IndexOutOfRange {
            index,
            count: self.items.len(),
        })
    }

    /// Mutable access at `index`, same contract as [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> ConsoleResult<&mut T> {
        let count = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ConsoleError::IndexOutOfRange { index, count })
    }

    /// Drop all items and reset the running counters. Capacity and trim
    /// count are configuration and survive a clear.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_count = 0;
        self.trimmed_count = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn trim_count(&self) -> usize {
        self.trim_count
    }

    /// Number of `add` calls since creation or the last clear, including
    /// items that have since been trimmed away.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Number of items evicted by overflow trims.
    #[inline]
    pub fn trimmed_count(&self) -> usize {
        self.trimmed_count
    }

    #[inline]
    pub fn is_trimmed(&self) -> bool {
        self.trimmed_count > 0
    }

    /// True when the next add will evict a batch.
    #[inline]
    pub fn is_overflowing(&self) -> bool {
        self.items.len() == self.capacity
    }

    /// Replace the retained items in place, keeping every counter.
    /// Used by the store when toggling collapse mode merges consecutive
    /// duplicates; the merged sequence is never longer than the original.
    pub(crate) fn replace_retained(&mut self, items: Vec<T>) {
        debug_assert!(items.len() <= self.capacity);
        self.items = items.into();
    }

    /// Most recently added item, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.items.back_mut()
    }
}
