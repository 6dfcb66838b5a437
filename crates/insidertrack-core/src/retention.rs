//! Capacity-bounded, append-only FIFO log.

use std::collections::VecDeque;

/// Keeps the most recent `capacity` items; pushing past capacity evicts the
/// oldest item first.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedLog<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> BoundedLog<T> {
    /// Create an empty log. Returns `None` for a capacity of 0.
    pub fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        Some(Self {
            capacity,
            items: VecDeque::with_capacity(capacity.min(1024)),
        })
    }

    /// Adopt existing items, keeping only the most recent `capacity`.
    pub fn from_vec(capacity: usize, items: Vec<T>) -> Option<Self> {
        let mut log = Self::new(capacity)?;
        let skip = items.len().saturating_sub(capacity);
        log.items.extend(items.into_iter().skip(skip));
        Some(log)
    }

    /// Append an item and return the evicted one, if any
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(BoundedLog::<u32>::new(0).is_none());
        assert!(BoundedLog::<u32>::from_vec(0, vec![1]).is_none());
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut log = BoundedLog::new(3).unwrap();
        assert_eq!(log.push(1), None);
        assert_eq!(log.push(2), None);
        assert_eq!(log.push(3), None);
        assert_eq!(log.push(4), Some(1));
        assert_eq!(log.into_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn test_from_vec_keeps_most_recent() {
        let log = BoundedLog::from_vec(2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(log.last(), Some(&4));
    }

    #[test]
    fn test_hundred_and_first_entry() {
        let mut log = BoundedLog::from_vec(100, (0..100).collect()).unwrap();
        assert_eq!(log.push(100), Some(0));
        let items = log.into_vec();
        assert_eq!(items.len(), 100);
        assert_eq!(items.first(), Some(&1));
        assert_eq!(items.last(), Some(&100));
    }
}
