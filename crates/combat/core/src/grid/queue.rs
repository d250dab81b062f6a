//! Binary min-heap keyed by integer priority.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Heap entry ordered by priority, then by insertion sequence so equal
/// priorities pop in FIFO order.
#[derive(Debug)]
struct Entry<T> {
    priority: i64,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.priority, self.sequence).cmp(&(other.priority, other.sequence))
    }
}

/// Min-priority queue used by the pathfinder.
///
/// Negative priorities are rejected: they mean "never scheduled".
#[derive(Debug)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    sequence: u64,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Inserts `item` with the given priority. Returns `false` (and drops the
    /// item) when the priority is negative.
    pub fn insert(&mut self, priority: i64, item: T) -> bool {
        if priority < 0 {
            return false;
        }

        let sequence = self.sequence;
        self.sequence += 1;
        self.heap.push(Reverse(Entry {
            priority,
            sequence,
            item,
        }));
        true
    }

    /// Removes and returns the item with the lowest priority.
    pub fn extract_min(&mut self) -> Option<T> {
        self.heap.pop().map(|Reverse(entry)| entry.item)
    }

    /// Lowest priority currently queued.
    pub fn peek_priority(&self) -> Option<i64> {
        self.heap.peek().map(|Reverse(entry)| entry.priority)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_priority_order() {
        let mut queue = PriorityQueue::new();
        assert!(queue.insert(5, "five"));
        assert!(queue.insert(1, "one"));
        assert!(queue.insert(3, "three"));

        assert_eq!(queue.peek_priority(), Some(1));
        assert_eq!(queue.extract_min(), Some("one"));
        assert_eq!(queue.extract_min(), Some("three"));
        assert_eq!(queue.extract_min(), Some("five"));
        assert_eq!(queue.extract_min(), None);
    }

    #[test]
    fn rejects_negative_priority() {
        let mut queue = PriorityQueue::new();
        assert!(!queue.insert(-1, 7));
        assert!(queue.is_empty());
    }

    #[test]
    fn ties_pop_in_insertion_order() {
        let mut queue = PriorityQueue::new();
        queue.insert(2, 'a');
        queue.insert(2, 'b');
        queue.insert(0, 'c');
        queue.insert(2, 'd');

        let order: Vec<char> = std::iter::from_fn(|| queue.extract_min()).collect();
        assert_eq!(order, vec!['c', 'a', 'b', 'd']);
    }
}
