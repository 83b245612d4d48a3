//! Time-ordered queue of pending events.

use repairsim_types::{Event, EventKind, SimTime};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ordering key for a pending event.
///
/// Events are ordered by time, then by insertion sequence. Two events
/// scheduled for exactly the same time therefore pop in the order they were
/// pushed, which keeps replays reproducible regardless of event kind.
#[derive(Debug, Clone, Copy)]
pub struct EventKey {
    /// Absolute time at which the event fires.
    pub time: SimTime,
    /// Insertion counter, unique within one queue.
    pub sequence: u64,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Min-priority queue of pending events.
///
/// Push and pop are both O(log n). The queue is owned by a single run and
/// never shared.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: BTreeMap<EventKey, EventKind>,
    next_sequence: u64,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event.
    pub fn push(&mut self, event: Event) -> EventKey {
        debug_assert!(
            !event.time.is_nan(),
            "NaN event time must be rejected before scheduling"
        );
        let key = EventKey {
            time: event.time,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.events.insert(key, event.kind);
        key
    }

    /// Remove and return the earliest event, or `None` if nothing is pending.
    pub fn pop_min(&mut self) -> Option<Event> {
        self.events
            .pop_first()
            .map(|(key, kind)| Event::new(key.time, kind))
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::breakdown(5.0));
        queue.push(Event::repair_complete(1.0));
        queue.push(Event::breakdown(3.0));
        assert_eq!(queue.len(), 3);

        let times: Vec<_> = std::iter::from_fn(|| queue.pop_min())
            .map(|e| e.time)
            .collect();
        assert_eq!(times, vec![1.0, 3.0, 5.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_pop_in_insertion_order() {
        let mut queue = EventQueue::new();
        queue.push(Event::repair_complete(2.0));
        queue.push(Event::breakdown(2.0));
        queue.push(Event::repair_complete(2.0));

        assert_eq!(queue.pop_min(), Some(Event::repair_complete(2.0)));
        assert_eq!(queue.pop_min(), Some(Event::breakdown(2.0)));
        assert_eq!(queue.pop_min(), Some(Event::repair_complete(2.0)));
    }

    #[test]
    fn test_pop_empty() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.pop_min(), None);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut queue = EventQueue::new();
        let a = queue.push(Event::breakdown(1.0));
        let b = queue.push(Event::breakdown(1.0));
        assert!(a < b);
        assert_eq!(queue.len(), 2);
    }
}
