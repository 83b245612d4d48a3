//! Point-in-time records of the repair system.

use crate::SimTime;
use serde::{Deserialize, Serialize};

/// Observable state of the repair system right after an event.
///
/// An idle repair server is recorded as `next_repair_completion: None`,
/// which is the "infinite" completion time. Serialized traces carry it as
/// `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated time of the snapshot.
    pub time: SimTime,

    /// Units currently failed, waiting or in service.
    pub down: usize,

    /// Failed units waiting for the repair server.
    pub repair_queue_len: usize,

    /// Completion time of the unit in service, if the server is busy.
    pub next_repair_completion: Option<SimTime>,
}

impl Snapshot {
    /// Whether the repair server was busy.
    pub fn repair_in_progress(&self) -> bool {
        self.next_repair_completion.is_some()
    }

    /// Completion time of the unit in service, `f64::INFINITY` when idle.
    pub fn next_repair_time(&self) -> SimTime {
        self.next_repair_completion.unwrap_or(f64::INFINITY)
    }

    /// Units in service: zero or one.
    pub fn in_service(&self) -> usize {
        usize::from(self.repair_in_progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_snapshot() {
        let snap = Snapshot {
            time: 0.0,
            down: 0,
            repair_queue_len: 0,
            next_repair_completion: None,
        };
        assert!(!snap.repair_in_progress());
        assert_eq!(snap.in_service(), 0);
        assert!(snap.next_repair_time().is_infinite());
    }

    #[test]
    fn test_busy_snapshot_roundtrips_through_json() {
        let snap = Snapshot {
            time: 4.0,
            down: 2,
            repair_queue_len: 1,
            next_repair_completion: Some(7.0),
        };
        assert!(snap.repair_in_progress());
        assert_eq!(snap.next_repair_time(), 7.0);

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
