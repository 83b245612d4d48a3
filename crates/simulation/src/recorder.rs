//! Snapshot recording.

use crate::RepairState;
use repairsim_types::Snapshot;

/// Appends a [`Snapshot`] of the repair state on request.
///
/// A disabled recorder ignores every call and its log stays empty. The
/// recorder only reads the state it is given.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    enabled: bool,
    log: Vec<Snapshot>,
}

impl SnapshotRecorder {
    /// Create a recorder.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            log: Vec::new(),
        }
    }

    /// Whether snapshots are being captured.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the current state, if enabled.
    pub fn record(&mut self, state: &RepairState) {
        if self.enabled {
            self.log.push(state.snapshot());
        }
    }

    /// Snapshots recorded so far, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.log
    }

    /// Consume the recorder, returning its log.
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.log
    }
}
