use std::collections::VecDeque;

use super::{GraphicsSnapshot, PhysicsSnapshot, SimError, TelemetrySource};

/// Telemetry source driven from a pre-recorded script.
///
/// Open attempts fail `refused_opens` times before succeeding; reads hand
/// out queued snapshots and fail once the queue runs dry.
#[derive(Debug, Default)]
pub struct ScriptedTelemetry {
    refused_opens: usize,
    snapshots: VecDeque<(PhysicsSnapshot, GraphicsSnapshot)>,
}

impl ScriptedTelemetry {
    /// Creates an empty script that opens immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` open attempts fail.
    #[must_use]
    pub fn refusing_opens(mut self, count: usize) -> Self {
        self.refused_opens = count;
        self
    }

    /// Appends one snapshot pair to the script.
    #[must_use]
    pub fn with_snapshot(mut self, physics: PhysicsSnapshot, graphics: GraphicsSnapshot) -> Self {
        self.snapshots.push_back((physics, graphics));
        self
    }

    /// Appends `count` copies of one snapshot pair.
    #[must_use]
    pub fn with_snapshots(
        mut self,
        count: usize,
        physics: PhysicsSnapshot,
        graphics: GraphicsSnapshot,
    ) -> Self {
        for _ in 0..count {
            self.snapshots.push_back((physics, graphics));
        }
        self
    }
}

impl TelemetrySource for ScriptedTelemetry {
    fn try_open(&mut self) -> bool {
        if self.refused_opens > 0 {
            self.refused_opens -= 1;
            return false;
        }
        true
    }

    fn read_snapshot(&mut self) -> Result<(PhysicsSnapshot, GraphicsSnapshot), SimError> {
        self.snapshots.pop_front().ok_or(SimError::Unavailable)
    }
}
