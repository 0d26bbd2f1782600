//! The balancer's view of a single configured worker.

use sentiment_model::LastEvaluation;

/// The balancer's cached view of one configured subnode address.
///
/// One instance exists per address passed on the command line, for the
/// lifetime of the process — the balancer never discovers or forgets
/// workers (§2's "no worker auto-discovery" non-goal), it only refreshes
/// what it already knows about them.
#[derive(Debug, Clone)]
pub struct WorkerDescriptor {
    /// The worker's dial address, as configured at startup.
    pub address: String,
    /// The worker's reported identity, or `None` before the first
    /// successful heartbeat. A worker with no id is never dispatched to.
    pub id: Option<String>,
    /// In-flight task count as of the last heartbeat. `-1` means unknown
    /// (no successful heartbeat has landed yet).
    pub tasks: i64,
    /// Free VRAM as of the last heartbeat, in bytes.
    pub free_vram: u64,
    /// Total VRAM as of the last heartbeat, in bytes.
    pub total_vram: u64,
    /// Free VRAM observed while the worker was last known idle
    /// (`tasks == 0`). Recomputed only on the heartbeat that first
    /// observes idleness; `idle_vram <= total_vram - free_vram` once set.
    pub idle_vram: u64,
    /// The worker's most recently completed batch, if it has reported one.
    pub last_evaluation: Option<LastEvaluation>,
}

impl WorkerDescriptor {
    /// Creates a descriptor for a configured address before any heartbeat
    /// has been observed.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            id: None,
            tasks: -1,
            free_vram: 0,
            total_vram: 0,
            idle_vram: 0,
            last_evaluation: None,
        }
    }

    /// Whether this worker is eligible for dispatch: it must have reported
    /// an identity at least once.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_descriptor_is_unknown() {
        let descriptor = WorkerDescriptor::new("127.0.0.1:9000");
        assert!(!descriptor.is_known());
        assert_eq!(descriptor.tasks, -1);
    }
}
