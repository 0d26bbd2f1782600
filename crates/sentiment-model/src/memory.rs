//! Device-memory reporting.
//!
//! The evaluator only ever needs a comparative reading of how much memory is
//! free versus how much exists in total, on whichever device the scorer is
//! resident on. This is modeled as a capability so the two cases in the
//! specification — an accelerator device, or host memory as a fallback — are
//! two implementations of one trait rather than a branch sprinkled through
//! the servicer.

/// A total/free memory reading. Both fields use the same unit; the balancer
/// only ever compares figures from the same worker against each other, so the
/// unit itself is never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    /// Total memory capacity.
    pub total: u64,
    /// Memory currently available to this process.
    pub free: u64,
}

/// Capability for reading a point-in-time memory snapshot.
pub trait DeviceMemory: Send + Sync {
    /// Returns the current total/free reading.
    fn snapshot(&self) -> MemorySnapshot;
}
