//! The evaluator's two memory-reporting strategies.

use sentiment_model::{DeviceMemory, MemorySnapshot};
use std::sync::Mutex;
use sysinfo::System;

/// Reports host RAM, used when the scorer is not resident on an
/// accelerator. Backed by `sysinfo`, which already walks `/proc` (or the
/// platform equivalent) to produce these figures — reimplementing that by
/// hand would just be a worse version of what the crate does.
pub struct HostMemory {
    system: Mutex<System>,
}

impl HostMemory {
    /// Creates a host-memory reporter, performing the first refresh eagerly.
    #[must_use]
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        Self { system: Mutex::new(system) }
    }
}

impl Default for HostMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceMemory for HostMemory {
    fn snapshot(&self) -> MemorySnapshot {
        let mut system = self.system.lock().expect("host memory lock poisoned");
        system.refresh_memory();
        MemorySnapshot { total: system.total_memory(), free: system.available_memory() }
    }
}

/// Reports the memory of an accelerator device the scorer is resident on.
///
/// No CUDA/ROCm driver crate is part of this workspace's dependency stack,
/// so this is a thin seam: a real build would source `total`/`free` from the
/// device driver at construction and refresh them here; until then it
/// reports a fixed reading, which is enough for the balancer's admission
/// algorithm (and for tests) to exercise the "resident on an accelerator"
/// case.
pub struct AcceleratorMemory {
    total: u64,
    free: Mutex<u64>,
}

impl AcceleratorMemory {
    /// Creates an accelerator-memory reporter from a fixed total/free
    /// reading.
    #[must_use]
    pub fn new(total: u64, free: u64) -> Self {
        Self { total, free: Mutex::new(free) }
    }

    /// Updates the free-memory reading, as a stand-in for re-querying the
    /// device driver.
    pub fn set_free(&self, free: u64) {
        *self.free.lock().expect("accelerator memory lock poisoned") = free;
    }
}

impl DeviceMemory for AcceleratorMemory {
    fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot { total: self.total, free: *self.free.lock().expect("accelerator memory lock poisoned") }
    }
}
