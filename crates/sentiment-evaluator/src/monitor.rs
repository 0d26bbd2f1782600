//! Background low-water tracking of an evaluator's free device memory
//! across the lifetime of a single `GetScores` call.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sentiment_model::DeviceMemory;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running low-water monitor.
///
/// Grounded in the same signal-driven teardown used by
/// `Thoralf-M-iota`'s worker pool: a `CancellationToken` stops the sampling
/// loop, and the caller joins the handle to be sure the final sample has
/// landed before trusting the minimum.
pub struct VramMonitor {
    token: CancellationToken,
    handle: JoinHandle<u64>,
}

impl VramMonitor {
    /// Spawns a task that samples `device.snapshot().free` every
    /// [`SAMPLE_INTERVAL`] and tracks the minimum observed.
    pub fn spawn(device: Arc<dyn DeviceMemory>) -> Self {
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let minimum = Arc::new(Mutex::new(device.snapshot().free));

        let handle = tokio::spawn({
            let minimum = Arc::clone(&minimum);
            async move {
                let mut ticker = tokio::time::interval(SAMPLE_INTERVAL);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            record(&minimum, device.snapshot().free);
                        }
                        () = loop_token.cancelled() => {
                            // One last sample after cancellation is observed,
                            // so a monitor stopped right after a drop in
                            // free memory still reflects it.
                            record(&minimum, device.snapshot().free);
                            break;
                        }
                    }
                }
                *minimum.lock().expect("vram monitor lock poisoned")
            }
        });

        Self { token, handle }
    }

    /// Stops the sampling loop and returns the minimum free-memory reading
    /// observed over the monitor's lifetime, including one final sample
    /// taken after cancellation.
    pub async fn stop(self) -> u64 {
        self.token.cancel();
        self.handle.await.unwrap_or(0)
    }
}

fn record(minimum: &Arc<Mutex<u64>>, sample: u64) {
    let mut guard = minimum.lock().expect("vram monitor lock poisoned");
    if sample < *guard {
        *guard = sample;
    }
}
