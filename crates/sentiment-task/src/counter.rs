//! In-flight task accounting for the evaluator's admission logic.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Tracks the number of phrases currently being scored.
///
/// The balancer treats `tasks == 0` as the gate for baseline-VRAM
/// calibration, so this counter must be correct on every exit path of
/// `GetScores` — including a scorer panic or error, not only the success
/// path. [`TaskCounter::begin`] returns an RAII guard that decrements on
/// drop, so the accounting cannot be short-circuited by an early return or an
/// unwinding panic the way a hand-written increment/decrement pair could be.
#[derive(Clone, Default)]
pub struct TaskCounter {
    inner: Arc<AtomicI64>,
}

impl TaskCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current in-flight count.
    #[must_use]
    pub fn current(&self) -> i64 {
        self.inner.load(Ordering::SeqCst)
    }

    /// Begins accounting for `count` in-flight phrases. The returned guard
    /// must be held until the batch finishes scoring (success or failure);
    /// dropping it releases the count.
    #[must_use]
    pub fn begin(&self, count: u64) -> InFlightGuard {
        let delta = i64::try_from(count).unwrap_or(i64::MAX);
        let _ = self.inner.fetch_add(delta, Ordering::SeqCst);
        InFlightGuard { counter: self.inner.clone(), delta }
    }
}

/// RAII guard returned by [`TaskCounter::begin`]. Decrements the counter by
/// the same amount it incremented it, on drop.
pub struct InFlightGuard {
    counter: Arc<AtomicI64>,
    delta: i64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let _ = self.counter.fetch_sub(self.delta, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counter_returns_to_zero_after_guard_drops() {
        let counter = TaskCounter::new();
        assert_eq!(counter.current(), 0);
        {
            let _guard = counter.begin(3);
            assert_eq!(counter.current(), 3);
        }
        assert_eq!(counter.current(), 0);
    }

    #[test]
    fn counter_returns_to_zero_even_on_unwind() {
        let counter = TaskCounter::new();
        let counter_for_closure = counter.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = counter_for_closure.begin(2);
            panic!("scorer exploded");
        });
        assert!(result.is_err());
        assert_eq!(counter.current(), 0);
    }

    #[test]
    fn empty_batch_does_not_move_the_counter() {
        let counter = TaskCounter::new();
        let _guard = counter.begin(0);
        assert_eq!(counter.current(), 0);
    }
}
