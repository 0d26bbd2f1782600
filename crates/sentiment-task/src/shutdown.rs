//! Cooperative shutdown shared by the evaluator's VRAM monitor and the
//! balancer's per-worker channels.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// A cancellation token paired with a bounded grace period.
///
/// Signal cancellation, then wait up to a bound for whichever futures a
/// caller hands it to finish draining, rather than hanging on them forever.
#[derive(Clone)]
pub struct Shutdown {
    token: CancellationToken,
    grace: Duration,
}

impl Shutdown {
    /// Creates a new shutdown coordinator with the given grace period.
    #[must_use]
    pub fn new(grace: Duration) -> Self {
        Self { token: CancellationToken::new(), grace }
    }

    /// Returns a clone of the underlying cancellation token, e.g. to pass to
    /// a spawned task that should observe cancellation.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Requests shutdown. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Resolves once [`Shutdown::cancel`] has been called.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }

    /// Races `fut` against the grace period, starting only after
    /// cancellation has been requested. Returns `Some` if `fut` completed in
    /// time, `None` if the grace period elapsed first.
    pub async fn drain<F, T>(&self, fut: F) -> Option<T>
    where
        F: std::future::Future<Output = T>,
    {
        self.cancelled().await;
        tokio::time::timeout(self.grace, fut).await.ok()
    }
}
