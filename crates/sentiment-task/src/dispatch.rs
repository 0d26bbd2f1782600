//! Ordered collection of concurrently dispatched chunk requests.
//!
//! The balancer fans a batch out across several workers concurrently, but
//! must commit the `i`-th chunk's result before the `(i+1)`-th (§5 of the
//! specification). The teacher's `task::TaskManager` joins a registry of
//! tasks with a `FuturesUnordered`, which is correct when only the *set* of
//! completions matters; here the *order* is a hard contract, so the ordered
//! sibling of that same `futures` primitive is used instead.

use futures::stream::FuturesOrdered;
use futures::StreamExt;
use tokio::task::{JoinError, JoinHandle};

/// A set of in-flight dispatches, collected in submission order.
#[derive(Default)]
pub struct OrderedDispatch<T> {
    handles: FuturesOrdered<JoinHandle<T>>,
}

impl<T: 'static + Send> OrderedDispatch<T> {
    /// Creates an empty dispatch set.
    #[must_use]
    pub fn new() -> Self {
        Self { handles: FuturesOrdered::new() }
    }

    /// Registers a dispatched task. Tasks are awaited back out in the order
    /// they were pushed, regardless of completion order.
    pub fn push(&mut self, handle: JoinHandle<T>) {
        self.handles.push_back(handle);
    }

    /// Returns the number of dispatches still pending collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no dispatches are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Awaits and returns every result, in submission order.
    pub async fn collect(mut self) -> Vec<Result<T, JoinError>> {
        let mut results = Vec::with_capacity(self.handles.len());
        while let Some(result) = self.handles.next().await {
            results.push(result);
        }
        results
    }
}
