//! Error conditions the balancer surfaces while refreshing or dispatching.

/// Failure reaching or trusting a configured subnode.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum BalancerError {
    /// A subnode could not be reached during a refresh.
    #[error("subnode {0} unavailable")]
    SubnodeUnavailable(String),
    /// A subnode reported the balancer's own id back to it — almost always
    /// a misconfigured topology (a balancer pointed at itself, or two
    /// balancers pointed at each other). Treated the same as unreachable:
    /// not permanently blacklisted, just excluded for this request and
    /// until the next natural refresh.
    #[error("subnode {0} reported the balancer's own id (loop-back)")]
    LoopBack(String),
    /// No worker remained eligible after refresh and exceptions were
    /// applied.
    #[error("no available worker")]
    NoAvailableWorker,
}
