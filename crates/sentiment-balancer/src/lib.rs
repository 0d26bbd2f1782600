#![deny(
    trivial_numeric_casts,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    unused_results
)]
#![warn(rust_2021_compatibility, unreachable_pub)]

//! The load balancer: a VRAM-aware view of a pool of evaluator nodes,
//! fronting them behind the same gRPC surface a single node exposes.

mod allocation;
mod channel;
mod descriptor;
mod error;
mod refresh;
mod servicer;

pub use allocation::{choose_allocation, Allocation};
pub use channel::{build_channel, secure_subnode_tls};
pub use descriptor::WorkerDescriptor;
pub use error::BalancerError;
pub use refresh::WorkerPool;
pub use servicer::BalancerServicer;
