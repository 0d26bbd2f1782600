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

//! Small task-bookkeeping primitives shared by the evaluator and the
//! balancer: an in-flight counter with RAII accounting, an order-preserving
//! dispatch collector, and a cooperative shutdown coordinator.

mod counter;
mod dispatch;
mod shutdown;

pub use counter::{InFlightGuard, TaskCounter};
pub use dispatch::OrderedDispatch;
pub use shutdown::Shutdown;
