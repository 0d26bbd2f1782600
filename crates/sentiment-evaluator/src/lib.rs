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

//! The evaluator node: wraps a `sentiment_model::Evaluator` scorer and a
//! `DeviceMemory` reporter behind the generated gRPC `Evaluator` service.

mod monitor;
mod servicer;
mod vram;

pub use servicer::EvaluatorServicer;
pub use vram::{AcceleratorMemory, HostMemory};
