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

//! Core data model shared by the evaluator and the load balancer: the
//! closed sentiment enumeration, immutable per-phrase evaluations, the
//! scorer capability, and device-memory reporting.
//!
//! Nothing in this crate knows about RPC, tonic, or gRPC — it is pure domain
//! model, deliberately reusable on both sides of the wire.

mod evaluation;
mod evaluator;
mod last_evaluation;
mod memory;
mod sentiment;

pub mod test_double;

pub use evaluation::{Evaluation, Phrase};
pub use evaluator::{Evaluator, EvaluatorError};
pub use last_evaluation::LastEvaluation;
pub use memory::{DeviceMemory, MemorySnapshot};
pub use sentiment::{Sentiment, SentimentParseError};
