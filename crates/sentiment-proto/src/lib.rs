#![allow(missing_docs)] // generated code

//! Generated `tonic`/`prost` types for the `Evaluator` gRPC service. Nothing
//! in this crate is hand-written; domain <-> wire conversions live in
//! `sentiment-evaluator` and `sentiment-balancer`, which each depend on this
//! crate and on `sentiment-model`.

/// Generated message and service types for the `evaluator` proto package.
pub mod evaluator {
    tonic::include_proto!("evaluator");
}
