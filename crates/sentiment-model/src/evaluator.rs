//! The scorer capability.

use async_trait::async_trait;

use crate::Evaluation;

/// Error returned by a failed scoring attempt.
///
/// This is deliberately a single opaque-message variant: the balancer and the
/// RPC surface only ever need the human-readable reason, never to match on a
/// specific cause.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{0}")]
pub struct EvaluatorError(pub String);

impl EvaluatorError {
    /// Builds an evaluator error from any displayable cause.
    pub fn new(cause: impl ToString) -> Self {
        Self(cause.to_string())
    }
}

/// Capability implemented by anything that can turn phrases into sentiment
/// scores.
///
/// Callers (the evaluator servicer, tests) hold this behind `Box<dyn
/// Evaluator>` or `Arc<dyn Evaluator>` and never see the concrete scorer type
/// — the real model and the test double are interchangeable.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Scores each phrase, returning one evaluation per input phrase in the
    /// same order. An empty input returns an empty output without touching
    /// the underlying model.
    async fn evaluate(&self, phrases: &[String]) -> Result<Vec<Evaluation>, EvaluatorError>;
}
