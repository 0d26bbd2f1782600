//! A scripted [`Evaluator`] used by the balancer's and evaluator's test
//! suites so scheduling and admission logic can be exercised without a GPU
//! or a real embedding model.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Evaluation, Evaluator, EvaluatorError};

/// An [`Evaluator`] whose responses are scripted ahead of time.
///
/// Each call to [`Evaluator::evaluate`] consumes one scripted outcome in
/// order; calling it more times than outcomes were scripted panics, which is
/// intentional for tests (it means the test under-specified its script).
pub struct ScriptedEvaluator {
    outcomes: Mutex<Vec<ScriptedOutcome>>,
}

/// One scripted response to a `evaluate` call.
pub enum ScriptedOutcome {
    /// Respond with these evaluations (one must be provided per phrase the
    /// caller passes in, and the test double does not check that itself).
    Ok(Vec<Evaluation>),
    /// Respond with this scoring failure.
    Err(String),
}

impl ScriptedEvaluator {
    /// Builds a scorer that plays back `outcomes` in order, one per call.
    #[must_use]
    pub fn new(outcomes: Vec<ScriptedOutcome>) -> Self {
        Self { outcomes: Mutex::new(outcomes) }
    }

    /// Builds a scorer that always returns the same fixed evaluation for
    /// every phrase in every call.
    #[must_use]
    pub fn constant(evaluation: Evaluation) -> ConstantEvaluator {
        ConstantEvaluator { evaluation }
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn evaluate(&self, phrases: &[String]) -> Result<Vec<Evaluation>, EvaluatorError> {
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let outcome = self
            .outcomes
            .lock()
            .expect("scripted evaluator lock poisoned")
            .pop()
            .expect("ScriptedEvaluator ran out of scripted outcomes");

        match outcome {
            ScriptedOutcome::Ok(evals) => Ok(evals),
            ScriptedOutcome::Err(message) => Err(EvaluatorError::new(message)),
        }
    }
}

/// A scorer that always returns the same evaluation for every phrase,
/// regardless of how many calls are made.
pub struct ConstantEvaluator {
    evaluation: Evaluation,
}

#[async_trait]
impl Evaluator for ConstantEvaluator {
    async fn evaluate(&self, phrases: &[String]) -> Result<Vec<Evaluation>, EvaluatorError> {
        Ok(phrases.iter().map(|_| self.evaluation).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn constant_evaluator_repeats_for_every_phrase() {
        let evaluator = ScriptedEvaluator::constant(Evaluation::new(0.1, 0.2, 0.7));
        let scores = evaluator
            .evaluate(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|s| *s == Evaluation::new(0.1, 0.2, 0.7)));
    }

    #[tokio::test]
    async fn scripted_evaluator_plays_back_in_order() {
        // Outcomes are popped from the back, so the script is written in
        // reverse call order.
        let evaluator = ScriptedEvaluator::new(vec![
            ScriptedOutcome::Err("OOM".to_string()),
            ScriptedOutcome::Ok(vec![Evaluation::new(0.9, 0.05, 0.05)]),
        ]);

        let first = evaluator.evaluate(&["good".to_string()]).await.unwrap();
        assert_eq!(first, vec![Evaluation::new(0.9, 0.05, 0.05)]);

        let second = evaluator.evaluate(&["bad".to_string()]).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn empty_input_never_consumes_a_scripted_outcome() {
        let evaluator = ScriptedEvaluator::new(vec![]);
        let scores = evaluator.evaluate(&[]).await.unwrap();
        assert!(scores.is_empty());
    }
}
