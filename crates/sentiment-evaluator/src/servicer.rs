//! The evaluator's gRPC-facing surface: wraps a
//! `sentiment_model::Evaluator` and a `DeviceMemory` behind the generated
//! `Evaluator` service trait.

use std::sync::{Arc, Mutex};

use sentiment_model::{DeviceMemory, Evaluator as ModelEvaluator};
use sentiment_proto::evaluator::evaluator_server::Evaluator as EvaluatorService;
use sentiment_proto::evaluator::{
    GetScoresRequest, GetScoresResponse, HeartbeatRequest, HeartbeatResponse,
    LastEvaluation as ProtoLastEvaluation, Score,
};
use sentiment_task::TaskCounter;
use tonic::{Request, Response, Status};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::monitor::VramMonitor;

/// Backs a single evaluator node: one scorer, one device-memory reporter,
/// one process-lifetime identity.
///
/// Holds the worker's id and in-flight counter on the struct itself rather
/// than anywhere global, per the "no true globals" decision in the design
/// notes — a process hosting this servicer has exactly one identity, bound
/// at construction.
pub struct EvaluatorServicer {
    id: String,
    scorer: Arc<dyn ModelEvaluator>,
    device: Arc<dyn DeviceMemory>,
    tasks: TaskCounter,
    last_evaluation: Mutex<Option<sentiment_model::LastEvaluation>>,
}

impl EvaluatorServicer {
    /// Builds a servicer with a freshly generated v4 identity.
    #[must_use]
    pub fn new(scorer: Arc<dyn ModelEvaluator>, device: Arc<dyn DeviceMemory>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            scorer,
            device,
            tasks: TaskCounter::new(),
            last_evaluation: Mutex::new(None),
        }
    }

    fn last_evaluation(&self) -> Option<sentiment_model::LastEvaluation> {
        *self.last_evaluation.lock().expect("last evaluation lock poisoned")
    }
}

#[tonic::async_trait]
impl EvaluatorService for EvaluatorServicer {
    /// Pure read: reports current in-flight tasks, device memory, identity,
    /// and the most recently completed batch's low-water figure. Never
    /// mutates any of the state it reports, so two calls back to back on an
    /// idle worker are identical.
    async fn heartbeat(
        &self,
        _request: Request<HeartbeatRequest>,
    ) -> Result<Response<HeartbeatResponse>, Status> {
        let snapshot = self.device.snapshot();
        Ok(Response::new(HeartbeatResponse {
            tasks: u64::try_from(self.tasks.current().max(0)).unwrap_or(0),
            free_vram: snapshot.free,
            total_vram: snapshot.total,
            id: self.id.clone(),
            last_evaluation: self
                .last_evaluation()
                .map(|last| ProtoLastEvaluation { tasks: last.tasks, free_vram: last.free_vram }),
        }))
    }

    /// Scores a batch of phrases. An empty batch returns `ok: true` with no
    /// scores and never touches the scorer or the task counter — the same
    /// short-circuit the underlying model itself applies to an empty slice,
    /// surfaced here so a client never pays for a round trip through the
    /// scorer for no phrases.
    async fn get_scores(
        &self,
        request: Request<GetScoresRequest>,
    ) -> Result<Response<GetScoresResponse>, Status> {
        let phrases: Vec<String> =
            request.into_inner().phrases.into_iter().map(|phrase| phrase.content).collect();

        if phrases.is_empty() {
            return Ok(Response::new(GetScoresResponse { ok: true, err_msg: String::new(), scores: Vec::new() }));
        }

        let _guard = self.tasks.begin(phrases.len() as u64);
        let monitor = VramMonitor::spawn(Arc::clone(&self.device));

        let scorer = Arc::clone(&self.scorer);
        let span = info_span!("get_scores", phrases = phrases.len());
        let outcome = async move { scorer.evaluate(&phrases).await }.instrument(span).await;

        let low_water = monitor.stop().await;

        match outcome {
            Ok(evaluations) => {
                let scores = evaluations
                    .into_iter()
                    .map(|evaluation| Score {
                        positivity: evaluation.positive(),
                        negativity: evaluation.negative(),
                        neutrality: evaluation.neutral(),
                    })
                    .collect::<Vec<_>>();
                let mut last = self.last_evaluation.lock().expect("last evaluation lock poisoned");
                *last = Some(sentiment_model::LastEvaluation {
                    tasks: scores.len() as u64,
                    free_vram: low_water,
                });
                drop(last);
                Ok(Response::new(GetScoresResponse { ok: true, err_msg: String::new(), scores }))
            }
            Err(error) => Ok(Response::new(GetScoresResponse {
                ok: false,
                err_msg: error.to_string(),
                scores: Vec::new(),
            })),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sentiment_model::test_double::{ScriptedEvaluator, ScriptedOutcome};
    use sentiment_model::Evaluation;

    fn device() -> Arc<dyn DeviceMemory> {
        Arc::new(crate::vram::AcceleratorMemory::new(1000, 900))
    }

    #[tokio::test]
    async fn empty_batch_is_ok_and_never_touches_the_scorer() {
        let scorer = Arc::new(ScriptedEvaluator::new(vec![ScriptedOutcome::Err("should not run".into())]));
        let servicer = EvaluatorServicer::new(scorer, device());

        let response = servicer
            .get_scores(Request::new(GetScoresRequest { phrases: Vec::new() }))
            .await
            .unwrap()
            .into_inner();

        assert!(response.ok);
        assert!(response.scores.is_empty());
    }

    #[tokio::test]
    async fn tasks_returns_to_zero_after_a_successful_batch() {
        let scorer = Arc::new(ScriptedEvaluator::constant(Evaluation::new(0.8, 0.1, 0.1)));
        let servicer = EvaluatorServicer::new(scorer, device());

        let request = GetScoresRequest { phrases: vec![sentiment_proto::evaluator::Phrase { content: "ok".into() }] };
        let response = servicer.get_scores(Request::new(request)).await.unwrap().into_inner();

        assert!(response.ok);
        assert_eq!(servicer.tasks.current(), 0);
    }

    #[tokio::test]
    async fn tasks_returns_to_zero_after_a_failed_batch() {
        let scorer = Arc::new(ScriptedEvaluator::new(vec![ScriptedOutcome::Err("scorer exploded".into())]));
        let servicer = EvaluatorServicer::new(scorer, device());

        let request = GetScoresRequest { phrases: vec![sentiment_proto::evaluator::Phrase { content: "bad".into() }] };
        let response = servicer.get_scores(Request::new(request)).await.unwrap().into_inner();

        assert!(!response.ok);
        assert_eq!(response.err_msg, "scorer exploded");
        assert_eq!(servicer.tasks.current(), 0);
    }

    #[tokio::test]
    async fn heartbeat_is_idempotent_on_an_idle_worker() {
        let scorer = Arc::new(ScriptedEvaluator::constant(Evaluation::new(1.0, 0.0, 0.0)));
        let servicer = EvaluatorServicer::new(scorer, device());

        let first = servicer.heartbeat(Request::new(HeartbeatRequest {})).await.unwrap().into_inner();
        let second = servicer.heartbeat(Request::new(HeartbeatRequest {})).await.unwrap().into_inner();

        assert_eq!(first.tasks, 0);
        assert_eq!(second.tasks, 0);
        assert_eq!(first.id, second.id);
    }
}
