//! The balancer's gRPC-facing surface: from a client's point of view this
//! is a drop-in replacement for a single evaluator node, backed by a pool
//! of them.

use std::collections::HashSet;

use sentiment_proto::evaluator::evaluator_client::EvaluatorClient;
use sentiment_proto::evaluator::evaluator_server::Evaluator as EvaluatorService;
use sentiment_proto::evaluator::{
    GetScoresRequest, GetScoresResponse, HeartbeatRequest, HeartbeatResponse, Phrase,
};
use sentiment_task::OrderedDispatch;
use tokio::sync::Mutex;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};
use tracing::warn;
use uuid::Uuid;

use crate::allocation::choose_allocation;
use crate::refresh::WorkerPool;

/// Backs the load balancer: one pool of worker channels/descriptors behind
/// the same `Evaluator` surface a single node exposes.
pub struct BalancerServicer {
    id: String,
    pool: Mutex<WorkerPool>,
}

impl BalancerServicer {
    /// Builds a balancer servicer fronting the given channels, one per
    /// configured subnode address, in configuration order.
    #[must_use]
    pub fn new(addresses: Vec<String>, channels: Vec<Channel>) -> Self {
        let id = Uuid::new_v4().to_string();
        let pool = WorkerPool::new(id.clone(), &addresses, channels);
        Self { id, pool: Mutex::new(pool) }
    }
}

#[tonic::async_trait]
impl EvaluatorService for BalancerServicer {
    /// TTL-gated refresh, then an elementwise sum of `tasks`/`free_vram`/
    /// `total_vram` across every configured worker. Documented as
    /// undefined/best-effort when any worker is unreachable: refresh still
    /// aborts on the first unreachable worker for this path (unlike
    /// `get_scores`, which compensates with an exception set), so the
    /// aggregate reported here may reflect a stale view of the workers
    /// after the failure point.
    async fn heartbeat(
        &self,
        _request: Request<HeartbeatRequest>,
    ) -> Result<Response<HeartbeatResponse>, Status> {
        let mut pool = self.pool.lock().await;
        if let Err(error) = pool.refresh(&HashSet::new(), false).await {
            warn!(%error, "heartbeat refresh did not complete for every subnode");
        }

        let (mut tasks, mut free_vram, mut total_vram) = (0i64, 0u64, 0u64);
        for worker in pool.workers() {
            tasks = tasks.saturating_add(worker.tasks.max(0));
            free_vram = free_vram.saturating_add(worker.free_vram);
            total_vram = total_vram.saturating_add(worker.total_vram);
        }

        Ok(Response::new(HeartbeatResponse {
            tasks: u64::try_from(tasks).unwrap_or(0),
            free_vram,
            total_vram,
            id: self.id.clone(),
            last_evaluation: None,
        }))
    }

    /// Splits the batch across the pool and dispatches each chunk
    /// concurrently, recomputing the worker view and allocation whenever a
    /// subnode turns out to be unreachable, and aborting the whole request
    /// the moment any chunk reports a scoring failure.
    ///
    /// The outer loop runs until every phrase has been dispatched and
    /// collected: a single allocation round may fall short of the full
    /// batch (every eligible worker's predicted capacity summed to less
    /// than the phrase count), in which case the remaining, not-yet-sent
    /// phrases carry over into another forced-refresh round rather than
    /// being silently dropped.
    async fn get_scores(
        &self,
        request: Request<GetScoresRequest>,
    ) -> Result<Response<GetScoresResponse>, Status> {
        let phrases: Vec<String> =
            request.into_inner().phrases.into_iter().map(|phrase| phrase.content).collect();

        if phrases.is_empty() {
            return Ok(Response::new(GetScoresResponse { ok: true, err_msg: String::new(), scores: Vec::new() }));
        }

        let mut exceptions: HashSet<String> = HashSet::new();
        let mut results: Vec<sentiment_proto::evaluator::Score> = Vec::new();
        let mut remaining: Vec<String> = phrases.clone();

        while results.len() < phrases.len() {
            let force = !results.is_empty();
            let mut pool = self.pool.lock().await;
            match pool.refresh(&exceptions, force).await {
                Ok(()) => {}
                Err(error @ (crate::error::BalancerError::SubnodeUnavailable(_)
                | crate::error::BalancerError::LoopBack(_))) => {
                    warn!(%error, "excluding subnode from this request");
                    let address = match error {
                        crate::error::BalancerError::SubnodeUnavailable(address)
                        | crate::error::BalancerError::LoopBack(address) => address,
                        crate::error::BalancerError::NoAvailableWorker => unreachable!(),
                    };
                    let _ = exceptions.insert(address);
                }
                Err(crate::error::BalancerError::NoAvailableWorker) => {}
            }

            let allocation = choose_allocation(pool.workers(), phrases.len() as u64, &exceptions);
            if allocation.is_empty() {
                return Ok(Response::new(GetScoresResponse {
                    ok: false,
                    err_msg: "no available worker".to_string(),
                    scores: Vec::new(),
                }));
            }

            let mut dispatch = OrderedDispatch::new();
            for chunk in &allocation {
                if remaining.is_empty() {
                    break;
                }
                let take = (chunk.count as usize).min(remaining.len());
                if take == 0 {
                    continue;
                }
                let slice: Vec<String> = remaining.drain(..take).collect();

                let mut client: EvaluatorClient<Channel> = pool
                    .client_for(&chunk.address)
                    .expect("allocation only names configured workers")
                    .clone();

                dispatch.push(tokio::spawn(async move {
                    let request = GetScoresRequest {
                        phrases: slice.into_iter().map(|content| Phrase { content }).collect(),
                    };
                    client.get_scores(Request::new(request)).await.map(Response::into_inner)
                }));
            }
            drop(pool);

            // Results are collected in dispatch (== phrase) order; sibling
            // chunks past the first failure have already been spawned and
            // run to completion in the background, but their output is
            // never merged into the response once an earlier chunk has
            // failed.
            for outcome in dispatch.collect().await {
                match outcome {
                    Ok(Ok(response)) if response.ok => results.extend(response.scores),
                    Ok(Ok(response)) => {
                        return Ok(Response::new(GetScoresResponse {
                            ok: false,
                            err_msg: response.err_msg,
                            scores: Vec::new(),
                        }));
                    }
                    Ok(Err(status)) => {
                        return Ok(Response::new(GetScoresResponse {
                            ok: false,
                            err_msg: status.message().to_string(),
                            scores: Vec::new(),
                        }));
                    }
                    Err(join_error) => {
                        return Ok(Response::new(GetScoresResponse {
                            ok: false,
                            err_msg: join_error.to_string(),
                            scores: Vec::new(),
                        }));
                    }
                }
            }
        }

        Ok(Response::new(GetScoresResponse { ok: true, err_msg: String::new(), scores: results }))
    }
}
