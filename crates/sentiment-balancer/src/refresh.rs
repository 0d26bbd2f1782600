//! The balancer's periodically-refreshed view of its worker pool.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use sentiment_proto::evaluator::evaluator_client::EvaluatorClient;
use sentiment_proto::evaluator::HeartbeatRequest;
use tonic::transport::Channel;
use tracing::{info, warn};

use crate::descriptor::WorkerDescriptor;
use crate::error::BalancerError;

/// How long a previous refresh remains trustworthy before a new one is
/// forced, regardless of the `force` flag.
const REFRESH_TTL: Duration = Duration::from_secs(30);

/// The balancer's cached worker descriptors and the live channels behind
/// them, refreshed on a TTL with an escape hatch for callers that need a
/// guaranteed-fresh read.
pub struct WorkerPool {
    own_id: String,
    workers: Vec<WorkerDescriptor>,
    clients: Vec<EvaluatorClient<Channel>>,
    last_refresh: Option<Instant>,
}

impl WorkerPool {
    /// Builds a pool from configured addresses and their already-dialed
    /// (lazily-connecting) channels, in configuration order.
    #[must_use]
    pub fn new(own_id: impl Into<String>, addresses: &[String], channels: Vec<Channel>) -> Self {
        let workers = addresses.iter().map(WorkerDescriptor::new).collect();
        let clients = channels.into_iter().map(EvaluatorClient::new).collect();
        Self { own_id: own_id.into(), workers, clients, last_refresh: None }
    }

    /// The current worker descriptors, in configuration order.
    #[must_use]
    pub fn workers(&self) -> &[WorkerDescriptor] {
        &self.workers
    }

    /// Refreshes every non-excepted worker's descriptor via a sequential
    /// heartbeat poll in configuration order, unless the last refresh is
    /// still within [`REFRESH_TTL`] and `force` is `false`.
    ///
    /// Aborts on the first unreachable or loop-backed worker without
    /// polling the rest — heartbeat polling order matters for this
    /// fail-fast behavior, so it deliberately is not parallelized the way
    /// dispatch is.
    pub async fn refresh(
        &mut self,
        exceptions: &HashSet<String>,
        force: bool,
    ) -> Result<(), BalancerError> {
        if !force {
            if let Some(last) = self.last_refresh {
                if last.elapsed() < REFRESH_TTL {
                    return Ok(());
                }
            }
        }

        for index in 0..self.workers.len() {
            let address = self.workers[index].address.clone();
            if exceptions.contains(&address) {
                continue;
            }

            let response = self.clients[index]
                .heartbeat(HeartbeatRequest {})
                .await
                .map_err(|status| {
                    warn!(%address, %status, "subnode unreachable during refresh");
                    BalancerError::SubnodeUnavailable(address.clone())
                })?
                .into_inner();

            if response.id == self.own_id {
                warn!(%address, "subnode reported the balancer's own id");
                return Err(BalancerError::LoopBack(address));
            }

            let worker = &mut self.workers[index];
            worker.id = Some(response.id);
            worker.tasks = i64::try_from(response.tasks).unwrap_or(i64::MAX);
            worker.free_vram = response.free_vram;
            worker.total_vram = response.total_vram;
            worker.last_evaluation = response
                .last_evaluation
                .map(|last| sentiment_model::LastEvaluation { tasks: last.tasks, free_vram: last.free_vram });

            if response.tasks == 0 {
                worker.idle_vram = worker.total_vram.saturating_sub(worker.free_vram);
            }

            info!(%address, tasks = worker.tasks, free_vram = worker.free_vram, "refreshed subnode");
        }

        self.last_refresh = Some(Instant::now());
        Ok(())
    }

    /// Returns the client for the worker at `address`, if still configured.
    pub fn client_for(&mut self, address: &str) -> Option<&mut EvaluatorClient<Channel>> {
        let index = self.workers.iter().position(|worker| worker.address == address)?;
        Some(&mut self.clients[index])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_pool_has_no_known_workers() {
        let pool = WorkerPool::new("balancer-id", &["127.0.0.1:1".to_string()], vec![
            Channel::from_static("http://127.0.0.1:1").connect_lazy(),
        ]);
        assert!(!pool.workers()[0].is_known());
    }
}
