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

//! Process entrypoint for the sentiment serving fabric: parses the CLI
//! surface, validates credentials, and serves either a single evaluator
//! node or a load balancer fronting a pool of them.

mod placeholder_scorer;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sentiment_balancer::{build_channel, secure_subnode_tls, BalancerServicer};
use sentiment_evaluator::{EvaluatorServicer, HostMemory};
use sentiment_proto::evaluator::evaluator_server::EvaluatorServer;
use tonic::transport::{Identity, Server, ServerTlsConfig};
use tracing::{info, warn};

use placeholder_scorer::LexicalHeuristicScorer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = sentiment_config::Cli::parse();

    if sentiment_config::validate_token(&cli.token).is_err() {
        eprintln!("error: --token does not match the required shape (13+ letters/underscores)");
        std::process::exit(1);
    }

    let identity = sentiment_config::load_identity(cli.private_key.as_deref(), cli.certificate_chain.as_deref())
        .await
        .context("loading server TLS identity")?;

    let address: SocketAddr = cli.address.parse().context("parsing --address")?;
    let shutdown = sentiment_task::Shutdown::new(Duration::from_secs(10));
    let ctrl_c_shutdown = shutdown.clone();
    let _ctrl_c_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_shutdown.cancel();
        }
    });

    if cli.load_balancer {
        serve_load_balancer(&cli, address, identity, shutdown).await
    } else {
        serve_evaluator(address, identity, shutdown).await
    }
}

async fn serve_evaluator(
    address: SocketAddr,
    identity: Option<sentiment_config::Identity>,
    shutdown: sentiment_task::Shutdown,
) -> anyhow::Result<()> {
    let scorer = Arc::new(LexicalHeuristicScorer);
    let device = Arc::new(HostMemory::new());
    let servicer = EvaluatorServicer::new(scorer, device);

    let mut server = Server::builder();
    if let Some(identity) = identity {
        server = server
            .tls_config(ServerTlsConfig::new().identity(Identity::from_pem(identity.certificate_chain, identity.key)))
            .context("configuring server TLS identity")?;
    }

    info!(%address, "starting evaluator node");
    let serve_shutdown = shutdown.clone();
    let serving = tokio::spawn(async move {
        server
            .add_service(EvaluatorServer::new(servicer))
            .serve_with_shutdown(address, serve_shutdown.cancelled())
            .await
    });

    match shutdown.drain(serving).await {
        Some(result) => result.context("evaluator server task panicked")?.context("evaluator server failed"),
        None => {
            warn!("shutdown grace period elapsed; forcing evaluator server closed");
            Ok(())
        }
    }
}

async fn serve_load_balancer(
    cli: &sentiment_config::Cli,
    address: SocketAddr,
    identity: Option<sentiment_config::Identity>,
    shutdown: sentiment_task::Shutdown,
) -> anyhow::Result<()> {
    if cli.subnodes.is_empty() {
        warn!("no subnodes registered; this load balancer is rendered useless");
    }

    let tls = cli.secure_subnodes.then(secure_subnode_tls);
    let channels = cli
        .subnodes
        .iter()
        .map(|subnode| build_channel(subnode, tls.clone()))
        .collect::<Result<Vec<_>, _>>()
        .context("dialing configured subnodes")?;

    let servicer = BalancerServicer::new(cli.subnodes.clone(), channels);

    let mut server = Server::builder();
    if let Some(identity) = identity {
        server = server
            .tls_config(ServerTlsConfig::new().identity(Identity::from_pem(identity.certificate_chain, identity.key)))
            .context("configuring server TLS identity")?;
    }

    info!(%address, subnodes = cli.subnodes.len(), "starting load balancer");
    let serve_shutdown = shutdown.clone();
    let serving = tokio::spawn(async move {
        server
            .add_service(EvaluatorServer::new(servicer))
            .serve_with_shutdown(address, serve_shutdown.cancelled())
            .await
    });

    match shutdown.drain(serving).await {
        Some(result) => result.context("load balancer server task panicked")?.context("load balancer server failed"),
        None => {
            warn!("shutdown grace period elapsed; forcing load balancer channels closed");
            Ok(())
        }
    }
}
