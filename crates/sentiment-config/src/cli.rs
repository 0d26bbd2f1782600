//! Command-line surface for the `sentiment-fabric` binary.

use std::path::PathBuf;

use clap::Parser;

/// Two-tier sentiment inference serving fabric: run a single evaluator node,
/// or a load balancer fronting a pool of them.
#[derive(Parser, Debug)]
#[command(name = "sentiment-fabric", version, about)]
pub struct Cli {
    /// Run as a load balancer fronting the given subnodes, instead of as an
    /// evaluator node.
    #[arg(short = 'L', long = "load-balancer")]
    pub load_balancer: bool,

    /// Address to bind this node's gRPC server on.
    #[arg(short = 'A', long = "address", default_value = "[::]:63398")]
    pub address: String,

    /// Shared bearer token, required to match `^[A-Za-z_]{13,}$`.
    #[arg(long = "token")]
    pub token: String,

    /// PEM-encoded private key for this node's server identity.
    #[arg(long = "private-key", visible_alias = "pk")]
    pub private_key: Option<PathBuf>,

    /// PEM-encoded certificate chain for this node's server identity.
    #[arg(long = "certificate-chain", visible_alias = "ch")]
    pub certificate_chain: Option<PathBuf>,

    /// Dial subnodes over TLS with native root trust. Load-balancer only.
    #[arg(short = 'S', long = "secure-subnodes")]
    pub secure_subnodes: bool,

    /// Evaluator subnode addresses to front. Load-balancer only; a
    /// balancer started with none logs a warning and serves an always-empty
    /// pool.
    pub subnodes: Vec<String>,
}
