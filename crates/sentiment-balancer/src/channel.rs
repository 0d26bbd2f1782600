//! Long-lived per-worker transport channels.

use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

/// Builds a lazily-connecting channel to a single subnode.
///
/// One of these is opened per configured address at construction and held
/// for the process's lifetime, rather than dialing fresh per request.
pub fn build_channel(address: &str, tls: Option<ClientTlsConfig>) -> Result<Channel, tonic::transport::Error> {
    let scheme = if tls.is_some() { "https" } else { "http" };
    let uri = format!("{scheme}://{address}");
    let mut endpoint = Endpoint::try_from(uri)?;
    if let Some(tls) = tls {
        endpoint = endpoint.tls_config(tls)?;
    }
    Ok(endpoint.connect_lazy())
}

/// Builds a `rustls`-backed client TLS config from a secure-subnodes flag.
///
/// Deliberately minimal: no custom verifier, no client certificates, no
/// reload on change — just native root trust, the same default `tonic`'s
/// `tls-native-roots` feature wires up.
#[must_use]
pub fn secure_subnode_tls() -> ClientTlsConfig {
    ClientTlsConfig::new().with_native_roots()
}
