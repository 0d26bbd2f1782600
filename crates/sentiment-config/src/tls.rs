//! Credential-pair validation and PEM loading for optional transport
//! security.

use std::path::{Path, PathBuf};

/// A startup-time credential configuration error.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum TlsConfigError {
    /// Exactly one of `--private-key`/`--certificate-chain` was given; a
    /// server identity needs both or neither.
    #[error("--private-key and --certificate-chain must both be given or both be omitted")]
    IncompletePair,
    /// A PEM file named on the command line could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// A server identity's private key and certificate chain, already loaded
/// from disk.
pub struct Identity {
    /// PEM-encoded private key bytes.
    pub key: Vec<u8>,
    /// PEM-encoded certificate chain bytes.
    pub certificate_chain: Vec<u8>,
}

/// Validates that `private_key` and `certificate_chain` are either both
/// present or both absent, then loads whichever pair was given.
///
/// Returns `Ok(None)` when neither flag was given (TLS identity disabled).
pub async fn load_identity(
    private_key: Option<&Path>,
    certificate_chain: Option<&Path>,
) -> Result<Option<Identity>, TlsConfigError> {
    match (private_key, certificate_chain) {
        (None, None) => Ok(None),
        (Some(key_path), Some(chain_path)) => {
            let key = read(key_path).await?;
            let certificate_chain = read(chain_path).await?;
            Ok(Some(Identity { key, certificate_chain }))
        }
        _ => Err(TlsConfigError::IncompletePair),
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, TlsConfigError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| TlsConfigError::Read { path: path.to_path_buf(), source })
}
