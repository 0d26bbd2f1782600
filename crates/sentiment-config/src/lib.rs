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

//! CLI parsing, token validation, and credential loading for the
//! `sentiment-fabric` binary.

mod cli;
mod tls;
mod token;

pub use cli::Cli;
pub use tls::{load_identity, Identity, TlsConfigError};
pub use token::{validate_token, InvalidToken};
