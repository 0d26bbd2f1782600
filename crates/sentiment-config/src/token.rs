//! Bearer-token shape validation.

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]{13,}$").expect("token pattern is a valid regex"));

/// Checked at startup, so a misconfigured token fails fast instead of
/// letting every downstream RPC call fail individually.
#[derive(thiserror::Error, Debug, Clone)]
#[error("token does not match the required shape (13+ letters/underscores)")]
pub struct InvalidToken;

/// Validates a token against `^[A-Za-z_]{13,}$`.
pub fn validate_token(token: &str) -> Result<(), InvalidToken> {
    if TOKEN_PATTERN.is_match(token) {
        Ok(())
    } else {
        Err(InvalidToken)
    }
}
