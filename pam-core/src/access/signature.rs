//! Request signatures for Access Manager calls.

use crate::error::{PamError, PamResult};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Lines signed ahead of the canonical parameters, in wire order:
/// subscribe key, publish key, operation name.
pub fn build_sign_input(
    subscribe_key: &str,
    publish_key: &str,
    operation: &str,
    canonical_params: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        subscribe_key, publish_key, operation, canonical_params
    )
}

/// HMAC-SHA256 of `input` keyed by `secret_key`, URL-safe base64 without padding.
pub fn sign_sha256(secret_key: &str, input: &str) -> PamResult<String> {
    if secret_key.is_empty() {
        return Err(PamError::signing("secret key is required to sign requests"));
    }

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| PamError::signing(format!("Failed to create HMAC: {}", e)))?;
    mac.update(input.as_bytes());

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}
