//! GitHub webhook signature verification (X-Hub-Signature-256)

use crate::error::WebhookError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying `sha256=<hex digest>` of the request body
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Verify the HMAC-SHA256 signature of a webhook body
///
/// The digest comparison runs in constant time.
///
/// # Arguments
/// * `secret` - Shared webhook secret
/// * `header` - Value of the signature header, if present
/// * `payload` - Raw request body, exactly as received
pub fn verify_signature(
    secret: &[u8],
    header: Option<&str>,
    payload: &[u8],
) -> Result<(), WebhookError> {
    let header = header.ok_or(WebhookError::MissingSignature)?;
    let digest = header.strip_prefix(SIGNATURE_PREFIX).ok_or_else(|| {
        WebhookError::InvalidSignatureFormat(format!("expected {SIGNATURE_PREFIX} prefix"))
    })?;
    let expected =
        hex::decode(digest).map_err(|err| WebhookError::InvalidSignatureFormat(err.to_string()))?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|err| WebhookError::Internal(format!("invalid webhook secret: {err}")))?;
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}

/// Compute the header value GitHub would send for `payload`
#[cfg(test)]
pub(crate) fn sign(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(payload);
    format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    )
}
