//! Signature verification for incoming LINE webhook requests
//!
//! LINE signs every webhook body with HMAC-SHA256 keyed by the channel secret
//! and sends the base64 encoded digest in the `X-Line-Signature` header.
//!
//! # Important Notes
//!
//! - The signature MUST be computed on the raw request body bytes, not parsed JSON
//! - The comparison must be constant-time to prevent timing attacks
//! - The header carries the bare base64 digest, there is no algorithm prefix

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies the `X-Line-Signature` header value against the raw request body
///
/// # Arguments
///
/// * `payload` - The raw request body bytes, exactly as received
/// * `signature` - The value of the `X-Line-Signature` header
/// * `channel_secret` - The LINE channel secret
///
/// # Returns
///
/// `true` only if `signature` is the base64 encoded HMAC-SHA256 of `payload`.
/// A signature that is not valid base64 is rejected.
pub fn verify_signature(payload: &[u8], signature: &str, channel_secret: &str) -> bool {
    let expected_signature = match BASE64.decode(signature) {
        Ok(sig) => sig,
        Err(e) => {
            logfire::warn!(
                "Failed to decode signature base64: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            logfire::error!(
                "Failed to create HMAC instance: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    mac.update(payload);
    let computed_signature = mac.finalize().into_bytes();

    let is_valid: bool = computed_signature.ct_eq(&expected_signature[..]).into();

    if !is_valid {
        logfire::warn!("Webhook signature verification failed: signatures do not match");
    }

    is_valid
}

/// Computes the signature LINE would send for `payload`.
#[cfg(test)]
pub(crate) fn sign(payload: &[u8], channel_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    BASE64.encode(mac.finalize().into_bytes())
}
