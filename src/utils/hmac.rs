//! HMAC-SHA256 signing helpers shared by device requests, ticket payloads
//! and payment callbacks.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `message`
pub fn sign(secret: &str, message: &str) -> Result<String, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("Invalid secret key: {e}"))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex signature over `message`
pub fn verify(secret: &str, message: &str, signature: &str) -> Result<bool, String> {
    let Ok(signature_bytes) = hex::decode(signature) else {
        return Ok(false);
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("Invalid secret key: {e}"))?;
    mac.update(message.as_bytes());

    Ok(mac.verify_slice(&signature_bytes).is_ok())
}

/// Signature for a timestamped request body: `HMAC("{timestamp}.{payload}")`
pub fn generate_signature(secret: &str, payload: &str, timestamp: u64) -> Result<String, String> {
    sign(secret, &format!("{timestamp}.{payload}"))
}

/// Validate a timestamped request signature, rejecting stale timestamps
pub fn validate_signature(
    secret: &str,
    payload: &str,
    timestamp: u64,
    signature: &str,
    tolerance_seconds: u64,
) -> Result<bool, String> {
    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System time error: {e}"))?
        .as_secs();

    if current_time.abs_diff(timestamp) > tolerance_seconds {
        return Ok(false);
    }

    verify(secret, &format!("{timestamp}.{payload}"), signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    #[test]
    fn test_sign_and_verify() {
        let sig = sign("secret", "order_1|pay_1").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify("secret", "order_1|pay_1", &sig).unwrap());
        assert!(!verify("other", "order_1|pay_1", &sig).unwrap());
        assert!(!verify("secret", "order_1|pay_2", &sig).unwrap());
    }

    #[test]
    fn test_verify_rejects_non_hex() {
        assert!(!verify("secret", "msg", "not-hex!").unwrap());
    }

    #[test]
    fn test_timestamped_signature() {
        let ts = now();
        let sig = generate_signature("device", r#"{"lat":1}"#, ts).unwrap();
        assert!(validate_signature("device", r#"{"lat":1}"#, ts, &sig, 300).unwrap());
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let ts = now() - 1000;
        let sig = generate_signature("device", "", ts).unwrap();
        assert!(!validate_signature("device", "", ts, &sig, 300).unwrap());
    }
}
