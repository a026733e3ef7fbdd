//! Signed QR ticket payloads.
//!
//! A payload has the form `BT1.<booking_id>.<hex hmac>`, where the HMAC is
//! computed over `BT1.<booking_id>` with the ticket signing secret. Bare
//! booking ids are not accepted, so ticket numbers cannot be guessed.

use crate::{
    config::TicketConfig,
    error::{AppError, Result},
    utils::hmac,
};

const PREFIX: &str = "BT1";

#[derive(Clone)]
pub struct TicketSigner {
    secret: String,
}

impl TicketSigner {
    pub fn new(config: &TicketConfig) -> Self {
        Self {
            secret: config.signing_secret.clone(),
        }
    }

    pub fn issue(&self, booking_id: i64) -> Result<String> {
        let body = format!("{PREFIX}.{booking_id}");
        let signature = hmac::sign(&self.secret, &body).map_err(AppError::Internal)?;
        Ok(format!("{body}.{signature}"))
    }

    /// Booking id of an authentic payload; `None` for anything malformed or
    /// forged
    pub fn parse(&self, payload: &str) -> Option<i64> {
        let mut parts = payload.trim().splitn(3, '.');
        let (prefix, id, signature) = (parts.next()?, parts.next()?, parts.next()?);
        if prefix != PREFIX {
            return None;
        }
        let booking_id: i64 = id.parse().ok().filter(|id| *id > 0)?;

        match hmac::verify(&self.secret, &format!("{PREFIX}.{booking_id}"), signature) {
            Ok(true) => Some(booking_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(secret: &str) -> TicketSigner {
        TicketSigner::new(&TicketConfig {
            signing_secret: secret.to_string(),
        })
    }

    #[test]
    fn test_issued_payload_parses() {
        let signer = signer("s3cret");
        let payload = signer.issue(42).unwrap();
        assert!(payload.starts_with("BT1.42."));
        assert_eq!(signer.parse(&payload), Some(42));
    }

    #[test]
    fn test_bare_id_rejected() {
        assert_eq!(signer("s3cret").parse("42"), None);
    }

    #[test]
    fn test_tampered_id_rejected() {
        let signer = signer("s3cret");
        let payload = signer.issue(42).unwrap();
        let forged = payload.replacen("BT1.42.", "BT1.43.", 1);
        assert_eq!(signer.parse(&forged), None);
    }

    #[test]
    fn test_other_secret_rejected() {
        let payload = signer("one").issue(7).unwrap();
        assert_eq!(signer("two").parse(&payload), None);
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = signer("s3cret");
        assert_eq!(signer.parse(""), None);
        assert_eq!(signer.parse("BT1.x.abcd"), None);
        assert_eq!(signer.parse("BT2.1.abcd"), None);
    }
}
