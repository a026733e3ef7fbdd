//! Request authentication and authorization.

use crate::{
    config::HmacConfig,
    error::{AppError, Result},
    models::{Principal, Role},
    state::AppState,
    utils::{extract_bearer_token, hmac},
};
use actix_web::HttpRequest;
use chrono::Utc;

/// Resolves the bearer token of `req` to a live session
pub async fn authenticate(req: &HttpRequest, state: &AppState) -> Result<Principal> {
    let token = extract_bearer_token(req)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    state
        .db
        .find_principal(&token, Utc::now())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session is invalid or has expired".to_string()))
}

pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "This action is not available to {} accounts",
            principal.role.as_str()
        )))
    }
}

/// Authenticates and requires one of `allowed`
pub async fn authorize(req: &HttpRequest, state: &AppState, allowed: &[Role]) -> Result<Principal> {
    let principal = authenticate(req, state).await?;
    require_role(&principal, allowed)?;
    Ok(principal)
}

/// Authenticates a conductor and returns their conductor profile id
pub async fn authorize_conductor(req: &HttpRequest, state: &AppState) -> Result<(Principal, i64)> {
    let principal = authorize(req, state, &[Role::Conductor]).await?;
    let conductor_id = principal
        .conductor_id
        .ok_or_else(|| AppError::Forbidden("Conductor profile missing".to_string()))?;
    Ok((principal, conductor_id))
}

/// Checks `X-Signature` / `X-Timestamp` over `body` when device signing is
/// enforced
pub fn verify_device_signature(req: &HttpRequest, body: &str, config: &HmacConfig) -> Result<()> {
    if !config.require_signature {
        return Ok(());
    }

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {name} header")))
    };
    let signature = header("X-Signature")?;
    let timestamp: u64 = header("X-Timestamp")?
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid X-Timestamp format".to_string()))?;

    match hmac::validate_signature(
        &config.secret,
        body,
        timestamp,
        signature,
        config.timestamp_tolerance_seconds,
    ) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::Unauthorized(
            "Invalid signature or timestamp".to_string(),
        )),
        Err(e) => Err(AppError::Internal(format!("Signature validation error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: 1,
            username: "asha".into(),
            role,
            conductor_id: None,
        }
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&principal(Role::Admin), &[Role::Admin]).is_ok());
        assert!(matches!(
            require_role(&principal(Role::Passenger), &[Role::Conductor]),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_device_signature_optional_by_default() {
        let req = TestRequest::default().to_http_request();
        assert!(verify_device_signature(&req, "{}", &HmacConfig::default()).is_ok());
    }

    #[test]
    fn test_device_signature_enforced() {
        let config = HmacConfig {
            secret: "device".into(),
            timestamp_tolerance_seconds: 300,
            require_signature: true,
        };
        let body = r#"{"bus_id":"KA01","lat":12.9,"lng":77.6}"#;
        let ts = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let sig = hmac::generate_signature("device", body, ts).unwrap();

        let req = TestRequest::default()
            .insert_header(("X-Signature", sig.as_str()))
            .insert_header(("X-Timestamp", ts.to_string()))
            .to_http_request();
        assert!(verify_device_signature(&req, body, &config).is_ok());

        let unsigned = TestRequest::default().to_http_request();
        assert!(matches!(
            verify_device_signature(&unsigned, body, &config),
            Err(AppError::Unauthorized(_))
        ));

        assert!(verify_device_signature(&req, "{}", &config).is_err());
    }
}
