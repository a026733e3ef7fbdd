//! Signup, login and session lifecycle for passengers, conductors and
//! administrators.

use crate::{
    config::AdminConfig,
    db::{
        Database,
        accounts::{NewProfile, NewUser},
    },
    error::{AppError, Result},
    models::{
        AuditEvent, AuditEventType, AuditOutcome, ConductorLoginRequest, ConductorSignupRequest,
        ConductorSignupResponse, LoginResponse, Principal, ProfileResponse, Role, SignupRequest,
        User,
    },
    services::passwords::{check_password_strength, hash_password, verify_password},
    state::AppState,
    utils::{
        extract_bearer_token, extract_client_ip,
        validate::{is_valid_contact_number, is_valid_email, is_valid_username},
    },
};
use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    Ok(value)
}

pub async fn signup_passenger(
    req: &HttpRequest,
    state: &AppState,
    signup: &SignupRequest,
) -> Result<LoginResponse> {
    let username = required("username", &signup.username)?;
    if !is_valid_username(username) {
        return Err(AppError::validation(
            "username",
            "use up to 150 letters, digits and @.+-_",
        ));
    }
    let full_name = required("full_name", &signup.full_name)?;
    let mobile = signup.mobile.trim();
    if !is_valid_contact_number(mobile) {
        return Err(AppError::validation("mobile", "must be 10 to 15 digits"));
    }
    let email = signup.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    if let Some(email) = email
        && !is_valid_email(email)
    {
        return Err(AppError::validation("email", "is not a valid address"));
    }
    check_password_strength(&signup.password)?;

    let password_hash = hash_password(&signup.password)?;
    let user = state
        .db
        .create_passenger(
            &NewUser {
                username,
                email,
                full_name,
                password_hash: &password_hash,
                role: Role::Passenger,
            },
            &NewProfile {
                age_group: signup.age_group,
                gender: signup.gender,
                mobile,
            },
        )
        .await?;

    AuditEvent::from_request(req, AuditEventType::Signup, AuditOutcome::Success)
        .with_user_id(Some(user.username.clone()))
        .log();

    start_session(state, &user).await
}

/// Checks the login throttle before any credentials are looked at
fn guard_login(req: &HttpRequest, state: &AppState) -> Result<String> {
    let ip = extract_client_ip(req);
    if let Err(e) = state.limiter.check_request(req, "login") {
        AuditEvent::from_request(req, AuditEventType::RateLimitExceeded, AuditOutcome::Failure)
            .log();
        return Err(e);
    }
    if state.activity.is_suspicious(&ip) {
        AuditEvent::from_request(req, AuditEventType::SuspiciousActivity, AuditOutcome::Failure)
            .with_details("login blocked after repeated failures")
            .log();
        return Err(AppError::RateLimited);
    }
    Ok(ip)
}

fn reject_login(req: &HttpRequest, state: &AppState, ip: &str, identity: &str) -> AppError {
    AuditEvent::from_request(req, AuditEventType::LoginFailure, AuditOutcome::Failure)
        .with_user_id(Some(identity.to_string()))
        .log();

    if state.activity.record_failure(ip) {
        AuditEvent::from_request(req, AuditEventType::SuspiciousActivity, AuditOutcome::Failure)
            .with_details("repeated login failures")
            .log();
    }
    AppError::Unauthorized("Invalid credentials".to_string())
}

async fn accept_login(
    req: &HttpRequest,
    state: &AppState,
    ip: &str,
    user: &User,
) -> Result<LoginResponse> {
    state.activity.clear(ip);
    AuditEvent::from_request(req, AuditEventType::LoginSuccess, AuditOutcome::Success)
        .with_user_id(Some(user.username.clone()))
        .log();
    start_session(state, user).await
}

/// Username and password login for passengers and administrators
pub async fn login(
    req: &HttpRequest,
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<LoginResponse> {
    let ip = guard_login(req, state)?;
    let username = username.trim();

    let user = state.db.find_user_by_username(username).await?;
    match user {
        Some(user)
            if user.role != Role::Conductor && verify_password(password, &user.password_hash) =>
        {
            accept_login(req, state, &ip, &user).await
        }
        _ => Err(reject_login(req, state, &ip, username)),
    }
}

pub async fn signup_conductor(
    req: &HttpRequest,
    state: &AppState,
    signup: &ConductorSignupRequest,
) -> Result<ConductorSignupResponse> {
    let full_name = required("full_name", &signup.full_name)?;
    let email = required("email", &signup.email)?;
    if !is_valid_email(email) {
        return Err(AppError::validation("email", "is not a valid address"));
    }
    if signup.password != signup.confirm_password {
        return Err(AppError::validation("confirm_password", "passwords do not match"));
    }
    check_password_strength(&signup.password)?;

    let contact = signup
        .contact_number
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    if let Some(contact) = contact
        && !is_valid_contact_number(contact)
    {
        return Err(AppError::validation("contact_number", "must be 10 to 15 digits"));
    }
    let license = signup
        .license_number
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let password_hash = hash_password(&signup.password)?;
    let (user, profile) = state
        .db
        .create_conductor(
            &NewUser {
                username: email,
                email: Some(email),
                full_name,
                password_hash: &password_hash,
                role: Role::Conductor,
            },
            contact,
            license,
        )
        .await?;

    AuditEvent::from_request(req, AuditEventType::Signup, AuditOutcome::Success)
        .with_user_id(Some(profile.employee_id.clone()))
        .log();

    Ok(ConductorSignupResponse {
        user_id: user.id,
        employee_id: profile.employee_id,
        message: "Conductor account created".to_string(),
    })
}

pub async fn login_conductor(
    req: &HttpRequest,
    state: &AppState,
    credentials: &ConductorLoginRequest,
) -> Result<LoginResponse> {
    let ip = guard_login(req, state)?;
    let employee_id = credentials.employee_id.trim();

    let user = match state.db.find_conductor_by_employee_id(employee_id).await? {
        Some(profile) => Some(state.db.get_user(profile.user_id).await?),
        None => None,
    };

    match user {
        Some(user) if verify_password(&credentials.password, &user.password_hash) => {
            accept_login(req, state, &ip, &user).await
        }
        _ => Err(reject_login(req, state, &ip, employee_id)),
    }
}

/// Ends the caller's session. Unknown tokens are not an error.
pub async fn logout(req: &HttpRequest, state: &AppState) -> Result<()> {
    let Some(token) = extract_bearer_token(req) else {
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    };
    if state.db.delete_session(&token).await? {
        AuditEvent::from_request(req, AuditEventType::Logout, AuditOutcome::Success).log();
    }
    Ok(())
}

pub async fn profile(state: &AppState, principal: &Principal) -> Result<ProfileResponse> {
    let user = state.db.get_user(principal.user_id).await?;
    let profile = state.db.find_profile(user.id).await?;
    let employee_id = match principal.conductor_id {
        Some(_) => state
            .db
            .find_conductor_by_user(user.id)
            .await?
            .map(|c| c.employee_id),
        None => None,
    };

    Ok(ProfileResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        role: user.role,
        age_group: profile.as_ref().map(|p| p.age_group),
        gender: profile.as_ref().map(|p| p.gender),
        mobile: profile.map(|p| p.mobile),
        employee_id,
    })
}

async fn start_session(state: &AppState, user: &User) -> Result<LoginResponse> {
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::hours(state.config.session.ttl_hours.max(1));
    state.db.create_session(&token, user.id, expires_at).await?;

    Ok(LoginResponse {
        token,
        expires_at,
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    })
}

/// Creates the configured administrator when missing. Without a configured
/// password nothing is created.
pub async fn ensure_admin(db: &Database, config: &AdminConfig) -> Result<bool> {
    let Some(password) = config.password.as_deref() else {
        return Ok(false);
    };
    if db.find_user_by_username(&config.username).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hash_password(password)?;
    db.create_user(&NewUser {
        username: &config.username,
        email: None,
        full_name: "Administrator",
        password_hash: &password_hash,
        role: Role::Admin,
    })
    .await?;

    info!(username = %config.username, "Created administrator account");
    Ok(true)
}
