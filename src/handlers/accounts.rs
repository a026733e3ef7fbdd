//! Account endpoint handlers.

use crate::{
    models::{
        ConductorLoginRequest, ConductorSignupRequest, ConductorSignupResponse, LoginRequest,
        LoginResponse, MessageResponse, ProfileResponse, SignupRequest,
    },
    services::{accounts, auth},
    state::AppState,
};
use actix_web::{Error, HttpRequest, Result};
use paperclip::actix::{api_v2_operation, web};

/// Passenger signup
///
/// Creates the account and its profile and opens a session.
#[api_v2_operation(
    summary = "Passenger Signup",
    description = "Register a passenger account and return a session token",
    tags("Accounts"),
    responses(
        (status = 200, description = "Account created", body = LoginResponse),
        (status = 400, description = "Invalid signup data"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn signup(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<web::Json<LoginResponse>, Error> {
    let session = accounts::signup_passenger(&req, &state, &payload).await?;
    Ok(web::Json(session))
}

/// Passenger and administrator login
#[api_v2_operation(
    summary = "User Login",
    description = "Authenticate with username and password and return a session token",
    tags("Accounts"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<web::Json<LoginResponse>, Error> {
    let session = accounts::login(&req, &state, &payload.username, &payload.password).await?;
    Ok(web::Json(session))
}

#[api_v2_operation(
    summary = "Logout",
    description = "End the session of the presented bearer token",
    tags("Accounts"),
    responses(
        (status = 200, description = "Session closed", body = MessageResponse),
        (status = 401, description = "No bearer token")
    )
)]
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<MessageResponse>, Error> {
    accounts::logout(&req, &state).await?;
    Ok(web::Json(MessageResponse::new("Logged out")))
}

#[api_v2_operation(
    summary = "Profile",
    description = "Account and profile of the caller",
    tags("Accounts"),
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<web::Json<ProfileResponse>, Error> {
    let principal = auth::authenticate(&req, &state).await?;
    Ok(web::Json(accounts::profile(&state, &principal).await?))
}

/// Conductor signup
///
/// Assigns the next employee id. The conductor then logs in with it.
#[api_v2_operation(
    summary = "Conductor Signup",
    description = "Register a conductor account and assign an employee id",
    tags("Conductor"),
    responses(
        (status = 200, description = "Conductor registered", body = ConductorSignupResponse),
        (status = 400, description = "Invalid signup data"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn conductor_signup(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ConductorSignupRequest>,
) -> Result<web::Json<ConductorSignupResponse>, Error> {
    Ok(web::Json(
        accounts::signup_conductor(&req, &state, &payload).await?,
    ))
}

#[api_v2_operation(
    summary = "Conductor Login",
    description = "Authenticate with employee id and password",
    tags("Conductor"),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn conductor_login(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<ConductorLoginRequest>,
) -> Result<web::Json<LoginResponse>, Error> {
    Ok(web::Json(
        accounts::login_conductor(&req, &state, &payload).await?,
    ))
}
