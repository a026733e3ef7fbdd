//! User, profile and session models.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Authorization role; passengers and conductors replace the two default
/// groups, administrators manage the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Passenger,
    Conductor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Passenger => "passenger",
            Role::Conductor => "conductor",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AgeGroup {
    /// 0-18
    Child,
    /// 19-55
    Adult,
    /// 56-120
    Old,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Apiv2Schema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: i64,
    pub full_name: String,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub mobile: String,
}

/// Authenticated caller resolved from a bearer token
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub conductor_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub mobile: String,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued session token
#[derive(Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub age_group: Option<AgeGroup>,
    pub gender: Option<Gender>,
    pub mobile: Option<String>,
    pub employee_id: Option<String>,
}

#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct ConductorSignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub contact_number: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Apiv2Schema)]
pub struct ConductorSignupResponse {
    pub user_id: i64,
    pub employee_id: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Apiv2Schema)]
pub struct ConductorLoginRequest {
    pub employee_id: String,
    pub password: String,
}
