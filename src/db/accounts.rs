//! Users, profiles, conductor profiles and sessions.

use crate::{
    error::{DbContext, Result},
    models::{AgeGroup, ConductorProfile, Gender, Principal, Role, User, UserProfile},
};
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, Transaction};

/// Fields of a new user row
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub full_name: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Passenger profile fields
pub struct NewProfile<'a> {
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub mobile: &'a str,
}

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, role, created_at";

impl super::Database {
    async fn insert_user(tx: &mut Transaction<'_, Sqlite>, user: &NewUser<'_>) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, full_name, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.full_name)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .db_context("Failed to create user")?;

        Ok(result.last_insert_rowid())
    }

    /// Creates a user without a profile (administrators)
    pub async fn create_user(&self, user: &NewUser<'_>) -> Result<User> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;
        let id = Self::insert_user(&mut tx, user).await?;
        tx.commit().await.db_context("Failed to commit user")?;
        self.get_user(id).await
    }

    /// Creates a passenger and their profile atomically
    pub async fn create_passenger(
        &self,
        user: &NewUser<'_>,
        profile: &NewProfile<'_>,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;
        let id = Self::insert_user(&mut tx, user).await?;

        sqlx::query(
            "INSERT INTO user_profiles (user_id, full_name, age_group, gender, mobile)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(user.full_name)
        .bind(profile.age_group)
        .bind(profile.gender)
        .bind(profile.mobile)
        .execute(&mut *tx)
        .await
        .db_context("Failed to create user profile")?;

        tx.commit().await.db_context("Failed to commit passenger")?;
        self.get_user(id).await
    }

    /// Creates a conductor account. The employee id is derived from the user
    /// id so it is unique without a separate sequence.
    pub async fn create_conductor(
        &self,
        user: &NewUser<'_>,
        contact_number: Option<&str>,
        license_number: Option<&str>,
    ) -> Result<(User, ConductorProfile)> {
        let mut tx = self.pool.begin().await.db_context("Failed to begin transaction")?;
        let user_id = Self::insert_user(&mut tx, user).await?;
        let employee_id = format!("EMP{user_id:05}");

        sqlx::query(
            "INSERT INTO conductor_profiles (user_id, employee_id, contact_number, license_number)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&employee_id)
        .bind(contact_number)
        .bind(license_number)
        .execute(&mut *tx)
        .await
        .db_context("Failed to create conductor profile")?;

        tx.commit().await.db_context("Failed to commit conductor")?;

        let user = self.get_user(user_id).await?;
        let profile = self
            .find_conductor_by_user(user_id)
            .await?
            .ok_or_else(|| crate::error::AppError::not_found("Conductor", &employee_id))?;
        Ok((user, profile))
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .db_context("Failed to load user")
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to look up user")
    }

    pub async fn find_profile(&self, user_id: i64) -> Result<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, full_name, age_group, gender, mobile
             FROM user_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load user profile")
    }

    pub async fn find_conductor_by_user(&self, user_id: i64) -> Result<Option<ConductorProfile>> {
        sqlx::query_as::<_, ConductorProfile>(
            "SELECT id, user_id, employee_id, contact_number, license_number,
                    assigned_bus_id, assigned_schedule_id
             FROM conductor_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load conductor profile")
    }

    pub async fn find_conductor_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<ConductorProfile>> {
        sqlx::query_as::<_, ConductorProfile>(
            "SELECT id, user_id, employee_id, contact_number, license_number,
                    assigned_bus_id, assigned_schedule_id
             FROM conductor_profiles WHERE employee_id = ?",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to load conductor profile")
    }

    pub async fn get_conductor(&self, conductor_id: i64) -> Result<ConductorProfile> {
        sqlx::query_as::<_, ConductorProfile>(
            "SELECT id, user_id, employee_id, contact_number, license_number,
                    assigned_bus_id, assigned_schedule_id
             FROM conductor_profiles WHERE id = ?",
        )
        .bind(conductor_id)
        .fetch_one(&self.pool)
        .await
        .db_context("Failed to load conductor profile")
    }

    pub async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .db_context("Failed to create session")?;
        Ok(())
    }

    /// Resolves a live session to its principal; expired sessions resolve to
    /// `None`.
    pub async fn find_principal(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Principal>> {
        sqlx::query_as::<_, Principal>(
            "SELECT u.id AS user_id, u.username, u.role, c.id AS conductor_id
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             LEFT JOIN conductor_profiles c ON c.user_id = u.id
             WHERE s.token = ? AND s.expires_at > ?",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .db_context("Failed to resolve session")
    }

    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .db_context("Failed to delete session")?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .db_context("Failed to purge sessions")?;
        Ok(result.rows_affected())
    }
}
