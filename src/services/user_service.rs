use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::database::user_repo;
use crate::services::password;

const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingFields,

    #[error("Username is too long")]
    UsernameTooLong,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Whether the message is meant for the person filling in the form.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, AuthError::Database(_) | AuthError::Hashing(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInUser {
    pub id: i64,
    pub username: String,
}

pub async fn sign_up(pool: &SqlitePool, username: &str, password: &str) -> Result<i64, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthError::UsernameTooLong);
    }

    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    match user_repo::insert_user(pool, username, &hash).await {
        Ok(id) => {
            info!(user_id = id, username, "New user signed up");
            Ok(id)
        }
        Err(e) if is_unique_violation(&e) => Err(AuthError::UsernameTaken),
        Err(e) => Err(AuthError::Database(e)),
    }
}

pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<SignedInUser, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::InvalidCredentials);
    }

    let Some(row) = user_repo::find_by_username(pool, username).await? else {
        info!(username, "Login rejected: unknown user");
        return Err(AuthError::InvalidCredentials);
    };

    let password = password.to_string();
    let stored = row.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &stored))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    if !valid {
        info!(username, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    Ok(SignedInUser {
        id: row.id,
        username: row.username,
    })
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
