//! Domain service for registration, login and token verification.
//!
//! Tokens are stateless: logout needs no server-side work and a token stays
//! valid until it expires.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::services::token::{Identity, TokenError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    DuplicateEmail,

    /// Unknown email and wrong password deliberately share this variant.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Unauthenticated("Token expired".to_string()),
            TokenError::Invalid(_) => Self::Unauthenticated("Invalid token".to_string()),
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

/// Login result containing the bearer token and the public user summary.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateEmail`] if the email is already registered.
    async fn register(&self, email: &str, password: &str, is_admin: bool)
    -> Result<User, AuthError>;

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Verifies a bearer token and returns the identity it carries.
    fn verify_token(&self, token: &str) -> Result<Identity, AuthError>;

    /// Loads the user behind a verified identity.
    async fn current_user(&self, identity: Identity) -> Result<User, AuthError>;
}

/// Trims and lower-cases an email so lookups are case-insensitive.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
