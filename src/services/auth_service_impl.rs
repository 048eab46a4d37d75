//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, normalize_email};
use crate::services::token::{Identity, TokenIssuer};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenIssuer,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenIssuer, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);

        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        if !email.contains('@') {
            return Err(AuthError::Validation(format!(
                "Invalid email address: {email}"
            )));
        }

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        // The unique index still catches a concurrent registration of the same email.
        let user = self
            .store
            .create_user(&email, password, is_admin, &self.security)
            .await?
            .ok_or(AuthError::DuplicateEmail)?;

        info!(user_id = user.id, is_admin = user.is_admin, "User registered");

        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let email = normalize_email(email);

        let user = self
            .store
            .verify_user_password(&email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(&user)?;

        info!(user_id = user.id, "User logged in");

        Ok(LoginResult { token, user })
    }

    fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    async fn current_user(&self, identity: Identity) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(identity.user_id)
            .await?
            .ok_or_else(|| AuthError::Unauthenticated("User no longer exists".to_string()))
    }
}
