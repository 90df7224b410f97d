//! Authentication and account bootstrap

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{LoginResponse, Permission, User, UserClaims},
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check credentials and issue a bearer token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let Some(user) = self.repository.users.get_by_username(username).await? else {
            // Same argon2 cost as checking a stored hash
            self.hash_password(password)?;
            tracing::warn!("Failed login for unknown user {}", username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_password(&user, password)? {
            tracing::warn!("Failed login for {}", username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.username);

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_hours as i64 * 3600,
        })
    }

    /// Create the account unless the username is taken
    pub async fn ensure_account(
        &self,
        username: &str,
        password: &str,
        permissions: &[Permission],
    ) -> AppResult<bool> {
        let hash = self.hash_password(password)?;
        let permissions: Vec<String> = permissions.iter().map(|p| p.as_str().to_string()).collect();

        let created = self
            .repository
            .users
            .create_if_missing(username, &hash, &permissions)
            .await?;
        if created {
            tracing::info!("Created account {}", username);
        }
        Ok(created)
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            permissions: user.granted_permissions(),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
