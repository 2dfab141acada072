use sqlx::PgPool;

use crate::db::models::User;
use crate::db::queries;
use crate::error::AppError;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Plaintext credential comparison. Every failure mode — blank input,
    /// unknown username, wrong password — yields the same error, so callers
    /// cannot probe which usernames exist.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Auth("invalid credentials".to_string()));
        }

        match queries::get_user_by_credentials(&self.pool, username, password).await? {
            Some(user) => {
                tracing::info!(%username, "login succeeded");
                Ok(user)
            }
            None => {
                tracing::warn!(%username, "login rejected");
                Err(AppError::Auth("invalid credentials".to_string()))
            }
        }
    }
}
