//! User repository implementation.

use sqlx::PgPool;

use carlog_core::error::{AppError, ErrorKind};
use carlog_core::result::AppResult;
use carlog_entity::user::{NewUser, User};

/// Name of the unique constraint on `users.external_id`.
const EXTERNAL_ID_CONSTRAINT: &str = "users_external_id_key";

/// Repository for user lookups and the per-user refresh token slot.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by provider subject identifier.
    pub async fn find_by_external_id(&self, external_id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by external id", e)
            })
    }

    /// Insert a new user.
    ///
    /// A plain insert: when two first logins race, the loser hits the
    /// unique constraint and receives a `Conflict` error.
    pub async fn create(&self, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users \
             (external_id, provider, email, first_name, last_name, avatar_url, provider_refresh_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&data.external_id)
        .bind(&data.provider)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.avatar_url)
        .bind(&data.provider_refresh_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(EXTERNAL_ID_CONSTRAINT) =>
            {
                AppError::conflict(format!(
                    "User with external id '{}' already exists",
                    data.external_id
                ))
            }
            other => AppError::with_source(ErrorKind::Database, "Failed to create user", other),
        })
    }

    /// Overwrite the provider-issued refresh credential.
    ///
    /// `None` keeps the previous value, since providers only hand out a
    /// credential on the first consent.
    pub async fn update_provider_refresh_token(
        &self,
        external_id: &str,
        credential: Option<&str>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users \
             SET provider_refresh_token = COALESCE($2, provider_refresh_token), updated_at = NOW() \
             WHERE external_id = $1 \
             RETURNING *",
        )
        .bind(external_id)
        .bind(credential)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update provider credential", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("User '{external_id}' not found")))
    }

    /// Write the session refresh token slot; `None` clears it.
    ///
    /// Returns whether a user row matched.
    pub async fn set_refresh_token(
        &self,
        external_id: &str,
        token: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE external_id = $1",
        )
        .bind(external_id)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to write refresh token", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Read the session refresh token slot.
    pub async fn get_refresh_token(&self, external_id: &str) -> AppResult<Option<String>> {
        let row: Option<Option<String>> =
            sqlx::query_scalar("SELECT refresh_token FROM users WHERE external_id = $1")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read refresh token", e)
                })?;

        Ok(row.flatten())
    }
}
