//! User account and settings repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user settings row, created alongside the account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSettingsRecord {
    pub user_id: Uuid,
    pub timezone: String,
    pub default_template: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Settings columns to change; None fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUserSettings {
    pub timezone: Option<String>,
    pub default_template: Option<String>,
}

/// Repository for users and their one-to-one settings row
pub struct UserRepository;

impl UserRepository {
    /// Insert a user and seed their settings row in one statement
    pub async fn create(pool: &PgPool, email: &str, password_hash: &str) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            WITH new_user AS (
                INSERT INTO users (email, password_hash)
                VALUES ($1, $2)
                RETURNING id, email, password_hash, created_at, updated_at
            ), seeded AS (
                INSERT INTO user_settings (user_id)
                SELECT id FROM new_user
            )
            SELECT id, email, password_hash, created_at, updated_at
            FROM new_user
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Look up an account by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Look up an account by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Fetch the settings row
    pub async fn get_settings(pool: &PgPool, user_id: Uuid) -> Result<Option<UserSettingsRecord>> {
        let settings = sqlx::query_as::<_, UserSettingsRecord>(
            r#"
            SELECT user_id, timezone, default_template, updated_at
            FROM user_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(settings)
    }

    /// Apply partial settings changes
    pub async fn update_settings(
        pool: &PgPool,
        user_id: Uuid,
        updates: UpdateUserSettings,
    ) -> Result<UserSettingsRecord> {
        let settings = sqlx::query_as::<_, UserSettingsRecord>(
            r#"
            UPDATE user_settings SET
                timezone = COALESCE($2, timezone),
                default_template = COALESCE($3, default_template),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, timezone, default_template, updated_at
            "#,
        )
        .bind(user_id)
        .bind(updates.timezone)
        .bind(updates.default_template)
        .fetch_one(pool)
        .await?;

        Ok(settings)
    }

    /// Whether an account already uses this email
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }
}
