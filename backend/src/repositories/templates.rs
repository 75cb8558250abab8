//! Journal template repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use daybook_shared::questions::QuestionDefinition;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Journal template record from database
///
/// The ordered question list round-trips through the JSONB column as a
/// whole document.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub questions: Json<Vec<QuestionDefinition>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a journal template
#[derive(Debug, Clone)]
pub struct CreateTemplate {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub questions: Vec<QuestionDefinition>,
}

/// Input for updating a journal template
///
/// None fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<QuestionDefinition>>,
}

/// Journal template repository for database operations
pub struct TemplateRepository;

impl TemplateRepository {
    /// Create a new template
    pub async fn create(pool: &PgPool, input: CreateTemplate) -> Result<TemplateRecord> {
        let record = sqlx::query_as::<_, TemplateRecord>(
            r#"
            INSERT INTO journal_templates (user_id, name, description, questions)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, description, questions, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(Json(&input.questions))
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// List all templates for a user, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<TemplateRecord>> {
        let records = sqlx::query_as::<_, TemplateRecord>(
            r#"
            SELECT id, user_id, name, description, questions, created_at, updated_at
            FROM journal_templates
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get a template by ID, scoped to its owner
    pub async fn get_by_id(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TemplateRecord>> {
        let record = sqlx::query_as::<_, TemplateRecord>(
            r#"
            SELECT id, user_id, name, description, questions, created_at, updated_at
            FROM journal_templates
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Update a template, scoped to its owner
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        updates: UpdateTemplate,
    ) -> Result<Option<TemplateRecord>> {
        let record = sqlx::query_as::<_, TemplateRecord>(
            r#"
            UPDATE journal_templates SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                questions = COALESCE($5, questions),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, questions, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(updates.name)
        .bind(updates.description)
        .bind(updates.questions.map(Json))
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a template, scoped to its owner
    ///
    /// Entries that referenced the template keep their copied question
    /// text; nothing else is touched.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM journal_templates
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
