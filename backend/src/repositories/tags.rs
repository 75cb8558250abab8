//! Tag repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Tag record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Tag record with its entry usage count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagWithCountRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub entry_count: i64,
}

/// Tag row joined to an entry, for batch loads
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryTagRecord {
    pub entry_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

/// Input for creating a tag
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

/// Input for updating a tag
///
/// None fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Tag repository for database operations
pub struct TagRepository;

impl TagRepository {
    /// Create a new tag
    pub async fn create(pool: &PgPool, input: CreateTag) -> Result<TagRecord> {
        let record = sqlx::query_as::<_, TagRecord>(
            r#"
            INSERT INTO tags (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, color, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.color)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Check if a tag name is already taken by this user
    pub async fn name_exists(pool: &PgPool, user_id: Uuid, name: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM tags WHERE user_id = $1 AND name = $2)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// List a user's tags with per-tag entry counts, alphabetically
    pub async fn list_with_counts(pool: &PgPool, user_id: Uuid) -> Result<Vec<TagWithCountRecord>> {
        let records = sqlx::query_as::<_, TagWithCountRecord>(
            r#"
            SELECT t.id, t.user_id, t.name, t.color, t.created_at,
                   COUNT(et.entry_id) AS entry_count
            FROM tags t
            LEFT JOIN entry_tags et ON et.tag_id = t.id
            WHERE t.user_id = $1
            GROUP BY t.id
            ORDER BY t.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get a tag by ID, scoped to its owner
    pub async fn get_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<TagRecord>> {
        let record = sqlx::query_as::<_, TagRecord>(
            r#"
            SELECT id, user_id, name, color, created_at
            FROM tags
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Update a tag, scoped to its owner
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        updates: UpdateTag,
    ) -> Result<Option<TagRecord>> {
        let record = sqlx::query_as::<_, TagRecord>(
            r#"
            UPDATE tags SET
                name = COALESCE($3, name),
                color = COALESCE($4, color)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, color, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(updates.name)
        .bind(updates.color)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a tag, scoped to its owner
    ///
    /// Entry links cascade away; entries themselves are untouched.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tags
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Filter a list of tag ids down to those owned by the user
    pub async fn filter_owned(pool: &PgPool, user_id: Uuid, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let owned = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM tags WHERE user_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(ids)
        .fetch_all(pool)
        .await?;

        Ok(owned)
    }

    /// Tags attached to one entry, alphabetically
    pub async fn tags_for_entry(pool: &PgPool, entry_id: Uuid) -> Result<Vec<TagRecord>> {
        let records = sqlx::query_as::<_, TagRecord>(
            r#"
            SELECT t.id, t.user_id, t.name, t.color, t.created_at
            FROM tags t
            JOIN entry_tags et ON et.tag_id = t.id
            WHERE et.entry_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Tags attached to a batch of entries
    pub async fn tags_for_entries(pool: &PgPool, entry_ids: &[Uuid]) -> Result<Vec<EntryTagRecord>> {
        let records = sqlx::query_as::<_, EntryTagRecord>(
            r#"
            SELECT et.entry_id, t.id, t.name, t.color
            FROM tags t
            JOIN entry_tags et ON et.tag_id = t.id
            WHERE et.entry_id = ANY($1)
            ORDER BY et.entry_id, t.name ASC
            "#,
        )
        .bind(entry_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Count a user's tags
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM tags WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
