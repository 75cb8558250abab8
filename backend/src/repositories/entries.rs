//! Journal entry repository for database operations
//!
//! Entry creation and deletion run as single transactions so the aggregate
//! (entry row, responses, tag links, snapshot, photo references) is never
//! observable in a partial state.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Journal entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_kind: String,
    pub content: Option<String>,
    pub template_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Guided response record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResponseRecord {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
    pub position: i32,
}

/// Snapshot record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SnapshotRecord {
    pub id: Uuid,
    pub entry_id: Option<Uuid>,
    pub place_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather_summary: Option<String>,
    pub temperature_c: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Photo reference record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhotoRecord {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub file_ref: String,
    pub caption: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Response row joined with its entry, used by search
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResponseSearchRecord {
    pub entry_id: Uuid,
    pub entry_kind: String,
    pub created_at: DateTime<Utc>,
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
}

/// One response to persist; storage position follows list order
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
}

/// Snapshot values to persist alongside an entry
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub place_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather_summary: Option<String>,
    pub temperature_c: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Photo reference to persist alongside an entry
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub file_ref: String,
    pub caption: Option<String>,
}

/// Tag to find-or-create inside the entry transaction
#[derive(Debug, Clone)]
pub struct NewEntryTag {
    pub name: String,
    pub color: Option<String>,
}

/// Input for creating a journal entry with its full aggregate
#[derive(Debug, Clone)]
pub struct CreateEntry {
    pub user_id: Uuid,
    pub entry_kind: String,
    pub content: Option<String>,
    pub template_key: Option<String>,
    pub responses: Vec<NewResponse>,
    pub tag_ids: Vec<Uuid>,
    pub new_tags: Vec<NewEntryTag>,
    pub snapshot: Option<NewSnapshot>,
    pub photos: Vec<NewPhoto>,
}

/// Journal entry repository for database operations
pub struct EntryRepository;

impl EntryRepository {
    /// Create an entry with its responses, tags, snapshot, and photos
    ///
    /// Runs in one transaction; any failure leaves nothing behind.
    pub async fn create(pool: &PgPool, input: CreateEntry) -> Result<EntryRecord> {
        let mut tx = pool.begin().await?;

        let entry = sqlx::query_as::<_, EntryRecord>(
            r#"
            INSERT INTO journal_entries (user_id, entry_kind, content, template_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, entry_kind, content, template_key, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.entry_kind)
        .bind(&input.content)
        .bind(&input.template_key)
        .fetch_one(&mut *tx)
        .await?;

        for (position, response) in input.responses.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO guided_responses (entry_id, question_id, question_text, answer, position)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(entry.id)
            .bind(&response.question_id)
            .bind(&response.question_text)
            .bind(&response.answer)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        // Owner scoping lives in the SELECT; a foreign tag id links nothing
        for tag_id in &input.tag_ids {
            sqlx::query(
                r#"
                INSERT INTO entry_tags (entry_id, tag_id)
                SELECT $1, id FROM tags WHERE id = $2 AND user_id = $3
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(entry.id)
            .bind(tag_id)
            .bind(input.user_id)
            .execute(&mut *tx)
            .await?;
        }

        for tag in &input.new_tags {
            // Find-or-create; an existing tag keeps its stored color
            let tag_id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO tags (user_id, name, color)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(input.user_id)
            .bind(&tag.name)
            .bind(&tag.color)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO entry_tags (entry_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(entry.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(snapshot) = &input.snapshot {
            sqlx::query(
                r#"
                INSERT INTO snapshots
                    (entry_id, place_name, latitude, longitude, weather_summary, temperature_c, recorded_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(entry.id)
            .bind(&snapshot.place_name)
            .bind(snapshot.latitude)
            .bind(snapshot.longitude)
            .bind(&snapshot.weather_summary)
            .bind(snapshot.temperature_c)
            .bind(snapshot.recorded_at)
            .execute(&mut *tx)
            .await?;
        }

        for (position, photo) in input.photos.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO entry_photos (entry_id, file_ref, caption, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(entry.id)
            .bind(&photo.file_ref)
            .bind(&photo.caption)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(entry)
    }

    /// Get an entry by ID, scoped to its owner
    pub async fn get_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<EntryRecord>> {
        let record = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT id, user_id, entry_kind, content, template_key, created_at, updated_at
            FROM journal_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List one page of entries, newest first, optionally range-filtered
    pub async fn list_page(
        pool: &PgPool,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EntryRecord>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT id, user_id, entry_kind, content, template_key, created_at, updated_at
            FROM journal_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Count entries matching the same filter as `list_page`
    pub async fn count_in_range(
        pool: &PgPool,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM journal_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Get the N most recent entries for a user
    pub async fn recent(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<EntryRecord>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT id, user_id, entry_kind, content, template_key, created_at, updated_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Guided entries in a date range, oldest first (mood series input)
    pub async fn guided_in_range(
        pool: &PgPool,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<EntryRecord>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT id, user_id, entry_kind, content, template_key, created_at, updated_at
            FROM journal_entries
            WHERE user_id = $1 AND entry_kind = 'guided'
              AND created_at >= $2 AND created_at <= $3
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// All entries for a user, oldest first (export)
    pub async fn list_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<EntryRecord>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT id, user_id, entry_kind, content, template_key, created_at, updated_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Count all entries for a user
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM journal_entries WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Delete an entry, scoped to its owner
    ///
    /// Snapshots outlive their entry: the back-reference is cleared first,
    /// then the entry row goes away and responses, tag links, and photo
    /// references cascade with it.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE snapshots SET entry_id = NULL
            WHERE entry_id = $1
              AND EXISTS (SELECT 1 FROM journal_entries WHERE id = $1 AND user_id = $2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM journal_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Ordered responses for one entry
    pub async fn responses_for_entry(pool: &PgPool, entry_id: Uuid) -> Result<Vec<ResponseRecord>> {
        let records = sqlx::query_as::<_, ResponseRecord>(
            r#"
            SELECT id, entry_id, question_id, question_text, answer, position
            FROM guided_responses
            WHERE entry_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Ordered responses for a batch of entries
    pub async fn responses_for_entries(
        pool: &PgPool,
        entry_ids: &[Uuid],
    ) -> Result<Vec<ResponseRecord>> {
        let records = sqlx::query_as::<_, ResponseRecord>(
            r#"
            SELECT id, entry_id, question_id, question_text, answer, position
            FROM guided_responses
            WHERE entry_id = ANY($1)
            ORDER BY entry_id, position ASC
            "#,
        )
        .bind(entry_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// The snapshot attached to an entry, if any
    pub async fn snapshot_for_entry(pool: &PgPool, entry_id: Uuid) -> Result<Option<SnapshotRecord>> {
        let record = sqlx::query_as::<_, SnapshotRecord>(
            r#"
            SELECT id, entry_id, place_name, latitude, longitude,
                   weather_summary, temperature_c, recorded_at, created_at
            FROM snapshots
            WHERE entry_id = $1
            "#,
        )
        .bind(entry_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Snapshots attached to a batch of entries
    pub async fn snapshots_for_entries(
        pool: &PgPool,
        entry_ids: &[Uuid],
    ) -> Result<Vec<SnapshotRecord>> {
        let records = sqlx::query_as::<_, SnapshotRecord>(
            r#"
            SELECT id, entry_id, place_name, latitude, longitude,
                   weather_summary, temperature_c, recorded_at, created_at
            FROM snapshots
            WHERE entry_id = ANY($1)
            "#,
        )
        .bind(entry_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Ordered photo references for one entry
    pub async fn photos_for_entry(pool: &PgPool, entry_id: Uuid) -> Result<Vec<PhotoRecord>> {
        let records = sqlx::query_as::<_, PhotoRecord>(
            r#"
            SELECT id, entry_id, file_ref, caption, position, created_at
            FROM entry_photos
            WHERE entry_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Ordered photo references for a batch of entries
    pub async fn photos_for_entries(pool: &PgPool, entry_ids: &[Uuid]) -> Result<Vec<PhotoRecord>> {
        let records = sqlx::query_as::<_, PhotoRecord>(
            r#"
            SELECT id, entry_id, file_ref, caption, position, created_at
            FROM entry_photos
            WHERE entry_id = ANY($1)
            ORDER BY entry_id, position ASC
            "#,
        )
        .bind(entry_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Entries whose free-text content matches an ILIKE pattern, newest first
    pub async fn search_content(
        pool: &PgPool,
        user_id: Uuid,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<EntryRecord>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT id, user_id, entry_kind, content, template_key, created_at, updated_at
            FROM journal_entries
            WHERE user_id = $1 AND content IS NOT NULL AND content ILIKE $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// First matching response per entry for an ILIKE pattern, newest first
    ///
    /// DISTINCT ON keeps the lowest-position match per entry, which is the
    /// stored answer order.
    pub async fn search_responses(
        pool: &PgPool,
        user_id: Uuid,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<ResponseSearchRecord>> {
        let records = sqlx::query_as::<_, ResponseSearchRecord>(
            r#"
            SELECT entry_id, entry_kind, created_at, question_id, question_text, answer
            FROM (
                SELECT DISTINCT ON (e.id)
                    e.id AS entry_id, e.entry_kind, e.created_at,
                    r.question_id, r.question_text, r.answer
                FROM guided_responses r
                JOIN journal_entries e ON e.id = r.entry_id
                WHERE e.user_id = $1 AND r.answer ILIKE $2
                ORDER BY e.id, r.position ASC
            ) first_hits
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
