//! Tag service
//!
//! Tag names are unique per user, case-sensitively; renames and creates
//! check the name before writing so collisions surface as conflicts
//! rather than database errors.

use crate::error::ApiError;
use crate::repositories::{CreateTag, TagRecord, TagRepository, UpdateTag};
use daybook_shared::types::{CreateTagRequest, TagResponse, UpdateTagRequest};
use daybook_shared::validation::{validate_hex_color, validate_tag_name};
use sqlx::PgPool;
use uuid::Uuid;

/// Tag service
pub struct TagService;

impl TagService {
    /// List the user's tags with entry counts, sorted by name
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<TagResponse>, ApiError> {
        let records = TagRepository::list_with_counts(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records
            .into_iter()
            .map(|r| TagResponse {
                id: r.id.to_string(),
                name: r.name,
                color: r.color,
                entry_count: Some(r.entry_count),
            })
            .collect())
    }

    /// Create a tag
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateTagRequest,
    ) -> Result<TagResponse, ApiError> {
        validate_tag_name(&request.name).map_err(ApiError::Validation)?;
        if let Some(color) = &request.color {
            validate_hex_color(color).map_err(ApiError::Validation)?;
        }
        let name = request.name.trim().to_string();

        if TagRepository::name_exists(pool, user_id, &name)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(format!("Tag '{}' already exists", name)));
        }

        let record = TagRepository::create(
            pool,
            CreateTag {
                user_id,
                name,
                color: request.color,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(tag_response(record))
    }

    /// Update a tag's name or color
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        request: UpdateTagRequest,
    ) -> Result<TagResponse, ApiError> {
        let name = match request.name {
            Some(name) => {
                validate_tag_name(&name).map_err(ApiError::Validation)?;
                Some(name.trim().to_string())
            }
            None => None,
        };
        if let Some(color) = &request.color {
            validate_hex_color(color).map_err(ApiError::Validation)?;
        }

        // Renaming onto another tag's name is a conflict; renaming onto
        // the tag's own current name is a no-op
        if let Some(new_name) = &name {
            let current = TagRepository::get_by_id(pool, id, user_id)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

            if current.name != *new_name
                && TagRepository::name_exists(pool, user_id, new_name)
                    .await
                    .map_err(ApiError::Internal)?
            {
                return Err(ApiError::Conflict(format!(
                    "Tag '{}' already exists",
                    new_name
                )));
            }
        }

        let record = TagRepository::update(
            pool,
            id,
            user_id,
            UpdateTag {
                name,
                color: request.color,
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))?;

        Ok(tag_response(record))
    }

    /// Delete a tag
    ///
    /// Entry links go with it; the entries themselves are untouched.
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = TagRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Tag not found".to_string()));
        }
        Ok(())
    }
}

fn tag_response(record: TagRecord) -> TagResponse {
    TagResponse {
        id: record.id.to_string(),
        name: record.name,
        color: record.color,
        entry_count: None,
    }
}
