//! Template service
//!
//! Serves built-in templates (code-defined, read-only) and user templates
//! (persisted) behind one key-or-id lookup. Built-in keys always win; they
//! are reserved names that no UUID can collide with.

use crate::error::ApiError;
use crate::repositories::{
    CreateTemplate, TemplateRecord, TemplateRepository, UpdateTemplate, UserRepository,
};
use daybook_shared::questions::{
    builtin_templates, validate_question_set, QuestionTemplate, DEFAULT_TEMPLATE_KEY,
};
use daybook_shared::types::{CreateTemplateRequest, TemplateResponse, UpdateTemplateRequest};
use daybook_shared::validation::validate_template_name;
use once_cell::sync::Lazy;
use sqlx::PgPool;
use uuid::Uuid;

static BUILTINS: Lazy<Vec<QuestionTemplate>> = Lazy::new(builtin_templates);

/// Template service
pub struct TemplateService;

impl TemplateService {
    /// List all templates visible to the user: built-ins first, then the
    /// user's own templates newest-first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<TemplateResponse>, ApiError> {
        let mut templates: Vec<TemplateResponse> =
            BUILTINS.iter().map(builtin_response).collect();

        let records = TemplateRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        templates.extend(records.into_iter().map(user_response));

        Ok(templates)
    }

    /// Get one template by built-in key or user template id
    pub async fn get(
        pool: &PgPool,
        user_id: Uuid,
        key_or_id: &str,
    ) -> Result<TemplateResponse, ApiError> {
        if let Some(template) = BUILTINS.iter().find(|t| t.key == key_or_id) {
            return Ok(builtin_response(template));
        }

        let record = Self::find_user_template(pool, user_id, key_or_id).await?;
        Ok(user_response(record))
    }

    /// Resolve a template into its question flow, for entry capture
    pub async fn resolve(
        pool: &PgPool,
        user_id: Uuid,
        key_or_id: &str,
    ) -> Result<QuestionTemplate, ApiError> {
        if let Some(template) = BUILTINS.iter().find(|t| t.key == key_or_id) {
            return Ok(template.clone());
        }

        let record = Self::find_user_template(pool, user_id, key_or_id).await?;
        Ok(question_flow(record))
    }

    /// Resolve the template to use when an entry names none
    ///
    /// Prefers the user's configured default; a default that no longer
    /// resolves (its template was deleted) falls through to the app default.
    pub async fn resolve_default(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<QuestionTemplate, ApiError> {
        let preferred = UserRepository::get_settings(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .and_then(|s| s.default_template);

        if let Some(preferred) = preferred {
            match Self::resolve(pool, user_id, &preferred).await {
                Ok(template) => return Ok(template),
                Err(ApiError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Self::resolve(pool, user_id, DEFAULT_TEMPLATE_KEY).await
    }

    /// Create a user template
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateTemplateRequest,
    ) -> Result<TemplateResponse, ApiError> {
        validate_template_name(&request.name).map_err(ApiError::Validation)?;
        validate_question_set(&request.questions).map_err(ApiError::Validation)?;

        let record = TemplateRepository::create(
            pool,
            CreateTemplate {
                user_id,
                name: request.name.trim().to_string(),
                description: request.description,
                questions: request.questions,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(user_response(record))
    }

    /// Update a user template
    ///
    /// A questions field, when present, replaces the whole question list.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        key_or_id: &str,
        request: UpdateTemplateRequest,
    ) -> Result<TemplateResponse, ApiError> {
        if BUILTINS.iter().any(|t| t.key == key_or_id) {
            return Err(ApiError::BadRequest(
                "Built-in templates cannot be modified".to_string(),
            ));
        }

        let name = match request.name {
            Some(name) => {
                validate_template_name(&name).map_err(ApiError::Validation)?;
                Some(name.trim().to_string())
            }
            None => None,
        };
        if let Some(questions) = &request.questions {
            validate_question_set(questions).map_err(ApiError::Validation)?;
        }

        let id = parse_template_id(key_or_id)?;
        let record = TemplateRepository::update(
            pool,
            id,
            user_id,
            UpdateTemplate {
                name,
                description: request.description,
                questions: request.questions,
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

        Ok(user_response(record))
    }

    /// Delete a user template
    ///
    /// Entries created from it keep their copied question text; only the
    /// template definition goes away.
    pub async fn delete(pool: &PgPool, user_id: Uuid, key_or_id: &str) -> Result<(), ApiError> {
        if BUILTINS.iter().any(|t| t.key == key_or_id) {
            return Err(ApiError::BadRequest(
                "Built-in templates cannot be deleted".to_string(),
            ));
        }

        let id = parse_template_id(key_or_id)?;
        let deleted = TemplateRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Template not found".to_string()));
        }
        Ok(())
    }

    async fn find_user_template(
        pool: &PgPool,
        user_id: Uuid,
        key_or_id: &str,
    ) -> Result<TemplateRecord, ApiError> {
        let id = parse_template_id(key_or_id)?;
        TemplateRepository::get_by_id(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))
    }
}

fn parse_template_id(key_or_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(key_or_id)
        .map_err(|_| ApiError::NotFound("Template not found".to_string()))
}

fn builtin_response(template: &QuestionTemplate) -> TemplateResponse {
    TemplateResponse {
        id: template.key.clone(),
        name: template.name.clone(),
        description: template.description.clone(),
        builtin: true,
        questions: template.questions.clone(),
        created_at: None,
    }
}

fn user_response(record: TemplateRecord) -> TemplateResponse {
    TemplateResponse {
        id: record.id.to_string(),
        name: record.name,
        description: record.description,
        builtin: false,
        questions: record.questions.0,
        created_at: Some(record.created_at),
    }
}

/// Turn a stored template into the flow form capture works with
///
/// The key carries the UUID's string form, which lands on the entry as
/// its template provenance.
fn question_flow(record: TemplateRecord) -> QuestionTemplate {
    QuestionTemplate {
        key: record.id.to_string(),
        name: record.name,
        description: record.description,
        questions: record.questions.0,
    }
}
