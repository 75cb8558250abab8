//! User service for authentication, profile, and settings

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UpdateUserSettings, UserRepository};
use crate::services::TemplateService;
use daybook_shared::types::{
    AuthTokens, ProfileResponse, SettingsResponse, UpdateSettingsRequest, UserProfile,
};
use daybook_shared::validation::{validate_password, validate_timezone};
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

/// Account operations: registration, login, profile, settings
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Password hashing is offloaded to the blocking thread pool via
    /// `spawn_blocking`.
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        // Emails are stored lowercase so lookups are case-insensitive
        let email = email.trim().to_lowercase();

        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }

        validate_password(password).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, &email, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Self::issue_tokens(jwt_service, user.id)
    }

    /// Verify credentials and issue a fresh token pair
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let email = email.trim().to_lowercase();

        let user = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        // Password verification is CPU-bound; run it off the async runtime
        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        Self::issue_tokens(jwt_service, user.id)
    }

    /// Refresh access token using a refresh token
    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service.validate_refresh_token(refresh_token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        // The account may have been deleted since the token was issued
        let _user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Self::issue_tokens(jwt_service, user_id)
    }

    /// Get user profile
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserProfile {
            id: user.id.to_string(),
            email: user.email,
            created_at: user.created_at,
        })
    }

    /// Get user profile together with settings
    pub async fn get_profile_with_settings(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<ProfileResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let settings = UserRepository::get_settings(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        // Registration always seeds a settings row; tolerate its absence anyway
        let settings = match settings {
            Some(s) => SettingsResponse {
                timezone: s.timezone,
                default_template: s.default_template,
            },
            None => SettingsResponse {
                timezone: "UTC".to_string(),
                default_template: None,
            },
        };

        Ok(ProfileResponse {
            id: user.id.to_string(),
            email: user.email,
            created_at: user.created_at,
            settings,
        })
    }

    /// Update user settings
    ///
    /// Omitted fields keep their stored values.
    pub async fn update_settings(
        pool: &PgPool,
        user_id: Uuid,
        request: UpdateSettingsRequest,
    ) -> Result<SettingsResponse, ApiError> {
        if let Some(timezone) = &request.timezone {
            validate_timezone(timezone).map_err(ApiError::Validation)?;
        }

        if let Some(template) = &request.default_template {
            // The preferred template must resolve for this user
            match TemplateService::resolve(pool, user_id, template).await {
                Ok(_) => {}
                Err(ApiError::NotFound(_)) => {
                    return Err(ApiError::Validation(format!(
                        "Unknown template '{}'",
                        template
                    )));
                }
                Err(err) => return Err(err),
            }
        }

        let updated = UserRepository::update_settings(
            pool,
            user_id,
            UpdateUserSettings {
                timezone: request.timezone,
                default_template: request.default_template,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(SettingsResponse {
            timezone: updated.timezone,
            default_template: updated.default_template,
        })
    }

    fn issue_tokens(jwt_service: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
        let access_token = jwt_service
            .generate_access_token(user_id)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt_service
            .generate_refresh_token(user_id)
            .map_err(ApiError::Internal)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }
}
