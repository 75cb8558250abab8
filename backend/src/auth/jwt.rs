//! Access and refresh token issuance and checking
//!
//! Signing keys are derived once from the configured secret and shared
//! behind a single `Arc`, so handing the service to each request is one
//! refcount bump. Expired and malformed tokens map to distinct
//! [`AuthError`] variants so clients can tell re-login from retry.

use anyhow::Result;
use chrono::{Duration, Utc};
use daybook_shared::errors::AuthError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claims carried by every Daybook token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Unix expiry
    pub exp: i64,
    /// Unix issue time
    pub iat: i64,
    /// "access" or "refresh"
    pub token_type: String,
    /// Reserved for revocation lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn label(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

/// Issues and checks the token pair handed out at login
#[derive(Clone)]
pub struct JwtService {
    keys: Arc<Keys>,
}

impl JwtService {
    /// Derive the signing keys once; store the service in AppState
    pub fn new(
        secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                access_ttl_secs: access_token_expiry_secs,
                refresh_ttl_secs: refresh_token_expiry_secs,
            }),
        }
    }

    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, TokenKind::Access)
    }

    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.issue(user_id, TokenKind::Refresh)
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind) -> Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.keys.access_ttl_secs,
            TokenKind::Refresh => self.keys.refresh_ttl_secs,
        };

        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
            token_type: kind.label().to_string(),
            jti: None,
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("could not sign {} token: {}", kind.label(), e))
    }

    /// Decode, verify signature and expiry, and require the given kind
    fn check(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &Validation::default()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        if data.claims.token_type != kind.label() {
            return Err(AuthError::WrongTokenType {
                expected: kind.label(),
            });
        }
        Ok(data.claims)
    }

    /// Accept only access tokens, the kind the `Authorization` header carries
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.check(token, TokenKind::Access)
    }

    /// Accept only refresh tokens, the kind the refresh endpoint takes
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.check(token, TokenKind::Refresh)
    }

    /// Access token lifetime, reported in auth responses as `expires_in`
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.keys.access_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "unit-test-secret";

    fn jwt() -> JwtService {
        JwtService::new(TEST_SECRET, 3600, 604800)
    }

    #[test]
    fn test_access_token_round_trips() {
        let jwt = jwt();
        let user_id = Uuid::new_v4();

        let token = jwt.generate_access_token(user_id).unwrap();
        let claims = jwt.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_round_trips() {
        let jwt = jwt();
        let user_id = Uuid::new_v4();

        let token = jwt.generate_refresh_token(user_id).unwrap();
        let claims = jwt.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.token_type, "refresh");
    }

    #[test]
    fn test_token_kinds_do_not_cross() {
        let jwt = jwt();
        let access = jwt.generate_access_token(Uuid::new_v4()).unwrap();
        let refresh = jwt.generate_refresh_token(Uuid::new_v4()).unwrap();

        assert_eq!(
            jwt.validate_refresh_token(&access).unwrap_err(),
            AuthError::WrongTokenType {
                expected: "refresh"
            }
        );
        assert_eq!(
            jwt.validate_access_token(&refresh).unwrap_err(),
            AuthError::WrongTokenType { expected: "access" }
        );
    }

    #[test]
    fn test_garbage_is_invalid_not_expired() {
        let err = jwt().validate_access_token("not.a.jwt").unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[test]
    fn test_expired_token_reports_expiry() {
        // Negative ttl beyond jsonwebtoken's default 60s leeway
        let expired = JwtService::new(TEST_SECRET, -120, 604800);
        let token = expired.generate_access_token(Uuid::new_v4()).unwrap();

        let err = expired.validate_access_token(&token).unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let theirs = JwtService::new("some-other-secret", 3600, 604800);
        let token = theirs.generate_access_token(Uuid::new_v4()).unwrap();

        let err = jwt().validate_access_token(&token).unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }
}
