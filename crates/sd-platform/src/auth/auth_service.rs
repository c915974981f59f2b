//! Authentication Service
//!
//! HS256 JWT issuing and validation for admin sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::shared::error::{AdminError, Result};
use crate::user::User;

/// Claims carried in an admin access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Display name
    pub name: String,

    /// Slug of the role the user holds
    pub role: String,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for HS256
    pub secret_key: String,

    /// Token issuer
    pub issuer: String,

    /// Access token expiration in seconds
    pub access_token_expiry_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "dev-secret-change-in-production".to_string(),
            issuer: "staffdesk".to_string(),
            access_token_expiry_secs: 3600,
        }
    }
}

/// Authentication service for issuing and validating access tokens
pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        info!("AuthService initialized with HS256");

        Self {
            config,
            encoding_key,
            decoding_key,
            algorithm: Algorithm::HS256,
        }
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user: &User, role_slug: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_expiry_secs);

        let claims = AccessTokenClaims {
            sub: user.id.clone(),
            iss: self.config.issuer.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            name: user.name.clone(),
            role: role_slug.to_string(),
        };

        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AdminError::internal(format!("Failed to encode JWT: {}", e)))
    }

    /// Validate an access token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.config.issuer]);

        decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AdminError::TokenExpired,
                _ => AdminError::InvalidToken {
                    message: format!("{}", e),
                },
            })
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    if auth_header.starts_with("Bearer ") {
        Some(&auth_header[7..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_token() {
        let service = AuthService::new(AuthConfig::default());

        let user = User::new("Jane Admin", "jane@example.com").with_role("role-1");
        let token = service.generate_access_token(&user, "admin").unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Jane Admin");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = AuthService::new(AuthConfig::default());
        let user = User::new("Jane Admin", "jane@example.com");
        let token = service.generate_access_token(&user, "editor").unwrap();

        let other = AuthService::new(AuthConfig {
            secret_key: "different-secret".to_string(),
            ..AuthConfig::default()
        });
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, AdminError::InvalidToken { .. }));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }
}
