//! Bearer token issuing and validation.
//!
//! Tokens are HS256-signed JWTs that carry only the user id and a fixed
//! one-day lifetime. They are stateless: logging out does not revoke them.

use hrflow_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token lifetime in seconds (one day).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Why a request could not be authenticated.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed bearer token")]
    MalformedToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("The user for this token no longer exists")]
    UserNotFound,

    /// No signing secret is configured. Every token operation fails closed.
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Token signing configuration.
///
/// The secret is optional so a missing `JWT_SECRET` surfaces as a
/// per-request `SERVER_MISCONFIGURED` error instead of a startup crash.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Option<String>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then_some(secret),
        }
    }

    /// A config with no secret; every sign/verify fails with
    /// [`AuthError::MissingSecret`].
    pub fn unconfigured() -> Self {
        Self { secret: None }
    }

    /// Read `JWT_SECRET`. Absent or empty leaves the config unconfigured.
    pub fn from_env() -> Self {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Self::new(secret),
            _ => {
                tracing::error!("JWT_SECRET is not set; authenticated requests will fail");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&[u8], AuthError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or(AuthError::MissingSecret)
    }
}

/// Issue a token for `user_id` valid for [`TOKEN_TTL_SECS`].
pub fn issue_token(user_id: DbId, config: &JwtConfig) -> Result<String, AuthError> {
    let secret = config.secret()?;
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(AuthError::Signing)
}

/// Validate a token's signature and expiry, returning its [`Claims`].
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let secret = config.secret()?;
    decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::MalformedToken,
        })
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedToken)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-secret-that-is-long-enough-for-hmac")
    }

    #[test]
    fn issue_and_validate() {
        let config = test_config();
        let token = issue_token(42, &config).expect("token generation should succeed");
        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let config = test_config();
        // Well past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-that-is-long-enough-for-hmac"),
        )
        .unwrap();

        assert_matches!(validate_token(&token, &config), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn wrong_secret_is_malformed() {
        let token = issue_token(1, &JwtConfig::new("secret-alpha")).unwrap();
        assert_matches!(
            validate_token(&token, &JwtConfig::new("secret-bravo")),
            Err(AuthError::MalformedToken)
        );
        assert_matches!(
            validate_token("not-a-jwt", &test_config()),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn missing_secret_fails_closed() {
        let config = JwtConfig::unconfigured();
        assert!(!config.is_configured());
        assert_matches!(issue_token(1, &config), Err(AuthError::MissingSecret));
        assert_matches!(validate_token("x", &config), Err(AuthError::MissingSecret));
        assert!(!JwtConfig::new("").is_configured());
    }

    #[test]
    fn bearer_header_parsing() {
        assert_matches!(bearer_token(None), Err(AuthError::MissingToken));
        assert_matches!(bearer_token(Some("Token abc")), Err(AuthError::MalformedToken));
        assert_matches!(bearer_token(Some("Bearer ")), Err(AuthError::MalformedToken));
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("test-secret"));
    }
}
