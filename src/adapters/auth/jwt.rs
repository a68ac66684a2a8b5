//! JWT adapter for bearer token verification.
//!
//! Implements the `TokenVerifier` port for HS256 tokens signed with a
//! shared secret. Validates signature, expiry, and (when configured)
//! issuer, then maps the claims to the domain `AuthenticatedUser` type.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::TokenVerifier;

/// Configuration for the JWT verifier.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared with the token issuer.
    pub secret: String,

    /// Expected issuer claim. When `None`, the issuer is not checked.
    pub issuer: Option<String>,
}

impl JwtConfig {
    /// Create a new configuration with the required secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: None,
        }
    }

    /// Require a specific issuer claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// JWT claims carried by platform access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject - the user ID
    sub: String,

    /// Username as registered on the platform
    username: String,

    /// Expiry timestamp (Unix epoch seconds)
    exp: i64,

    /// Issuer, present when the issuer check is enabled
    #[serde(default)]
    iss: Option<String>,
}

/// HS256 token verifier.
///
/// This is the production implementation of `TokenVerifier`.
pub struct JwtTokenVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtTokenVerifier {
    /// Create a new verifier from configuration.
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("Invalid issuer in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::debug!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;

        let claims = token_data.claims;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in token");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.username))
    }
}

impl std::fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenVerifier")
            .field("issuer", &self.config.issuer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn sign(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        Claims {
            sub: "user-123".to_string(),
            username: "alice".to_string(),
            exp: chrono::Utc::now().timestamp() + 3600,
            iss: None,
        }
    }

    #[tokio::test]
    async fn verifies_a_well_formed_token() {
        let verifier = JwtTokenVerifier::new(JwtConfig::new(SECRET));
        let token = sign(&valid_claims());

        let user = verifier.verify(&token).await.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let verifier = JwtTokenVerifier::new(JwtConfig::new(SECRET));
        let mut claims = valid_claims();
        claims.exp = chrono::Utc::now().timestamp() - 3600;
        let token = sign(&claims);

        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let verifier = JwtTokenVerifier::new(JwtConfig::new("other-secret"));
        let token = sign(&valid_claims());

        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let verifier = JwtTokenVerifier::new(JwtConfig::new(SECRET));

        let result = verifier.verify("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn enforces_issuer_when_configured() {
        let verifier =
            JwtTokenVerifier::new(JwtConfig::new(SECRET).with_issuer("commons-platform"));

        let mut claims = valid_claims();
        claims.iss = Some("someone-else".to_string());
        let token = sign(&claims);

        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));

        claims.iss = Some("commons-platform".to_string());
        let token = sign(&claims);
        assert!(verifier.verify(&token).await.is_ok());
    }
}
