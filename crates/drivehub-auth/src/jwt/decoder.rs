//! JWT token validation and blocklist checking.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;
use uuid::Uuid;

use drivehub_cache::CacheManager;
use drivehub_cache::keys;
use drivehub_core::config::AuthConfig;
use drivehub_core::error::AppError;
use drivehub_core::traits::CacheProvider;

use super::claims::Claims;

/// Floor for blocklist entries so a token revoked at the edge of its
/// lifetime cannot slip through within the validation leeway.
const MIN_BLOCKLIST_TTL_SECONDS: u64 = 60;

/// Validates JWT tokens and checks blocklist status.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Cache manager for blocklist lookups.
    cache: Arc<CacheManager>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, cache: Arc<CacheManager>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cache,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks the signature, the expiration, and that the token's `jti` has
    /// not been revoked.
    pub async fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication("Invalid token"),
                }
            })?;

        self.check_blocklist(&token_data.claims.jti).await?;
        Ok(token_data.claims)
    }

    /// Checks whether the given JWT ID has been blocklisted.
    async fn check_blocklist(&self, jti: &Uuid) -> Result<(), AppError> {
        let key = keys::jwt_blocklist(&jti.to_string());
        if self.cache.contains(&key).await? {
            debug!(%jti, "Rejected revoked token");
            return Err(AppError::authentication("Token has been revoked"));
        }
        Ok(())
    }

    /// Revokes a token for the rest of its lifetime.
    pub async fn blocklist_token(&self, claims: &Claims) -> Result<(), AppError> {
        let key = keys::jwt_blocklist(&claims.jti.to_string());
        let ttl = claims
            .remaining_ttl_seconds()
            .max(MIN_BLOCKLIST_TTL_SECONDS);
        self.cache.insert(&key, Duration::from_secs(ttl)).await
    }
}
