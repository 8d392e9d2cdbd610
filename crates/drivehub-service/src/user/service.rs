//! Registration, login, logout, and profile lookup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use drivehub_auth::jwt::{JwtDecoder, JwtEncoder};
use drivehub_auth::password::{PasswordHasher, PasswordValidator};
use drivehub_core::error::AppError;
use drivehub_core::result::AppResult;
use drivehub_core::traits::StorageProvider;
use drivehub_database::UserStore;
use drivehub_entity::directory::CreateDirectory;
use drivehub_entity::user::{CreateUser, UserProfile};
use drivehub_storage::layout;

use crate::context::RequestContext;

/// Name recorded on every user's root directory row.
const ROOT_DIRECTORY_NAME: &str = "root";

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration input, already shape-validated by the caller.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Display name.
    pub display_name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: UserProfile,
}

/// Handles user accounts and access tokens.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Physical storage, for root directories.
    storage: Arc<dyn StorageProvider>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Token verifier and blocklist.
    decoder: Arc<JwtDecoder>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        storage: Arc<dyn StorageProvider>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            users,
            storage,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Registers a user and creates their root directory.
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserProfile> {
        let display_name = input.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        let email = input.email.trim().to_lowercase();

        self.validator
            .validate(&input.password, &[display_name.as_str(), email.as_str()])?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::validation("Email is already registered"));
        }

        let password_hash = self.hasher.hash_password(&input.password)?;
        let user_id = Uuid::new_v4();
        let root_dir_id = Uuid::new_v4();

        let key = layout::directory_key(user_id, root_dir_id);
        self.storage.create_dir(&key).await?;

        let user = CreateUser {
            id: user_id,
            display_name,
            email,
            password_hash,
            root_dir_id,
        };
        let root = CreateDirectory {
            id: root_dir_id,
            name: ROOT_DIRECTORY_NAME.to_string(),
            owner_id: user_id,
            parent_id: None,
        };
        let created = match self.users.create_user(&user, &root).await {
            Ok(created) => created,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete_dir(&user_id.to_string()).await {
                    warn!(user_id = %user_id, error = %cleanup, "Failed to remove orphaned root directory");
                }
                return Err(e);
            }
        };

        info!(user_id = %created.id, "User registered");
        Ok(created.profile())
    }

    /// Verifies credentials and issues an access token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self.encoder.generate_access_token(user.id, &user.email)?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            access_token: token.access_token,
            expires_at: token.expires_at,
            user: user.profile(),
        })
    }

    /// Resolves a bearer token to the acting user's context.
    ///
    /// Fails with an authentication error when the token is invalid, expired,
    /// revoked, or belongs to a user that no longer exists.
    pub async fn authenticate(&self, token: &str) -> AppResult<RequestContext> {
        let claims = self.decoder.decode_access_token(token).await?;
        let user = self
            .users
            .find_user(claims.user_id())
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))?;
        Ok(RequestContext::new(user.id, user.root_dir_id, user.email))
    }

    /// Revokes a bearer token for the rest of its lifetime.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let claims = self.decoder.decode_access_token(token).await?;
        self.decoder.blocklist_token(&claims).await?;
        info!(user_id = %claims.user_id(), "User logged out");
        Ok(())
    }

    /// Returns the caller's profile.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<UserProfile> {
        self.users
            .find_user(ctx.user_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_cache::CacheManager;
    use drivehub_core::config::{AuthConfig, CacheConfig};
    use drivehub_core::error::ErrorKind;
    use drivehub_database::MetadataStore;

    use crate::testing::Fixture;

    const PASSWORD: &str = "violet-harbor-71-lantern";

    fn service(fx: &Fixture) -> UserService {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        };
        let cache = Arc::new(CacheManager::new(&CacheConfig::default()));
        UserService::new(
            fx.store.clone(),
            fx.provider(),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config)),
            Arc::new(JwtEncoder::new(&config)),
            Arc::new(JwtDecoder::new(&config, cache)),
        )
    }

    fn input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            display_name: "Alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_root_directory() {
        let fx = Fixture::new().await;
        let users = service(&fx);

        let profile = users.register(input("Alice@Example.com", PASSWORD)).await.unwrap();
        assert_eq!(profile.email, "alice@example.com");

        let key = layout::directory_key(profile.id, profile.root_dir_id);
        assert!(fx.storage.exists(&key).await.unwrap());
        let root = fx
            .store
            .find_directory(profile.id, profile.root_dir_id)
            .await
            .unwrap()
            .unwrap();
        assert!(root.is_root());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let fx = Fixture::new().await;
        let users = service(&fx);

        users.register(input("a@example.com", PASSWORD)).await.unwrap();
        let err = users
            .register(input("A@EXAMPLE.COM", PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let fx = Fixture::new().await;
        let users = service(&fx);

        let err = users
            .register(input("a@example.com", "password"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_login_authenticate_logout() {
        let fx = Fixture::new().await;
        let users = service(&fx);
        let profile = users.register(input("a@example.com", PASSWORD)).await.unwrap();

        let login = users.login("A@example.com", PASSWORD).await.unwrap();
        assert_eq!(login.user.id, profile.id);

        let ctx = users.authenticate(&login.access_token).await.unwrap();
        assert_eq!(ctx.user_id, profile.id);
        assert_eq!(ctx.root_dir_id, profile.root_dir_id);
        assert_eq!(users.me(&ctx).await.unwrap().email, "a@example.com");

        users.logout(&login.access_token).await.unwrap();
        let err = users.authenticate(&login.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let fx = Fixture::new().await;
        let users = service(&fx);
        users.register(input("a@example.com", PASSWORD)).await.unwrap();

        let err = users.login("a@example.com", "wrong-password").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        let err = users.login("nobody@example.com", PASSWORD).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }
}
