use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{self, AuthError, Claims};
use crate::config::AppConfig;
use crate::database::models::{NewUser, User};
use crate::database::{RecordStore, StoreError};
use crate::middleware::AuthUser;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token handed back on register and login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub valid: bool,
    pub token: String,
    pub id: i64,
}

/// Issues and checks caller identities
pub struct UserService {
    store: Arc<dyn RecordStore>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(store: Arc<dyn RecordStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<Session, AuthError> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(AuthError::InvalidInput("username is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AuthError::InvalidInput("password is required".to_string()));
        }

        let new_user = NewUser {
            username: username.to_string(),
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash: auth::hash_password(&request.password),
        };

        let user = self.store.create_user(new_user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::UsernameTaken(username.to_string()),
            other => AuthError::Store(other),
        })?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        self.session_for(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Session, AuthError> {
        let user = self
            .store
            .find_user_by_username(request.username.trim())
            .await?
            .filter(|u| auth::verify_password(&request.password, &u.password_hash))
            .ok_or_else(|| {
                tracing::warn!("Failed login for '{}'", request.username);
                AuthError::InvalidCredentials
            })?;

        self.session_for(&user)
    }

    /// Resolve a bearer token to the caller it names
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = auth::validate_jwt(token, &self.config.security)?;

        let user = self
            .store
            .find_user(claims.sub)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        })
    }

    fn session_for(&self, user: &User) -> Result<Session, AuthError> {
        let security = &self.config.security;
        let claims = Claims::new(user.id, user.username.clone(), security.jwt_expiry_hours)?;

        Ok(Session {
            valid: true,
            token: auth::generate_jwt(&claims, security)?,
            id: user.id,
        })
    }
}
