//! Stub user directory for login and sign-up.
//!
//! Not real authentication: tokens are random UUIDs kept in memory and no
//! endpoint checks them. Passwords are stored as SHA-256 hex digests.

use counsel_shared::rpc::{AuthResponse, UserProfile};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

pub const FIXTURE_USER_ID: &str = "user-0001";
pub const FIXTURE_USER_NAME: &str = "Jane Counsel";
pub const FIXTURE_USER_EMAIL: &str = "jane@counsel.test";
pub const FIXTURE_USER_PASSWORD: &str = "password123";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email '{0}' already exists")]
    AlreadyRegistered(String),
}

#[derive(Debug, Clone)]
struct UserRecord {
    profile: UserProfile,
    password_digest: String,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    /// Keyed by lower-cased email
    users: HashMap<String, UserRecord>,
    /// token -> user id
    tokens: HashMap<String, String>,
    next_user: u64,
}

#[derive(Debug, Default)]
pub struct UserDirectory {
    inner: RwLock<DirectoryInner>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory seeded with the fixture account
    pub fn with_fixture_user() -> Self {
        let mut inner = DirectoryInner::default();
        inner.next_user = 1;
        inner.users.insert(
            FIXTURE_USER_EMAIL.to_string(),
            UserRecord {
                profile: fixture_profile(),
                password_digest: digest(FIXTURE_USER_PASSWORD),
            },
        );
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        let password = required("password", password)?;
        if !email.contains('@') {
            return Err(AuthError::Validation("email is not valid".to_string()));
        }

        let key = email.to_lowercase();
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&key) {
            warn!("Sign-up rejected, email already registered: {}", email);
            return Err(AuthError::AlreadyRegistered(email.to_string()));
        }

        inner.next_user += 1;
        let profile = UserProfile {
            id: format!("user-{:04}", inner.next_user),
            name: name.to_string(),
            email: email.to_string(),
        };
        inner.users.insert(
            key,
            UserRecord {
                profile: profile.clone(),
                password_digest: digest(password),
            },
        );

        let token = issue_token(&mut inner, &profile.id);
        info!("User signed up: {}", profile.id);
        Ok(AuthResponse { token, user: profile })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let email = required("email", email)?;
        let password = required("password", password)?;

        let mut inner = self.inner.write().await;
        let profile = match inner.users.get(&email.to_lowercase()) {
            Some(record) if record.password_digest == digest(password) => record.profile.clone(),
            _ => {
                warn!("Login failed for {}", email);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = issue_token(&mut inner, &profile.id);
        info!("User logged in: {}", profile.id);
        Ok(AuthResponse { token, user: profile })
    }

    /// User a token was issued to
    pub async fn user_for_token(&self, token: &str) -> Option<UserProfile> {
        let inner = self.inner.read().await;
        let user_id = inner.tokens.get(token)?;
        inner
            .users
            .values()
            .find(|r| &r.profile.id == user_id)
            .map(|r| r.profile.clone())
    }
}

pub fn fixture_profile() -> UserProfile {
    UserProfile {
        id: FIXTURE_USER_ID.to_string(),
        name: FIXTURE_USER_NAME.to_string(),
        email: FIXTURE_USER_EMAIL.to_string(),
    }
}

fn issue_token(inner: &mut DirectoryInner, user_id: &str) -> String {
    let token = Uuid::new_v4().to_string();
    inner.tokens.insert(token.clone(), user_id.to_string());
    token
}

fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}
