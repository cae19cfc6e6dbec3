//! Authentication Module
//!
//! Handles registration, credential checks and bearer tokens.
//! Users live in the `users` collection of the shared SQLite store.

pub mod handlers;
pub mod middleware;
pub mod token;
pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{Error, Result};
use crate::core::store::{is_unique_violation, Database};

/// User record stored in database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public user info (no sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Profile view returned to the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}

const SELECT_USER_BY_EMAIL: &str =
    "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE email = ?";
const SELECT_USER_BY_ID: &str =
    "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE id = ?";

/// Credential store: user identities and salted password hashes
pub struct CredentialStore {
    db: Database,
    hash_cost: u32,
}

impl CredentialStore {
    pub fn new(db: Database, hash_cost: u32) -> Self {
        Self { db, hash_cost }
    }

    /// Register a new user
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserInfo> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(Error::Validation("Name is required".to_string()));
        }
        validation::validate_email(email)?;
        validation::validate_password(password)?;

        if self.find_by_email(email).await?.is_some() {
            return Err(Error::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let password_hash = self.hash_password(password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let inserted = self
            .db
            .bounded(
                sqlx::query(
                    "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&user.id)
                .bind(&user.name)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(self.db.pool()),
            )
            .await;

        match inserted {
            Ok(_) => {}
            // Lost a race with a concurrent registration of the same email
            Err(e) if is_unique_violation(&e) => {
                return Err(Error::Conflict(
                    "User already exists with this email".to_string(),
                ));
            }
            Err(e) => return Err(e),
        }

        info!("[Auth] User registered: {} ({})", user.name, user.email);

        Ok(user.into())
    }

    /// Check an email/password pair
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        let candidate = password.to_owned();
        let stored = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &stored)).await??;

        if !valid {
            warn!("[Auth] Failed login attempt for {}", user.email);
            return Err(Error::InvalidCredentials);
        }

        info!("[Auth] User authenticated: {}", user.email);

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.db
            .bounded(
                sqlx::query_as::<_, User>(SELECT_USER_BY_EMAIL)
                    .bind(email)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.db
            .bounded(
                sqlx::query_as::<_, User>(SELECT_USER_BY_ID)
                    .bind(user_id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    /// Profile of the signed-in user
    pub async fn profile(&self, user_id: &str) -> Result<Profile> {
        self.find_by_id(user_id)
            .await?
            .map(Profile::from)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let cost = self.hash_cost;
        Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }
}
