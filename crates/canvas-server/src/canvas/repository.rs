//! Canvas repository
//!
//! Every operation first resolves the acting user from the credential store,
//! then decides through [`Access`]. Reads and element updates report a
//! canvas the caller cannot see exactly like one that does not exist.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use tracing::{debug, info};

use super::access::Access;
use super::models::{Canvas, CanvasSummary};
use crate::core::auth::{CredentialStore, User};
use crate::core::error::{Error, Result};
use crate::core::store::Database;

const NOT_FOUND_OR_DENIED: &str = "Canvas not found or access denied";

const SELECT_CANVAS: &str = "SELECT id, name, owner, shared, elements, created_at, updated_at \
     FROM canvas WHERE id = ?";

const ACCESSIBLE_FILTER: &str = "WHERE owner = ? \
     OR EXISTS (SELECT 1 FROM json_each(canvas.shared) WHERE json_each.value = ?) \
     ORDER BY canvas.rowid DESC";

pub struct CanvasRepository {
    db: Database,
    credentials: Arc<CredentialStore>,
}

impl CanvasRepository {
    pub fn new(db: Database, credentials: Arc<CredentialStore>) -> Self {
        Self { db, credentials }
    }

    /// All canvases the user owns or is shared on, newest first.
    pub async fn list_accessible(&self, email: &str, with_elements: bool) -> Result<Vec<CanvasSummary>> {
        let Some(user) = self.credentials.find_by_email(email).await? else {
            return Ok(Vec::new());
        };

        if with_elements {
            let sql = format!(
                "SELECT id, name, owner, shared, elements, created_at, updated_at FROM canvas {}",
                ACCESSIBLE_FILTER
            );
            let canvases = self
                .db
                .bounded(
                    sqlx::query_as::<_, Canvas>(&sql)
                        .bind(&user.id)
                        .bind(&user.id)
                        .fetch_all(self.db.pool()),
                )
                .await?;
            return Ok(canvases.into_iter().map(CanvasSummary::from).collect());
        }

        let sql = format!(
            "SELECT id, name, owner, shared, created_at FROM canvas {}",
            ACCESSIBLE_FILTER
        );
        self.db
            .bounded(
                sqlx::query_as::<_, CanvasSummary>(&sql)
                    .bind(&user.id)
                    .bind(&user.id)
                    .fetch_all(self.db.pool()),
            )
            .await
    }

    pub async fn create(&self, email: &str, name: &str) -> Result<Canvas> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Canvas name is required".to_string()));
        }

        let owner = self.require_user(email, "User not found").await?;
        let canvas = Canvas::new(name, owner.id);

        self.db
            .bounded(
                sqlx::query(
                    "INSERT INTO canvas (id, name, owner, shared, elements, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(&canvas.id)
                .bind(&canvas.name)
                .bind(&canvas.owner)
                .bind(Json(&canvas.shared))
                .bind(Json(&canvas.elements))
                .bind(canvas.created_at)
                .bind(canvas.updated_at)
                .execute(self.db.pool()),
            )
            .await?;

        info!("[Canvas] Created {} ({}) for {}", canvas.id, canvas.name, email);

        Ok(canvas)
    }

    pub async fn get_by_id(&self, id: &str, email: &str) -> Result<Canvas> {
        self.editable(id, email).await
    }

    /// Replace `elements` wholesale. Concurrent writers are not detected;
    /// whichever statement commits last wins.
    pub async fn update(&self, id: &str, email: &str, elements: Vec<Value>) -> Result<Canvas> {
        self.editable(id, email).await?;

        let updated = self
            .db
            .bounded(
                sqlx::query_as::<_, Canvas>(
                    "UPDATE canvas SET elements = ?, updated_at = ? WHERE id = ? \
                     RETURNING id, name, owner, shared, elements, created_at, updated_at",
                )
                .bind(Json(&elements))
                .bind(Utc::now())
                .bind(id)
                .fetch_optional(self.db.pool()),
            )
            .await?;

        // Deleted between the access check and the write
        let canvas = updated.ok_or_else(|| Error::NotFound(NOT_FOUND_OR_DENIED.to_string()))?;

        debug!("[Canvas] Updated {} ({} elements)", canvas.id, canvas.elements.len());

        Ok(canvas)
    }

    pub async fn share(&self, id: &str, owner_email: &str, shared_with_email: &str) -> Result<Canvas> {
        let owner = self.require_user(owner_email, "Owner not found").await?;

        let canvas = self
            .fetch(id)
            .await?
            .ok_or_else(|| Error::NotFound("Canvas not found".to_string()))?;

        if !Access::of(&owner.id, &canvas).can_manage() {
            return Err(Error::Forbidden("Only the owner can share the canvas"));
        }

        let target = self
            .require_user(shared_with_email.trim(), "User to share with not found")
            .await?;

        let target_access = Access::of(&target.id, &canvas);
        if target_access.is_owner {
            return Err(Error::Conflict(
                "Canvas is already owned by this user".to_string(),
            ));
        }
        if target_access.is_member {
            return Err(already_shared());
        }

        // Membership is re-checked inside the statement so racing shares
        // of the same user cannot both append.
        let shared = self
            .db
            .bounded(
                sqlx::query_as::<_, Canvas>(
                    "UPDATE canvas SET shared = json_insert(shared, '$[#]', ?), updated_at = ? \
                     WHERE id = ? AND NOT EXISTS \
                     (SELECT 1 FROM json_each(canvas.shared) WHERE json_each.value = ?) \
                     RETURNING id, name, owner, shared, elements, created_at, updated_at",
                )
                .bind(&target.id)
                .bind(Utc::now())
                .bind(id)
                .bind(&target.id)
                .fetch_optional(self.db.pool()),
            )
            .await?;

        let Some(canvas) = shared else {
            // Lost the race: either someone else shared first or the canvas is gone
            return match self.fetch(id).await? {
                Some(_) => Err(already_shared()),
                None => Err(Error::NotFound("Canvas not found".to_string())),
            };
        };

        info!("[Canvas] Shared {} with {}", canvas.id, target.email);

        Ok(canvas)
    }

    pub async fn delete(&self, id: &str, email: &str) -> Result<()> {
        let user = self.require_user(email, "User not found").await?;

        let canvas = self
            .fetch(id)
            .await?
            .ok_or_else(|| Error::NotFound("Canvas not found".to_string()))?;

        if !Access::of(&user.id, &canvas).can_manage() {
            return Err(Error::Forbidden("Only the owner can delete the canvas"));
        }

        let result = self
            .db
            .bounded(
                sqlx::query("DELETE FROM canvas WHERE id = ? AND owner = ?")
                    .bind(id)
                    .bind(&user.id)
                    .execute(self.db.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Canvas not found".to_string()));
        }

        info!("[Canvas] Deleted {} by {}", id, email);

        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Option<Canvas>> {
        self.db
            .bounded(
                sqlx::query_as::<_, Canvas>(SELECT_CANVAS)
                    .bind(id)
                    .fetch_optional(self.db.pool()),
            )
            .await
    }

    async fn require_user(&self, email: &str, missing: &str) -> Result<User> {
        self.credentials
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::NotFound(missing.to_string()))
    }

    /// Resolve the caller and the canvas, requiring owner or member.
    /// Unknown user, unknown canvas and no access all yield the same error.
    async fn editable(&self, id: &str, email: &str) -> Result<Canvas> {
        let not_found = || Error::NotFound(NOT_FOUND_OR_DENIED.to_string());

        let user = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or_else(not_found)?;
        let canvas = self.fetch(id).await?.ok_or_else(not_found)?;

        if !Access::of(&user.id, &canvas).can_edit() {
            debug!("[Canvas] {} denied access to {}", email, id);
            return Err(not_found());
        }

        Ok(canvas)
    }
}

fn already_shared() -> Error {
    Error::Conflict("Canvas is already shared with this user".to_string())
}
