use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A shared canvas document.
///
/// `owner` and `shared` hold user ids. `elements` is opaque to the server
/// and is only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub id: String,
    pub name: String,
    pub owner: String,
    #[sqlx(json)]
    pub shared: Vec<String>,
    #[sqlx(json)]
    pub elements: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Canvas {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            owner: owner.into(),
            shared: Vec::new(),
            elements: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// List entry; `elements` is only present when explicitly requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    #[sqlx(json)]
    pub shared: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub elements: Option<Vec<Value>>,
}

impl From<Canvas> for CanvasSummary {
    fn from(canvas: Canvas) -> Self {
        Self {
            id: canvas.id,
            name: canvas.name,
            owner: canvas.owner,
            shared: canvas.shared,
            created_at: canvas.created_at,
            elements: Some(canvas.elements),
        }
    }
}
