//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's wire schema but are defined independently
//! so the client never links against Axum or sqlx. The integration test
//! catches any schema drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for create and update.
///
/// Update is a full overwrite: a `None` description clears the stored one.
/// On create the server ignores `completed` and always starts at `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPayload {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl From<&Todo> for TodoPayload {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
        }
    }
}

/// Which subset of todos `GET /todos` should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Status(bool),
    Search(String),
}
