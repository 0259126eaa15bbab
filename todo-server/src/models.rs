//! Wire and row types for the todo service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A persisted todo item. Doubles as the row type and the JSON response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update.
///
/// Clients usually send a whole `Todo` back; `id` and the timestamps are
/// unknown fields here and are dropped during deserialization.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TodoPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Query parameters accepted by `GET /todos`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<bool>,
    pub search: Option<String>,
}

/// `?status=` with no value counts as absent; anything else must be a bool.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The list filter actually applied after resolving `ListParams`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Status(bool),
    Search(String),
}

impl From<ListParams> for ListFilter {
    /// `status` wins over `search`; an empty `search` means no filter.
    fn from(params: ListParams) -> Self {
        match (params.status, params.search) {
            (Some(flag), _) => ListFilter::Status(flag),
            (None, Some(text)) if !text.is_empty() => ListFilter::Search(text),
            _ => ListFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_with_camel_case_keys() {
        let now = Utc::now();
        let todo = Todo {
            id: 7,
            title: "Test".to_string(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Test");
        assert!(json["description"].is_null());
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn payload_defaults_optional_fields() {
        let input: TodoPayload = serde_json::from_str(r#"{"title":"No extras"}"#).unwrap();
        assert_eq!(input.title, "No extras");
        assert!(input.description.is_none());
        assert!(!input.completed);
    }

    #[test]
    fn payload_ignores_id_and_timestamps() {
        let input: TodoPayload = serde_json::from_str(
            r#"{"id":42,"title":"Full","description":"d","completed":true,"createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(input.title, "Full");
        assert_eq!(input.description.as_deref(), Some("d"));
        assert!(input.completed);
    }

    #[test]
    fn payload_rejects_missing_title() {
        let result: Result<TodoPayload, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_takes_priority_over_search() {
        let params = ListParams {
            status: Some(true),
            search: Some("milk".to_string()),
        };
        assert_eq!(ListFilter::from(params), ListFilter::Status(true));
    }

    #[test]
    fn empty_status_is_absent() {
        let params: ListParams = serde_json::from_str(r#"{"status":"","search":"milk"}"#).unwrap();
        assert!(params.status.is_none());
        assert_eq!(ListFilter::from(params), ListFilter::Search("milk".to_string()));
    }

    #[test]
    fn status_must_be_a_bool() {
        let params: ListParams = serde_json::from_str(r#"{"status":"false"}"#).unwrap();
        assert_eq!(params.status, Some(false));
        assert!(serde_json::from_str::<ListParams>(r#"{"status":"maybe"}"#).is_err());
    }

    #[test]
    fn empty_search_means_no_filter() {
        let params = ListParams {
            status: None,
            search: Some(String::new()),
        };
        assert_eq!(ListFilter::from(params), ListFilter::All);
        assert_eq!(ListFilter::from(ListParams::default()), ListFilter::All);
    }
}
