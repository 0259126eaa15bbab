//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the caller executes the round-trip.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, TodoFilter, TodoPayload};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /todos`, with `status` or `search` in the query string when the
    /// filter asks for it. An empty search sends no query at all.
    pub fn build_list_todos(&self, filter: &TodoFilter) -> HttpRequest {
        let query = match filter {
            TodoFilter::All => String::new(),
            TodoFilter::Status(completed) => format!("?status={completed}"),
            TodoFilter::Search(text) if text.is_empty() => String::new(),
            TodoFilter::Search(text) => format!("?search={}", urlencoding::encode(text)),
        };
        HttpRequest::bodyless(HttpMethod::Get, format!("{}/todos{query}", self.base_url))
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::bodyless(HttpMethod::Get, self.item_url(id))
    }

    pub fn build_create_todo(&self, input: &TodoPayload) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(
            HttpMethod::Post,
            format!("{}/todos", self.base_url),
            to_json(input)?,
        ))
    }

    pub fn build_update_todo(&self, id: i64, input: &TodoPayload) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::json(HttpMethod::Put, self.item_url(id), to_json(input)?))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::bodyless(HttpMethod::Delete, self.item_url(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        from_json(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

fn to_json(input: &TodoPayload) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
