//! HTTP handlers for `/todos` and `/health`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{ListFilter, ListParams, Todo, TodoPayload};
use crate::service::TodoService;

pub fn router() -> Router<TodoService> {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_todos(
    State(service): State<TodoService>,
    Query(params): Query<ListParams>,
) -> ServiceResult<Json<Vec<Todo>>> {
    let filter = ListFilter::from(params);
    tracing::debug!(?filter, "listing todos");
    service.list(&filter).await.map(Json)
}

async fn create_todo(
    State(service): State<TodoService>,
    Json(input): Json<TodoPayload>,
) -> ServiceResult<(StatusCode, Json<Todo>)> {
    let todo = service.create_todo(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Todo>> {
    service
        .get_todo_by_id(id)
        .await?
        .map(Json)
        .ok_or(ServiceError::NotFound(id))
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<i64>,
    Json(input): Json<TodoPayload>,
) -> ServiceResult<Json<Todo>> {
    service.update_todo(id, input).await.map(Json)
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<i64>,
) -> ServiceResult<StatusCode> {
    service.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
