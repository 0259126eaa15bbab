//! Business rules on top of the repository.
//!
//! `TodoService` owns nothing but a pool handle, so it is cheap to clone into
//! every request. Reads run on a pooled connection; writes run inside a
//! transaction and commit exactly one mutation.
//!
//! Write transactions start with `BEGIN IMMEDIATE`. A deferred transaction
//! that reads before writing gets `SQLITE_BUSY` on lock upgrade without
//! waiting; an immediate one queues on the busy timeout instead.

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{ListFilter, Todo, TodoPayload};
use crate::repository;

#[derive(Clone, Debug)]
pub struct TodoService {
    pool: SqlitePool,
}

impl TodoService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_todos(&self) -> ServiceResult<Vec<Todo>> {
        let mut conn = self.pool.acquire().await?;
        Ok(repository::find_all(&mut conn).await?)
    }

    /// Missing ids are `Ok(None)`, not an error.
    pub async fn get_todo_by_id(&self, id: i64) -> ServiceResult<Option<Todo>> {
        let mut conn = self.pool.acquire().await?;
        Ok(repository::find_by_id(&mut conn, id).await?)
    }

    /// New todos always start incomplete, whatever the payload says.
    pub async fn create_todo(&self, mut payload: TodoPayload) -> ServiceResult<Todo> {
        validate(&payload)?;
        payload.completed = false;

        let mut tx = self.begin_write().await?;
        let todo = repository::save(&mut tx, None, &payload).await?;
        tx.commit().await?;

        tracing::info!(id = todo.id, "created todo");
        Ok(todo)
    }

    /// Overwrite title, description and completed on an existing todo.
    /// An unknown id is reported before any payload validation.
    pub async fn update_todo(&self, id: i64, payload: TodoPayload) -> ServiceResult<Todo> {
        let mut tx = self.begin_write().await?;
        let existing = repository::find_by_id(&mut tx, id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        validate(&payload)?;
        let todo = repository::save(&mut tx, Some(existing.id), &payload).await?;
        tx.commit().await?;

        tracing::info!(id, "updated todo");
        Ok(todo)
    }

    pub async fn delete_todo(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.begin_write().await?;
        if !repository::exists_by_id(&mut tx, id).await? {
            return Err(ServiceError::NotFound(id));
        }
        repository::delete_by_id(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(id, "deleted todo");
        Ok(())
    }

    pub async fn get_todos_by_status(&self, completed: bool) -> ServiceResult<Vec<Todo>> {
        let mut conn = self.pool.acquire().await?;
        Ok(repository::find_by_completed(&mut conn, completed).await?)
    }

    pub async fn search_todos_by_title(&self, text: &str) -> ServiceResult<Vec<Todo>> {
        let mut conn = self.pool.acquire().await?;
        Ok(repository::find_by_title_containing(&mut conn, text).await?)
    }

    async fn begin_write(&self) -> ServiceResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Dispatch a resolved list filter to the matching query.
    pub async fn list(&self, filter: &ListFilter) -> ServiceResult<Vec<Todo>> {
        match filter {
            ListFilter::Status(completed) => self.get_todos_by_status(*completed).await,
            ListFilter::Search(text) => self.search_todos_by_title(text).await,
            ListFilter::All => self.get_all_todos().await,
        }
    }
}

fn validate(payload: &TodoPayload) -> ServiceResult<()> {
    if payload.title.trim().is_empty() {
        return Err(ServiceError::Validation("title must not be blank".to_string()));
    }
    Ok(())
}
