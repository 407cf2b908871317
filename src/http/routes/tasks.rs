use axum::{extract::{Path, Query, State}, routing::{get, post}, Json, Router};
use http::StatusCode;
use serde::Deserialize;

use crate::{
    application::task_service::TaskService,
    domain::{
        error::EngineError,
        ordering::StatusFilter,
        task::{CreateTask, Importance, Task, TaskId, TaskStatus, UpdateTask},
    },
    http::types::{ApiError, ApiJson},
};

#[derive(Clone)]
pub struct AppState<S: TaskService> { pub service: S }

pub fn router<S: TaskService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/tasks", post(create_task::<S>).get(list_tasks::<S>))
        .route("/tasks/:id", get(get_task::<S>).put(update_task::<S>).delete(delete_task::<S>))
        .route("/tasks/:id/status", post(set_status::<S>))
        .route("/tasks/:id/move", post(move_task::<S>))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateBody { name: String, importance: Option<i64> }

#[derive(Deserialize)]
struct ListQuery { status: Option<String> }

#[derive(Deserialize)]
struct UpdateBody { name: Option<String>, importance: Option<i64>, status: Option<String> }

#[derive(Deserialize)]
struct StatusBody { status: String }

#[derive(Deserialize)]
struct MoveBody { index: i64 }

async fn create_task<S: TaskService>(State(state): State<AppState<S>>, ApiJson(payload): ApiJson<CreateBody>) -> Result<Json<Task>, ApiError> {
    let importance = payload.importance.map(parse_importance).transpose()?.unwrap_or_default();
    let task = state.service.create(CreateTask { name: payload.name, importance }).await?;
    Ok(Json(task))
}

async fn list_tasks<S: TaskService>(State(state): State<AppState<S>>, Query(query): Query<ListQuery>) -> Result<Json<serde_json::Value>, ApiError> {
    let filter = query.status.as_deref().map(str::parse::<StatusFilter>).transpose()?.unwrap_or_default();
    let tasks = state.service.list(filter).await?;
    Ok(Json(serde_json::json!({ "items": tasks })))
}

async fn get_task<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    state.service.get(id).await?.map(Json).ok_or_else(ApiError::not_found)
}

async fn update_task<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>, ApiJson(payload): ApiJson<UpdateBody>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let input = UpdateTask {
        name: payload.name,
        importance: payload.importance.map(parse_importance).transpose()?,
        status: payload.status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
    };
    state.service.update(id, input).await?.map(Json).ok_or_else(ApiError::not_found)
}

async fn set_status<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>, ApiJson(payload): ApiJson<StatusBody>) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let status: TaskStatus = payload.status.parse()?;
    state.service.set_status(id, status).await?.map(Json).ok_or_else(ApiError::not_found)
}

async fn move_task<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>, ApiJson(payload): ApiJson<MoveBody>) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;
    let index = usize::try_from(payload.index.max(0)).unwrap_or(usize::MAX);
    let tasks = state.service.move_to(id, index).await?;
    Ok(Json(serde_json::json!({ "items": tasks })))
}

async fn delete_task<S: TaskService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.service.delete(id).await? { Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::not_found()) }
}

fn parse_importance(raw: i64) -> Result<Importance, EngineError> {
    u8::try_from(raw)
        .map_err(|_| EngineError::validation(format!("importance must be 1, 2 or 3, got {raw}")))
        .and_then(Importance::try_from)
}

fn parse_id(s: &str) -> Result<TaskId, ApiError> { s.parse::<TaskId>().map_err(|_| ApiError::bad_request("invalid id")) }
