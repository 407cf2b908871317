use axum::{extract::{Path, State}, routing::{delete, get}, Json, Router};
use http::StatusCode;
use serde::Deserialize;

use crate::{
    application::day_service::{DayReport, DayService, HistoryReport},
    domain::summary::DaySummary,
    http::types::{ApiError, ApiJson},
};

#[derive(Clone)]
pub struct AppState<S: DayService> { pub service: S }

pub fn router<S: DayService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/today", get(today::<S>))
        .route("/history", get(list_history::<S>).post(finalize_day::<S>))
        .route("/history/stats", get(stats::<S>))
        .route("/history/:date", delete(delete_summary::<S>))
        .with_state(state)
}

#[derive(Deserialize)]
struct FinalizeBody { date: String }

async fn today<S: DayService>(State(state): State<AppState<S>>) -> Result<Json<DayReport>, ApiError> {
    Ok(Json(state.service.today().await?))
}

async fn finalize_day<S: DayService>(State(state): State<AppState<S>>, ApiJson(payload): ApiJson<FinalizeBody>) -> Result<Json<DaySummary>, ApiError> {
    Ok(Json(state.service.finalize(&payload.date).await?))
}

async fn list_history<S: DayService>(State(state): State<AppState<S>>) -> Result<Json<serde_json::Value>, ApiError> {
    let history = state.service.history().await?;
    Ok(Json(serde_json::json!({ "items": history })))
}

async fn stats<S: DayService>(State(state): State<AppState<S>>) -> Result<Json<HistoryReport>, ApiError> {
    Ok(Json(state.service.stats().await?))
}

async fn delete_summary<S: DayService>(State(state): State<AppState<S>>, Path(date): Path<String>) -> Result<StatusCode, ApiError> {
    if state.service.delete(&date).await? { Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::not_found()) }
}
