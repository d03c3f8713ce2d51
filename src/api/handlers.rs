//! API request handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::core::types::Category;
use crate::scheduler::DashboardHandle;

use super::errors::ApiError;
use super::responses::{
    BlacklistResponse, DashboardResponse, HealthResponse, MessageResponse,
    ScheduleCreatedResponse,
};

/// Shared application state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub handle: DashboardHandle,
}

/// Body of a schedule submission. The two booleans are category
/// checkboxes; either or both may be set.
#[derive(Debug, Deserialize)]
pub struct SubmitScheduleRequest {
    pub label: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub covid: bool,
    #[serde(default)]
    pub news: bool,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// The dashboard page: run due updates, then return the render snapshot.
pub async fn dashboard(
    State(state): State<ApiState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let snapshot = state.handle.poll().await?;
    Ok(Json(DashboardResponse::from(snapshot)))
}

/// Create schedule entries for the requested categories.
pub async fn submit_schedules(
    State(state): State<ApiState>,
    Json(request): Json<SubmitScheduleRequest>,
) -> Result<Json<ScheduleCreatedResponse>, ApiError> {
    let mut categories = Vec::new();
    if request.covid {
        categories.push(Category::Covid);
    }
    if request.news {
        categories.push(Category::News);
    }
    if categories.is_empty() {
        return Err(ApiError::BadRequest(
            "no update category selected".to_string(),
        ));
    }

    let mut created = Vec::new();
    for category in categories {
        let entry = state
            .handle
            .submit_schedule(
                request.time.clone(),
                request.label.clone(),
                request.repeat,
                category,
            )
            .await?;
        created.push(entry);
    }

    Ok(Json(ScheduleCreatedResponse {
        count: created.len(),
        created,
    }))
}

/// Remove a schedule entry by title.
pub async fn cancel_schedule(
    State(state): State<ApiState>,
    Path(title): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.handle.cancel_schedule(title.clone()).await?;
    Ok(Json(MessageResponse {
        message: format!("schedule '{}' removed", title),
    }))
}

/// Remove a news article from the window and blacklist its title.
pub async fn close_article(
    State(state): State<ApiState>,
    Path(title): Path<String>,
) -> Result<Json<BlacklistResponse>, ApiError> {
    let blacklist = state.handle.close_article(title).await?;
    Ok(Json(BlacklistResponse {
        count: blacklist.len(),
        blacklist,
    }))
}
