//! API response types.

use serde::Serialize;

use crate::covid::CovidSnapshot;
use crate::providers::Article;
use crate::scheduler::{DashboardSnapshot, ScheduleEntry};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Full dashboard render data.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub covid: CovidSnapshot,
    pub news: Vec<Article>,
    pub news_error: Option<String>,
    pub schedules: Vec<ScheduleEntry>,
    pub schedule_count: usize,
}

impl From<DashboardSnapshot> for DashboardResponse {
    fn from(snapshot: DashboardSnapshot) -> Self {
        Self {
            covid: snapshot.covid,
            news: snapshot.news,
            news_error: snapshot.news_error,
            schedule_count: snapshot.schedules.len(),
            schedules: snapshot.schedules,
        }
    }
}

/// Response to a schedule submission; one entry per requested category.
#[derive(Debug, Serialize)]
pub struct ScheduleCreatedResponse {
    pub created: Vec<ScheduleEntry>,
    pub count: usize,
}

/// Blacklist state after closing an article.
#[derive(Debug, Serialize)]
pub struct BlacklistResponse {
    pub blacklist: Vec<String>,
    pub count: usize,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
