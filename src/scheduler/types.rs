//! Engine type definitions: errors, snapshots, and the command protocol.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::config::ConfigError;
use crate::core::clock::TimeSpecError;
use crate::core::types::Category;
use crate::covid::CovidSnapshot;
use crate::providers::Article;

use super::registry::ScheduleEntry;

/// Errors that can occur in the dashboard engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The submitted time was neither a clock string nor a numeric delay.
    #[error("invalid time specification: {0}")]
    InvalidTimeSpec(#[from] TimeSpecError),

    /// No unique label could be allocated for the requested name.
    #[error("no unique schedule label available for: {0}")]
    LabelExhausted(String),

    /// No schedule entry with the given title exists.
    #[error("schedule not found: {0}")]
    ScheduleNotFound(String),

    /// Config persistence error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Channel error.
    #[error("channel error: {0}")]
    ChannelError(String),
}

/// A read-only view of everything the dashboard page renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Last-known covid statistics.
    pub covid: CovidSnapshot,
    /// The visible news window, at most four articles.
    pub news: Vec<Article>,
    /// Error from the last failed news refresh, if any.
    pub news_error: Option<String>,
    /// All schedule entries in insertion order.
    pub schedules: Vec<ScheduleEntry>,
}

/// Commands that can be sent to the engine.
pub(crate) enum EngineCommand {
    /// Drain due actions, retry failed caches, and return the snapshot.
    Poll {
        response: oneshot::Sender<DashboardSnapshot>,
    },
    /// Return the snapshot without advancing the queue.
    Snapshot {
        response: oneshot::Sender<DashboardSnapshot>,
    },
    /// Create a schedule entry for one category.
    SubmitSchedule {
        time: String,
        label: String,
        repeat: bool,
        category: Category,
        response: oneshot::Sender<Result<ScheduleEntry, EngineError>>,
    },
    /// Remove a schedule entry and cancel its queued action.
    CancelSchedule {
        title: String,
        response: oneshot::Sender<Result<(), EngineError>>,
    },
    /// Remove an article from the window and blacklist its title.
    CloseArticle {
        title: String,
        response: oneshot::Sender<Vec<String>>,
    },
    /// Stop the engine.
    Shutdown { response: oneshot::Sender<()> },
}
