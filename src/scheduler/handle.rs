//! Dashboard handle for reaching the engine task.
//!
//! All engine state is owned by a single task; this handle sends commands
//! over a channel and awaits the response. It is cheap to clone and every
//! clone talks to the same engine.

use tokio::sync::{mpsc, oneshot};

use crate::core::types::Category;

use super::registry::ScheduleEntry;
use super::types::{DashboardSnapshot, EngineCommand, EngineError};

/// Buffer size for the command channel between handle and engine.
pub(crate) const COMMAND_CHANNEL_BUFFER: usize = 32;

/// Handle for driving the dashboard engine.
#[derive(Clone)]
pub struct DashboardHandle {
    pub(crate) command_tx: mpsc::Sender<EngineCommand>,
}

impl DashboardHandle {
    /// Send a command and wait for its response.
    async fn request<T>(
        &self,
        build_command: impl FnOnce(oneshot::Sender<T>) -> EngineCommand,
        operation: &str,
    ) -> Result<T, EngineError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(build_command(response_tx))
            .await
            .map_err(|_| {
                EngineError::ChannelError(format!("failed to send {} command", operation))
            })?;

        response_rx.await.map_err(|_| {
            EngineError::ChannelError(format!("failed to receive {} response", operation))
        })
    }

    /// Run every due refresh action, retry failed caches, and return the
    /// resulting snapshot. The page driver calls this once per page load;
    /// the queue only advances through this call.
    pub async fn poll(&self) -> Result<DashboardSnapshot, EngineError> {
        self.request(|response| EngineCommand::Poll { response }, "poll")
            .await
    }

    /// Read the current snapshot without advancing the queue.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, EngineError> {
        self.request(|response| EngineCommand::Snapshot { response }, "snapshot")
            .await
    }

    /// Schedule a refresh at the given time ("HH:MM", empty for immediate,
    /// or a number of seconds). Returns the created entry.
    pub async fn submit_schedule(
        &self,
        time: impl Into<String>,
        label: impl Into<String>,
        repeat: bool,
        category: Category,
    ) -> Result<ScheduleEntry, EngineError> {
        let time = time.into();
        let label = label.into();
        self.request(
            move |response| EngineCommand::SubmitSchedule {
                time,
                label,
                repeat,
                category,
                response,
            },
            "submit schedule",
        )
        .await?
    }

    /// Remove a schedule entry by title and cancel its pending action.
    pub async fn cancel_schedule(&self, title: impl Into<String>) -> Result<(), EngineError> {
        let title = title.into();
        self.request(
            move |response| EngineCommand::CancelSchedule { title, response },
            "cancel schedule",
        )
        .await?
    }

    /// Remove an article from the visible window and blacklist its title.
    /// Returns the updated blacklist.
    pub async fn close_article(&self, title: impl Into<String>) -> Result<Vec<String>, EngineError> {
        let title = title.into();
        self.request(
            move |response| EngineCommand::CloseArticle { title, response },
            "close article",
        )
        .await
    }

    /// Stop the engine task.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.request(|response| EngineCommand::Shutdown { response }, "shutdown")
            .await
    }
}
