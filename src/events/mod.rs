//! Lifecycle events and event handling.
//!
//! The engine emits events as refreshes run and schedules change, enabling
//! observability without coupling the engine to any particular sink.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::core::types::Category;

/// Lifecycle events emitted by the dashboard engine.
#[derive(Debug, Clone)]
pub enum Event {
    /// A refresh has started.
    RefreshStarted {
        category: Category,
        timestamp: Instant,
    },

    /// A refresh finished; `success` is false when any fetch failed.
    RefreshCompleted {
        category: Category,
        success: bool,
        timestamp: Instant,
    },

    /// A schedule entry was created.
    ScheduleAdded { title: String, timestamp: Instant },

    /// A schedule entry was removed, by the user or by retiring a fired
    /// one-shot.
    ScheduleRemoved { title: String, timestamp: Instant },

    /// A repeating schedule was re-queued for the next day.
    ScheduleRearmed { title: String, timestamp: Instant },
}

impl Event {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> Instant {
        match self {
            Event::RefreshStarted { timestamp, .. } => *timestamp,
            Event::RefreshCompleted { timestamp, .. } => *timestamp,
            Event::ScheduleAdded { timestamp, .. } => *timestamp,
            Event::ScheduleRemoved { timestamp, .. } => *timestamp,
            Event::ScheduleRearmed { timestamp, .. } => *timestamp,
        }
    }

    /// Create a RefreshStarted event.
    pub fn refresh_started(category: Category) -> Self {
        Event::RefreshStarted {
            category,
            timestamp: Instant::now(),
        }
    }

    /// Create a RefreshCompleted event.
    pub fn refresh_completed(category: Category, success: bool) -> Self {
        Event::RefreshCompleted {
            category,
            success,
            timestamp: Instant::now(),
        }
    }

    /// Create a ScheduleAdded event.
    pub fn schedule_added(title: impl Into<String>) -> Self {
        Event::ScheduleAdded {
            title: title.into(),
            timestamp: Instant::now(),
        }
    }

    /// Create a ScheduleRemoved event.
    pub fn schedule_removed(title: impl Into<String>) -> Self {
        Event::ScheduleRemoved {
            title: title.into(),
            timestamp: Instant::now(),
        }
    }

    /// Create a ScheduleRearmed event.
    pub fn schedule_rearmed(title: impl Into<String>) -> Self {
        Event::ScheduleRearmed {
            title: title.into(),
            timestamp: Instant::now(),
        }
    }
}

/// Handler for receiving lifecycle events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle an event.
    async fn handle(&self, event: &Event);
}

/// Event bus for distributing events to registered handlers.
pub struct EventBus {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    /// Create a new event bus with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register an event handler.
    pub async fn register(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().await;
        handlers.push(handler);
    }

    /// Emit an event to all registered handlers.
    pub async fn emit(&self, event: Event) {
        let handlers = self.handlers.read().await;
        for handler in handlers.iter() {
            handler.handle(&event).await;
        }
    }

    /// Get the number of registered handlers.
    pub async fn handler_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
