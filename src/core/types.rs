//! Shared core types for the dashboard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day; repeating schedules re-arm at this interval.
pub const DAY_SECONDS: u64 = 86_400;

/// The kind of refresh a scheduled update performs.
///
/// Queued actions carry this tag and are dispatched by matching on it,
/// never by comparing callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Covid statistics refresh.
    Covid,
    /// News headlines refresh.
    News,
}

impl Category {
    /// Get the lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Covid => "covid",
            Category::News => "news",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
