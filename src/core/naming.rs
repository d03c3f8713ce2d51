//! Unique label allocation for schedule entries.
//!
//! Schedule titles double as keys in the delay queue and the UI, so they
//! must be unique. Collisions are resolved by appending a numeric suffix to
//! the requested name; after 128 attempts the request is abandoned.

use std::collections::HashSet;

use super::types::Category;

/// Maximum suffix attempts before a request is abandoned.
const MAX_ATTEMPTS: u32 = 128;

/// An allocated schedule label: the display title used as the entry's key,
/// and the bare name it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedLabel {
    pub title: String,
    pub name: String,
}

/// Build a collision-free title of the form `"{category} update: {name}"`.
///
/// The requested name is tried first, then `name(1)`, `name(2)`, and so on.
/// Returns `None` once 128 candidates have collided, telling the caller to
/// abandon the scheduling request.
pub fn allocate_label(
    requested: &str,
    category: Category,
    existing_titles: &HashSet<String>,
) -> Option<AllocatedLabel> {
    let mut name = requested.to_string();
    for attempt in 1..=MAX_ATTEMPTS {
        let title = format!("{} update: {}", category, name);
        if !existing_titles.contains(&title) {
            return Some(AllocatedLabel { title, name });
        }
        tracing::debug!(requested, attempt, "schedule label collision");
        name = format!("{}({})", requested, attempt);
    }
    tracing::warn!(
        requested,
        "no unique schedule label found after {} attempts, dropping request",
        MAX_ATTEMPTS
    );
    None
}
