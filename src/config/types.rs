//! Configuration document schema.

use serde::{Deserialize, Serialize};

use crate::scheduler::ScheduleEntry;

/// Default local area when the config does not name one.
pub const DEFAULT_LOCAL_NAME: &str = "Exeter";
/// Area type of the default local area.
pub const DEFAULT_LOCAL_TYPE: &str = "ltla";
/// Default national area.
pub const DEFAULT_NATION_NAME: &str = "england";
/// Area type of the default national area.
pub const DEFAULT_NATION_TYPE: &str = "nation";

/// The persisted configuration document (`config.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDoc {
    /// API key for the news provider.
    pub api_key: String,
    /// Areas to fetch covid statistics for.
    pub location: LocationConfig,
    /// Persisted schedule records, reloaded at startup.
    pub schedules: Vec<ScheduleEntry>,
}

/// Location section of the config document. All fields are optional; see
/// [`LocationConfig::resolve`] for the defaulting rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub local_name: Option<String>,
    pub local_type: Option<String>,
    pub nation_name: Option<String>,
    pub nation_type: Option<String>,
}

/// Fetch locations with defaulting applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// `(area_name, area_type)` for the local request.
    pub local: (String, String),
    /// `(area_name, area_type)` for the national request.
    pub nation: (String, String),
}

impl LocationConfig {
    /// Apply the defaulting rules: a configured area is used only when both
    /// its name and type are present, otherwise the built-in default area
    /// takes its place.
    pub fn resolve(&self) -> ResolvedLocation {
        let local = match (&self.local_name, &self.local_type) {
            (Some(name), Some(kind)) => (name.clone(), kind.clone()),
            _ => (
                DEFAULT_LOCAL_NAME.to_string(),
                DEFAULT_LOCAL_TYPE.to_string(),
            ),
        };
        let nation = match (&self.nation_name, &self.nation_type) {
            (Some(name), Some(kind)) => (name.clone(), kind.clone()),
            _ => (
                DEFAULT_NATION_NAME.to_string(),
                DEFAULT_NATION_TYPE.to_string(),
            ),
        };
        ResolvedLocation { local, nation }
    }
}
