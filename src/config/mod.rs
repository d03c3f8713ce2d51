//! Persisted configuration: the document schema and its stores.
//!
//! The config document is a single JSON file holding the news API key, the
//! fetch locations, and the persisted schedule list. A corrupt or missing
//! document is recreated from defaults rather than crashing the process.

mod error;
mod memory;
mod store;
mod types;

pub use error::ConfigError;
pub use memory::InMemoryConfigStore;
pub use store::{ConfigStore, JsonConfigStore};
pub use types::{
    ConfigDoc, LocationConfig, ResolvedLocation, DEFAULT_LOCAL_NAME, DEFAULT_LOCAL_TYPE,
    DEFAULT_NATION_NAME, DEFAULT_NATION_TYPE,
};
