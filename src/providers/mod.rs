//! External data capabilities: covid statistics and news headlines.
//!
//! The engine only ever talks to these traits. HTTP implementations live in
//! submodules; canned mocks for tests live in [`crate::testing`].

mod covid;
mod news;

pub use covid::UkCovidApi;
pub use news::NewsApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ways a provider request can fail. Callers absorb these into cache error
/// state rather than propagating them; the page driver discovers failures
/// by observing the error sentinel in the snapshot it reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider could not be reached.
    #[error("no connection: {0}")]
    NoConnection(String),

    /// The provider answered with no data.
    #[error("empty result")]
    EmptyResult,

    /// The provider rejected the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// One day's observation for an area. Series are ordered newest first;
/// values not yet published are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: String,
    pub area_name: String,
    pub daily_cases: Option<i64>,
    pub hospital_cases: Option<i64>,
    pub cumulative_deaths: Option<i64>,
}

/// A news article as displayed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Capability: fetch the daily case series for an area.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch the series for `(area_name, area_type)`, newest observation
    /// first.
    async fn fetch_series(
        &self,
        area_name: &str,
        area_type: &str,
    ) -> Result<Vec<CaseRecord>, FetchError>;
}

/// Capability: fetch top headlines for a set of search terms.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch headlines, one request per term, concatenated in term order.
    async fn fetch_headlines(
        &self,
        terms: &[String],
        country: &str,
        language: &str,
    ) -> Result<Vec<Article>, FetchError>;
}
