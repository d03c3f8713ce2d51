//! Testing utilities for users of the covdash library.
//!
//! This module provides canned providers for driving the engine without
//! network access:
//!
//! - [`MockDataProvider`]: returns configured series per area
//! - [`MockNewsProvider`]: returns a configured article list or failure
//! - [`case_series`] / [`article`]: helpers for building fixture data

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::providers::{Article, CaseRecord, DataProvider, FetchError, NewsProvider};

type SeriesResult = Result<Vec<CaseRecord>, FetchError>;
type ArticlesResult = Result<Vec<Article>, FetchError>;

/// Data provider returning canned series keyed by `(area_name, area_type)`.
///
/// Areas without an explicit response fall back to the default response,
/// which starts as [`FetchError::EmptyResult`].
pub struct MockDataProvider {
    responses: RwLock<HashMap<(String, String), SeriesResult>>,
    default: RwLock<SeriesResult>,
    calls: AtomicUsize,
}

impl MockDataProvider {
    /// Create a provider that fails every request with an empty result.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            default: RwLock::new(Err(FetchError::EmptyResult)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider answering every area with the same series.
    pub fn with_default(series: Vec<CaseRecord>) -> Self {
        let provider = Self::new();
        provider.set_default(Ok(series));
        provider
    }

    /// Set the response for one area.
    pub fn set_response(&self, area_name: &str, area_type: &str, result: SeriesResult) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert((area_name.to_string(), area_type.to_string()), result);
        }
    }

    /// Set the fallback response for areas without an explicit one.
    pub fn set_default(&self, result: SeriesResult) {
        if let Ok(mut default) = self.default.write() {
            *default = result;
        }
    }

    /// Number of fetches made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for MockDataProvider {
    async fn fetch_series(
        &self,
        area_name: &str,
        area_type: &str,
    ) -> Result<Vec<CaseRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (area_name.to_string(), area_type.to_string());
        if let Ok(responses) = self.responses.read() {
            if let Some(result) = responses.get(&key) {
                return result.clone();
            }
        }
        self.default
            .read()
            .map(|d| d.clone())
            .unwrap_or(Err(FetchError::EmptyResult))
    }
}

/// News provider returning a single canned response.
pub struct MockNewsProvider {
    response: RwLock<ArticlesResult>,
    calls: AtomicUsize,
}

impl MockNewsProvider {
    /// Create a provider answering with the given articles.
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            response: RwLock::new(Ok(articles)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider failing every request.
    pub fn failing(error: FetchError) -> Self {
        Self {
            response: RwLock::new(Err(error)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the canned response.
    pub fn set_response(&self, result: ArticlesResult) {
        if let Ok(mut response) = self.response.write() {
            *response = result;
        }
    }

    /// Number of fetches made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    async fn fetch_headlines(
        &self,
        _terms: &[String],
        _country: &str,
        _language: &str,
    ) -> Result<Vec<Article>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .read()
            .map(|r| r.clone())
            .unwrap_or(Err(FetchError::EmptyResult))
    }
}

/// Build a newest-first case series from daily values, `None` marking days
/// not yet published.
pub fn case_series(area_name: &str, daily: &[Option<i64>]) -> Vec<CaseRecord> {
    daily
        .iter()
        .enumerate()
        .map(|(i, value)| CaseRecord {
            date: format!("2024-06-{:02}", 30usize.saturating_sub(i).max(1)),
            area_name: area_name.to_string(),
            daily_cases: *value,
            hospital_cases: None,
            cumulative_deaths: None,
        })
        .collect()
}

/// Build a nation-level series carrying hospital and deaths metrics on the
/// latest record.
pub fn nation_series(
    area_name: &str,
    daily: &[Option<i64>],
    hospital_cases: i64,
    total_deaths: i64,
) -> Vec<CaseRecord> {
    let mut series = case_series(area_name, daily);
    if let Some(first) = series.first_mut() {
        first.hospital_cases = Some(hospital_cases);
        first.cumulative_deaths = Some(total_deaths);
    }
    series
}

/// Build a fixture article from a title.
pub fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        url: format!("https://example.com/{}", title.replace(' ', "-")),
        content: format!("{} content", title),
    }
}
