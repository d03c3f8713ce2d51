//! HTTP client for the UK coronavirus dashboard API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{CaseRecord, DataProvider, FetchError};

const API_ENDPOINT: &str = "https://api.coronavirus.data.gov.uk/v1/data";

/// Area types the API accepts; anything else is rejected before a request
/// is made.
const AREA_TYPES: &[&str] = &["overview", "nation", "region", "nhsRegion", "utla", "ltla"];

/// Structure parameter for nation-level requests. Hospital and deaths
/// metrics are only published on the nation feed.
const NATION_STRUCTURE: &str = r#"{"date":"date","areaName":"areaName","newCasesBySpecimenDate":"newCasesBySpecimenDate","hospitalCases":"hospitalCases","cumDeaths28DaysByPublishDate":"cumDeaths28DaysByPublishDate"}"#;

/// Structure parameter for all other area types.
const LOCAL_STRUCTURE: &str = r#"{"date":"date","areaName":"areaName","newCasesBySpecimenDate":"newCasesBySpecimenDate"}"#;

/// Client for the UK coronavirus dashboard data API.
pub struct UkCovidApi {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ApiRecord>,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    date: String,
    #[serde(rename = "areaName")]
    area_name: String,
    #[serde(rename = "newCasesBySpecimenDate")]
    daily_cases: Option<i64>,
    #[serde(rename = "hospitalCases", default)]
    hospital_cases: Option<i64>,
    #[serde(rename = "cumDeaths28DaysByPublishDate", default)]
    cumulative_deaths: Option<i64>,
}

impl UkCovidApi {
    /// Create a client against the public API endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(API_ENDPOINT)
    }

    /// Create a client against a custom endpoint (for testing).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn structure(area_type: &str) -> &'static str {
        if area_type == "nation" {
            NATION_STRUCTURE
        } else {
            LOCAL_STRUCTURE
        }
    }
}

impl Default for UkCovidApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for UkCovidApi {
    async fn fetch_series(
        &self,
        area_name: &str,
        area_type: &str,
    ) -> Result<Vec<CaseRecord>, FetchError> {
        if !AREA_TYPES.contains(&area_type) {
            return Err(FetchError::Rejected(format!(
                "unsupported area type: {}",
                area_type
            )));
        }

        let filters = format!("areaType={};areaName={}", area_type, area_name);
        tracing::debug!(%filters, "requesting covid series");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("filters", filters.as_str()),
                ("structure", Self::structure(area_type)),
            ])
            .send()
            .await
            .map_err(|e| FetchError::NoConnection(e.to_string()))?;

        if response.status() == StatusCode::NO_CONTENT {
            return Err(FetchError::EmptyResult);
        }
        if !response.status().is_success() {
            return Err(FetchError::Rejected(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Rejected(e.to_string()))?;
        if body.data.is_empty() {
            return Err(FetchError::EmptyResult);
        }

        Ok(body
            .data
            .into_iter()
            .map(|r| CaseRecord {
                date: r.date,
                area_name: r.area_name,
                daily_cases: r.daily_cases,
                hospital_cases: r.hospital_cases,
                cumulative_deaths: r.cumulative_deaths,
            })
            .collect())
    }
}
