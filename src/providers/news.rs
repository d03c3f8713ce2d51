//! HTTP client for the newsapi.org top-headlines endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use super::{Article, FetchError, NewsProvider};

const API_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";

/// Client for the newsapi.org top-headlines API.
pub struct NewsApi {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    content: Option<String>,
}

impl NewsApi {
    /// Create a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(API_ENDPOINT, api_key)
    }

    /// Create a client against a custom endpoint (for testing).
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NewsProvider for NewsApi {
    async fn fetch_headlines(
        &self,
        terms: &[String],
        country: &str,
        language: &str,
    ) -> Result<Vec<Article>, FetchError> {
        let mut articles = Vec::new();

        for term in terms {
            tracing::debug!(term, country, language, "requesting headlines");
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[("q", term.as_str()), ("country", country), ("language", language)])
                .header("X-Api-Key", &self.api_key)
                .send()
                .await
                .map_err(|e| FetchError::NoConnection(e.to_string()))?;

            if !response.status().is_success() {
                return Err(FetchError::Rejected(format!(
                    "status {}",
                    response.status()
                )));
            }

            let body: HeadlinesResponse = response
                .json()
                .await
                .map_err(|e| FetchError::Rejected(e.to_string()))?;

            for raw in body.articles {
                let (Some(title), Some(url)) = (raw.title, raw.url) else {
                    continue;
                };
                // The API truncates `content`; prefer the description when
                // one is present.
                let content = raw
                    .description
                    .filter(|d| !d.is_empty())
                    .or(raw.content)
                    .unwrap_or_default();
                articles.push(Article {
                    title,
                    url,
                    content,
                });
            }
        }

        Ok(articles)
    }
}
