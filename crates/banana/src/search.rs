use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::SearchError;
use crate::models::search::SearchResult;

pub const BRAVE_HOST: &str = "https://api.search.brave.com";
pub const DEFAULT_RESULT_COUNT: usize = 5;

/// A web search collaborator used to ground answers in current information
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            host: BRAVE_HOST.to_string(),
            api_key: None,
            count: DEFAULT_RESULT_COUNT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<SearchResult>,
}

pub struct BraveSearch {
    client: Client,
    config: SearchConfig,
}

impl BraveSearch {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SearchProvider for BraveSearch {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SearchError::MissingCredentials)?;

        let url = format!(
            "{}/res/v1/web/search",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .query(&[("q", query.to_string()), ("count", count.to_string())])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let body: BraveResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        Ok(body
            .web
            .map(|web| web.results.into_iter().take(count).collect())
            .unwrap_or_default())
    }
}
