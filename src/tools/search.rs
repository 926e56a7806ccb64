//! Web search tool (`search_tool`)
//!
//! Optional supplementary search backed by SerpAPI's Google Light engine.
//! Availability is decided once, when the tool is built from configuration:
//! without a `SERPAPI_API_KEY` every call degrades to a "not available"
//! failure instead of reaching out to the network.

use serpapi_search_rust::serp_api_search::SerpApiSearch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ToolKind, ToolOutput};
use crate::config::SearchConfig;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search provider not available")]
    NotAvailable,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),

    #[error("No results found for query")]
    NoResults,
}

/// One organic search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchTool {
    api_key: Option<String>,
    max_results: usize,
}

impl SearchTool {
    /// Build from config; the tool is available only when a key is present
    pub fn from_config(config: &SearchConfig) -> Self {
        let api_key = Some(config.serpapi_key.trim().to_string()).filter(|k| !k.is_empty());
        if api_key.is_some() {
            info!("Search tool enabled (SerpAPI)");
        } else {
            info!("SERPAPI_API_KEY not set, search tool disabled");
        }
        Self {
            api_key,
            max_results: config.max_results.max(1),
        }
    }

    pub fn disabled() -> Self {
        Self {
            api_key: None,
            max_results: 5,
        }
    }

    pub fn available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a search and render the results for an agent prompt
    pub async fn search(&self, query: &str) -> ToolOutput {
        match self.search_results(query).await {
            Ok(results) => ToolOutput::Text(format_results(&results)),
            Err(e) => {
                warn!(error = %e, "Search tool failed");
                ToolOutput::failed(ToolKind::Search, e.to_string())
            }
        }
    }

    pub async fn search_results(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let api_key = self.api_key.as_ref().ok_or(SearchError::NotAvailable)?;

        info!(query = %query, "Searching Google Light via SerpAPI");

        let mut params = HashMap::<String, String>::new();
        params.insert("engine".to_string(), "google_light".to_string());
        params.insert("q".to_string(), query.to_string());
        params.insert("hl".to_string(), "en".to_string());
        params.insert("gl".to_string(), "us".to_string());
        params.insert("num".to_string(), self.max_results.to_string());

        let search = SerpApiSearch::google(params, api_key.clone());

        let results = search
            .json()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        debug!("Raw search response received");
        parse_organic_results(&results, self.max_results)
    }
}

fn parse_organic_results(
    results: &serde_json::Value,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    if let Some(error) = results.get("error").and_then(|v| v.as_str()) {
        return Err(SearchError::RequestFailed(error.to_string()));
    }

    let organic_results = results.get("organic_results").ok_or(SearchError::NoResults)?;

    let results_array = organic_results
        .as_array()
        .ok_or_else(|| SearchError::ParseError("Expected array of results".to_string()))?;

    if results_array.is_empty() {
        return Err(SearchError::NoResults);
    }

    Ok(results_array
        .iter()
        .take(max_results)
        .map(|result| SearchResult {
            title: result
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("Untitled")
                .to_string(),
            snippet: result
                .get("snippet")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            link: result
                .get("link")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            date: result.get("date").and_then(|v| v.as_str()).map(String::from),
        })
        .collect())
}

fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| {
            let date = r.date.as_deref().map(|d| format!(" [{}]", d)).unwrap_or_default();
            format!("- {} ({}){}: {}", r.title, r.link, date, r.snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
