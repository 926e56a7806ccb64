use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::crew::Orchestrator;
use crate::storage::DocumentStore;

pub const DEFAULT_QUERY: &str = "Analyze this financial document for investment insights";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: DocumentStore,
    pub orchestrator: Arc<Orchestrator>,
}

/// The user's question about the uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisQuery {
    pub text: String,
    pub defaulted_when_empty: bool,
}

impl AnalysisQuery {
    /// Trimmed form input, or [`DEFAULT_QUERY`] when missing or blank
    pub fn from_form(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(text) => Self {
                text: text.to_string(),
                defaulted_when_empty: false,
            },
            None => Self {
                text: DEFAULT_QUERY.to_string(),
                defaulted_when_empty: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: AnalysisStatus,
    pub query: String,
    pub analysis: String,
    pub file_processed: String,
}

impl AnalysisResult {
    pub fn success(query: &str, analysis: String, file_processed: &str) -> Self {
        Self {
            status: AnalysisStatus::Success,
            query: query.to_string(),
            analysis,
            file_processed: file_processed.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub search_available: bool,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_when_blank() {
        for raw in [None, Some(""), Some("   "), Some("\t\n ")] {
            let query = AnalysisQuery::from_form(raw);
            assert_eq!(query.text, DEFAULT_QUERY);
            assert!(query.defaulted_when_empty);
        }
    }

    #[test]
    fn test_query_is_trimmed() {
        let query = AnalysisQuery::from_form(Some("  Summarize this report \n"));
        assert_eq!(query.text, "Summarize this report");
        assert!(!query.defaulted_when_empty);
    }

    #[test]
    fn test_result_wire_format() {
        let result = AnalysisResult::success("q", "a".to_string(), "report.pdf");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "query": "q",
                "analysis": "a",
                "file_processed": "report.pdf"
            })
        );
    }
}
