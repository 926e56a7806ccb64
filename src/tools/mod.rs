//! Tool Adapters
//!
//! Narrow bridges from the agent pipeline to external capabilities:
//!
//! - `read_financial_pdf` - page-by-page text extraction via lopdf
//! - `analyze_investment_data` / `create_risk_assessment` - analysis placeholders
//! - `search_tool` - optional web search via SerpAPI
//!
//! Adapters never fail with `Err`. A failure is reported as
//! [`ToolOutput::Failed`] and travels through the pipeline as data, so the
//! agent still gets to see (and report on) what went wrong.

pub mod analysis;
pub mod pdf;
pub mod search;

pub use analysis::{analyze_investment_data, assess_risk};
pub use pdf::{clean_text, read_document_text};
pub use search::{SearchError, SearchTool};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identifies a tool adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    ReadFinancialPdf,
    AnalyzeInvestmentData,
    CreateRiskAssessment,
    Search,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ReadFinancialPdf => "read_financial_pdf",
            ToolKind::AnalyzeInvestmentData => "analyze_investment_data",
            ToolKind::CreateRiskAssessment => "create_risk_assessment",
            ToolKind::Search => "search_tool",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::ReadFinancialPdf => "Load and return cleaned text from a financial PDF",
            ToolKind::AnalyzeInvestmentData => "Process and analyze financial document data",
            ToolKind::CreateRiskAssessment => "Create structured risk assessment from financial data",
            ToolKind::Search => "Web search for supplementary market information",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Failed { tool: ToolKind, reason: String },
}

impl ToolOutput {
    pub fn failed(tool: ToolKind, reason: impl Into<String>) -> Self {
        ToolOutput::Failed {
            tool,
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ToolOutput::Text(_))
    }

    /// Successful, non-blank text
    pub fn usable_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolOutput::Text(text) => f.write_str(text),
            ToolOutput::Failed { tool, reason } => write!(f, "[{}] {}", tool.name(), reason),
        }
    }
}

/// One tool call as seen by the agent
#[derive(Debug, Clone)]
pub struct ToolObservation {
    pub tool: ToolKind,
    pub output: ToolOutput,
}

/// Shared tool set, built once at startup
#[derive(Clone)]
pub struct Toolbox {
    search: SearchTool,
}

impl Toolbox {
    pub fn new(search: SearchTool) -> Self {
        Self { search }
    }

    pub fn search_available(&self) -> bool {
        self.search.available()
    }

    /// Whether a tool can be invoked at all in this process
    pub fn is_enabled(&self, tool: ToolKind) -> bool {
        match tool {
            ToolKind::Search => self.search.available(),
            _ => true,
        }
    }

    /// Run `tools` in order for one task.
    ///
    /// The document is read at most once; the analysis placeholders receive
    /// whatever the reader produced, failure included.
    pub async fn run_for_task(
        &self,
        tools: &[ToolKind],
        file_path: &str,
        query: &str,
    ) -> Vec<ToolObservation> {
        let mut observations = Vec::with_capacity(tools.len());
        let mut document: Option<ToolOutput> = None;

        for &tool in tools {
            if !self.is_enabled(tool) {
                debug!(tool = %tool, "Skipping unavailable tool");
                continue;
            }

            let output = match tool {
                ToolKind::ReadFinancialPdf => {
                    let text = read_document_async(file_path).await;
                    document = Some(text.clone());
                    text
                }
                ToolKind::AnalyzeInvestmentData => {
                    let input = match &document {
                        Some(doc) => doc.clone(),
                        None => read_document_async(file_path).await,
                    };
                    analyze_investment_data(&input)
                }
                ToolKind::CreateRiskAssessment => {
                    let input = match &document {
                        Some(doc) => doc.clone(),
                        None => read_document_async(file_path).await,
                    };
                    assess_risk(&input)
                }
                ToolKind::Search => self.search.search(query).await,
            };

            debug!(tool = %tool, ok = output.is_ok(), "Tool finished");
            observations.push(ToolObservation { tool, output });
        }

        observations
    }
}

/// Runs the blocking PDF extraction off the async executor
async fn read_document_async(path: &str) -> ToolOutput {
    let owned = path.to_string();
    match tokio::task::spawn_blocking(move || read_document_text(&owned)).await {
        Ok(output) => output,
        Err(e) => ToolOutput::failed(
            ToolKind::ReadFinancialPdf,
            format!("Error reading PDF: {}", e),
        ),
    }
}
