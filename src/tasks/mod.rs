//! Task Templates
//!
//! A task binds an instruction template, the JSON shape the answer should
//! follow, the agent role that executes it and the tools that agent may use.
//! The schema is part of the prompt only; nothing validates the model's
//! answer against it.

pub mod templates;

use serde::{Deserialize, Serialize};

use crate::agents::AgentRole;
use crate::tools::ToolKind;

const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    DocumentAnalysis,
    InvestmentAnalysis,
    RiskAssessment,
    Verification,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::DocumentAnalysis => "analyze_financial_document",
            TaskKind::InvestmentAnalysis => "investment_analysis",
            TaskKind::RiskAssessment => "risk_assessment",
            TaskKind::Verification => "verification",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Named parameters a task is kicked off with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInputs {
    pub query: String,
    pub file_path: String,
}

#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub instructions: &'static str,
    pub expected_output: &'static str,
    pub assigned_role: AgentRole,
    pub tools: Vec<ToolKind>,
    pub is_asynchronous: bool,
}

impl TaskSpec {
    /// Instructions with every `{query}` placeholder substituted.
    ///
    /// Substitution is a single pass, so braces inside `query` are kept verbatim.
    pub fn render(&self, query: &str) -> String {
        self.instructions.replace(QUERY_PLACEHOLDER, query)
    }
}

/// The fixed set of task templates, built once at startup
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    tasks: Vec<TaskSpec>,
}

impl TaskCatalog {
    pub fn standard() -> Self {
        use templates::*;

        let tasks = vec![
            TaskSpec {
                kind: TaskKind::DocumentAnalysis,
                instructions: DOCUMENT_ANALYSIS,
                expected_output: DOCUMENT_ANALYSIS_OUTPUT,
                assigned_role: AgentRole::Analyst,
                tools: vec![ToolKind::ReadFinancialPdf, ToolKind::Search],
                is_asynchronous: false,
            },
            TaskSpec {
                kind: TaskKind::InvestmentAnalysis,
                instructions: INVESTMENT_ANALYSIS,
                expected_output: INVESTMENT_ANALYSIS_OUTPUT,
                assigned_role: AgentRole::Analyst,
                tools: vec![ToolKind::ReadFinancialPdf, ToolKind::AnalyzeInvestmentData],
                is_asynchronous: false,
            },
            TaskSpec {
                kind: TaskKind::RiskAssessment,
                instructions: RISK_ASSESSMENT,
                expected_output: RISK_ASSESSMENT_OUTPUT,
                assigned_role: AgentRole::RiskAssessor,
                tools: vec![ToolKind::ReadFinancialPdf, ToolKind::CreateRiskAssessment],
                is_asynchronous: false,
            },
            TaskSpec {
                kind: TaskKind::Verification,
                instructions: VERIFICATION,
                expected_output: VERIFICATION_OUTPUT,
                assigned_role: AgentRole::Verifier,
                tools: vec![ToolKind::ReadFinancialPdf],
                is_asynchronous: false,
            },
        ];

        Self { tasks }
    }

    pub fn get(&self, kind: TaskKind) -> Option<&TaskSpec> {
        self.tasks.iter().find(|t| t.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks.iter()
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
