//! Agent System
//!
//! Four personas make up the financial analysis crew:
//!
//! - **Financial Analyst**: extracts metrics and insights from the document
//! - **Document Verifier**: checks that the upload is a usable financial record
//! - **Investment Advisor**: frames scenario-based investment implications
//! - **Risk Assessor**: builds a balanced risk register
//!
//! A role on its own is only configuration. [`Agent`] pairs a role with the
//! shared LLM client and the per-agent rate limiter and actually executes tasks.

pub mod executor;

pub use executor::Agent;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    Analyst,
    Verifier,
    Advisor,
    RiskAssessor,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Analyst,
        AgentRole::Verifier,
        AgentRole::Advisor,
        AgentRole::RiskAssessor,
    ];
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Analyst => write!(f, "analyst"),
            AgentRole::Verifier => write!(f, "verifier"),
            AgentRole::Advisor => write!(f, "advisor"),
            AgentRole::RiskAssessor => write!(f, "risk_assessor"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRoleSpec {
    pub role: AgentRole,
    pub title: String,
    pub goal: String,
    pub backstory: String,
    pub max_iterations: u32,
    pub max_requests_per_minute: u32,
    pub allows_delegation: bool,
    pub memory: bool,
}

impl AgentRoleSpec {
    fn new(role: AgentRole, title: &str, goal: &str, backstory: &str) -> Self {
        Self {
            role,
            title: title.to_string(),
            goal: goal.to_string(),
            backstory: backstory.to_string(),
            max_iterations: 1,
            max_requests_per_minute: 1,
            allows_delegation: false,
            memory: false,
        }
    }

    fn delegating(mut self) -> Self {
        self.allows_delegation = true;
        self
    }

    fn with_memory(mut self) -> Self {
        self.memory = true;
        self
    }

    /// System prompt describing this persona
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.title, self.backstory, self.goal
        )
    }
}

/// The crew's role configurations
#[derive(Debug, Clone)]
pub struct AgentRoster {
    specs: Vec<AgentRoleSpec>,
}

impl AgentRoster {
    pub fn standard() -> Self {
        let specs = vec![
            AgentRoleSpec::new(
                AgentRole::Analyst,
                "Senior Financial Analyst",
                "Accurately analyze the given financial document and provide clear, data-driven insights.",
                "You are a highly experienced financial analyst with deep knowledge of markets.",
            )
            .delegating()
            .with_memory(),
            AgentRoleSpec::new(
                AgentRole::Verifier,
                "Financial Document Verifier",
                "Verify whether the uploaded file is a valid financial document (e.g., balance sheet, \
                 income statement, cash flow statement, annual report) and ensure it is suitable for analysis.",
                "You are a compliance-oriented verifier with a background in financial auditing. \
                 You specialize in identifying whether documents are genuine financial records. \
                 You ensure accuracy and legitimacy before analysis is carried out.",
            )
            .delegating()
            .with_memory(),
            AgentRoleSpec::new(
                AgentRole::Advisor,
                "Investment Advisor",
                "Based on insights from the financial analysis, suggest balanced investment strategies, \
                 highlighting both opportunities and potential risks. Ensure compliance with standard \
                 financial advisory practices.",
                "You are a certified financial advisor with over 15 years of experience in guiding clients \
                 on responsible investments. You evaluate financial performance, risk factors, and market \
                 conditions to provide thoughtful recommendations. Your approach is professional, ethical, \
                 and tailored to investor goals.",
            ),
            AgentRoleSpec::new(
                AgentRole::RiskAssessor,
                "Risk Assessment Specialist",
                "Identify and evaluate the risks associated with the financial document and related \
                 investment opportunities. Provide a balanced view of potential downsides and mitigation \
                 strategies.",
                "You are an experienced risk management expert specializing in financial markets. \
                 You carefully evaluate credit risk, market risk, operational risk, and liquidity risk. \
                 Your recommendations help investors understand realistic risk exposure and how to manage it.",
            ),
        ];

        Self { specs }
    }

    /// Override the execution limits of every role
    pub fn with_limits(mut self, max_iterations: u32, max_requests_per_minute: u32) -> Self {
        for spec in &mut self.specs {
            spec.max_iterations = max_iterations.max(1);
            spec.max_requests_per_minute = max_requests_per_minute.max(1);
        }
        self
    }

    pub fn get(&self, role: AgentRole) -> Option<&AgentRoleSpec> {
        self.specs.iter().find(|s| s.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRoleSpec> {
        self.specs.iter()
    }
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self::standard()
    }
}
