//! Orchestrator
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST /analyze
//!      │
//!      ▼
//! ┌──────────────┐
//! │ Orchestrator │  → builds a crew for the request
//! └──────────────┘
//!      │
//!      ▼
//! ┌──────────────┐
//! │  Crew        │  → runs tasks sequentially, each on its assigned agent
//! │ (sequential) │
//! └──────────────┘
//!      │
//!      ▼
//!  raw analysis text
//! ```
//!
//! The HTTP surface runs a single task (`analyze_financial_document`).
//! [`Orchestrator::run_pipeline`] chains any sequence of the catalogued tasks
//! (e.g. verification → analysis → risk → investment) and is the extension
//! point for a multi-stage review; no route uses it today.

use std::collections::HashMap;

use tracing::info;

use crate::agents::executor::TaskContext;
use crate::agents::{Agent, AgentRole, AgentRoster};
use crate::llm::LLM;
use crate::models::{AnalysisQuery, AnalysisResult};
use crate::storage::UploadedDocument;
use crate::tasks::{TaskCatalog, TaskInputs, TaskKind};
use crate::tools::Toolbox;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    Sequential,
}

/// Result of one crew kickoff
#[derive(Debug, Clone)]
pub struct CrewOutput {
    /// Output of the final task
    pub raw: String,
    pub task_outputs: Vec<TaskContext>,
}

/// A short-lived grouping of tasks over the shared agents
pub struct Crew<'a> {
    agents: &'a HashMap<AgentRole, Agent>,
    catalog: &'a TaskCatalog,
    toolbox: &'a Toolbox,
    tasks: Vec<TaskKind>,
    process: Process,
}

impl<'a> Crew<'a> {
    pub async fn kickoff(&self, inputs: &TaskInputs) -> AppResult<CrewOutput> {
        if self.tasks.is_empty() {
            return Err(AppError::Internal("crew has no tasks".to_string()));
        }

        info!(
            tasks = self.tasks.len(),
            process = ?self.process,
            "Crew kickoff"
        );

        let mut task_outputs: Vec<TaskContext> = Vec::with_capacity(self.tasks.len());

        for kind in &self.tasks {
            let task = self
                .catalog
                .get(*kind)
                .ok_or_else(|| AppError::Internal(format!("unknown task: {}", kind)))?;
            let agent = self.agents.get(&task.assigned_role).ok_or_else(|| {
                AppError::Internal(format!("no agent for role {}", task.assigned_role))
            })?;

            let output = agent.execute(task, inputs, self.toolbox, &task_outputs).await?;

            task_outputs.push(TaskContext {
                task_name: kind.name().to_string(),
                output,
            });
        }

        let raw = task_outputs
            .last()
            .map(|t| t.output.clone())
            .unwrap_or_default();

        Ok(CrewOutput { raw, task_outputs })
    }
}

/// Process-wide orchestration state, built once at startup
pub struct Orchestrator {
    agents: HashMap<AgentRole, Agent>,
    catalog: TaskCatalog,
    toolbox: Toolbox,
}

impl Orchestrator {
    pub fn new(roster: &AgentRoster, catalog: TaskCatalog, llm: LLM, toolbox: Toolbox) -> Self {
        let agents = roster
            .iter()
            .map(|spec| (spec.role, Agent::new(spec.clone(), llm.clone())))
            .collect();

        Self {
            agents,
            catalog,
            toolbox,
        }
    }

    pub fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    pub fn crew(&self, tasks: Vec<TaskKind>) -> Crew<'_> {
        Crew {
            agents: &self.agents,
            catalog: &self.catalog,
            toolbox: &self.toolbox,
            tasks,
            process: Process::Sequential,
        }
    }

    /// Run the document analysis task for one uploaded document
    pub async fn run(
        &self,
        query: &AnalysisQuery,
        document: &UploadedDocument,
    ) -> AppResult<AnalysisResult> {
        let output = self
            .run_pipeline(&[TaskKind::DocumentAnalysis], query, document)
            .await?;

        Ok(AnalysisResult::success(
            &query.text,
            output.raw,
            &document.original_filename,
        ))
    }

    /// Run `tasks` in order against `document`
    pub async fn run_pipeline(
        &self,
        tasks: &[TaskKind],
        query: &AnalysisQuery,
        document: &UploadedDocument,
    ) -> AppResult<CrewOutput> {
        let inputs = TaskInputs {
            query: query.text.clone(),
            file_path: document.storage_path_str(),
        };

        info!(
            document_id = %document.id,
            defaulted_query = query.defaulted_when_empty,
            "Running analysis pipeline"
        );

        self.crew(tasks.to_vec()).kickoff(&inputs).await
    }
}
