//! Agent executor
//!
//! Runs one task for one role: tools first, then a single LLM completion
//! (or `max_iterations` of them if configured higher). Requests are paced by
//! a per-agent rate limiter that is shared across all in-flight requests.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{info, warn};

use crate::agents::AgentRoleSpec;
use crate::llm::LLM;
use crate::tasks::{TaskInputs, TaskSpec};
use crate::tools::{ToolObservation, Toolbox};
use crate::types::{AppError, AppResult, LLMMessage};

/// Output of an earlier task, fed forward as context
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub task_name: String,
    pub output: String,
}

pub struct Agent {
    spec: AgentRoleSpec,
    llm: LLM,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl Agent {
    pub fn new(spec: AgentRoleSpec, llm: LLM) -> Self {
        let rpm = NonZeroU32::new(spec.max_requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rpm)));
        Self { spec, llm, limiter }
    }

    /// Execute `task` and return the raw completion text
    pub async fn execute(
        &self,
        task: &TaskSpec,
        inputs: &TaskInputs,
        toolbox: &Toolbox,
        context: &[TaskContext],
    ) -> AppResult<String> {
        info!(
            agent = %self.spec.role,
            task = %task.kind,
            tools = task.tools.len(),
            context = context.len(),
            "Agent starting task"
        );

        let observations = toolbox
            .run_for_task(&task.tools, &inputs.file_path, &inputs.query)
            .await;

        let messages = vec![
            LLMMessage::system(self.spec.system_prompt()),
            LLMMessage::user(build_task_prompt(task, inputs, &observations, context)),
        ];

        let attempts = self.spec.max_iterations.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            self.limiter.until_ready().await;

            match self.llm.complete(messages.clone()).await {
                Ok(response) if !response.content.trim().is_empty() => {
                    info!(
                        agent = %self.spec.role,
                        task = %task.kind,
                        attempt,
                        total_tokens = response.usage.total_tokens,
                        "Agent finished task"
                    );
                    return Ok(response.content);
                }
                Ok(_) => {
                    warn!(agent = %self.spec.role, attempt, "LLM returned an empty answer");
                    last_error = Some(AppError::LLMApi("LLM returned an empty answer".to_string()));
                }
                Err(e) => {
                    warn!(agent = %self.spec.role, attempt, error = %e, "LLM call failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::Internal("agent made no attempts".to_string())))
    }
}

fn build_task_prompt(
    task: &TaskSpec,
    inputs: &TaskInputs,
    observations: &[ToolObservation],
    context: &[TaskContext],
) -> String {
    let mut prompt = format!("Current Task: {}\n\n", task.render(&inputs.query));

    prompt.push_str(
        "Your final answer must follow this JSON structure. Return the complete content, not a summary:\n",
    );
    prompt.push_str(task.expected_output);
    prompt.push_str("\n\n");

    prompt.push_str(&format!("Uploaded document path: {}\n", inputs.file_path));

    for observation in observations {
        prompt.push_str(&format!(
            "\n## Tool `{}` output ({})\n{}\n",
            observation.tool.name(),
            observation.tool.description(),
            observation.output
        ));
    }

    if !context.is_empty() {
        prompt.push_str("\n## Context from previous tasks\n");
        for item in context {
            prompt.push_str(&format!("\n### {}\n{}\n", item.task_name, item.output));
        }
    }

    prompt
}
