// Financial Document Analyzer - PDF upload in, LLM agent analysis out

pub mod config;
pub mod types;
pub mod models;
pub mod storage;
pub mod tools;     // PDF reader, analysis placeholders, optional web search
pub mod llm;
pub mod agents;
pub mod tasks;
pub mod crew;      // Sequential task orchestration
pub mod routes;
pub mod middleware;

use std::sync::Arc;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

use agents::AgentRoster;
use crew::Orchestrator;
use llm::LLM;
use storage::DocumentStore;
use tasks::TaskCatalog;
use tools::{SearchTool, Toolbox};
use types::AppResult;

/// Build the shared state: agents, tasks and tool capabilities are
/// constructed once here and never mutated afterwards.
pub fn build_state(config: Config) -> AppResult<AppState> {
    let llm = LLM::from_config(&config.llm)?;
    let roster = AgentRoster::standard().with_limits(
        config.agents.max_iterations,
        config.agents.max_requests_per_minute,
    );
    let toolbox = Toolbox::new(SearchTool::from_config(&config.search));
    let orchestrator = Orchestrator::new(&roster, TaskCatalog::standard(), llm, toolbox);

    Ok(AppState {
        store: DocumentStore::new(config.storage.work_dir.clone()),
        config: Arc::new(config),
        orchestrator: Arc::new(orchestrator),
    })
}

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
