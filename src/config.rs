use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub storage: StorageConfig,
    pub search: SearchConfig,
    pub agents: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl LLMConfig {
    /// API key if one is configured for the active provider
    pub fn active_api_key(&self) -> Option<String> {
        if self.api_key.trim().is_empty() {
            None
        } else {
            Some(self.api_key.clone())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub work_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub serpapi_key: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub max_iterations: u32,
    pub max_requests_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let provider = env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let api_key = match provider.as_str() {
            "openrouter" => env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            _ => env::var("OPENAI_API_KEY").unwrap_or_default(),
        };

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
                    .parse()?,
            },
            llm: LLMConfig {
                provider,
                api_key,
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                base_url: env::var("LLM_BASE_URL").ok().filter(|s| !s.is_empty()),
                temperature: env::var("LLM_TEMPERATURE")
                    .unwrap_or_else(|_| "0.7".to_string())
                    .parse()?,
                max_tokens: env::var("LLM_MAX_TOKENS")
                    .unwrap_or_else(|_| "2048".to_string())
                    .parse()?,
                timeout_secs: env::var("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()?,
            },
            storage: StorageConfig {
                work_dir: env::var("DOCUMENT_WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data")),
            },
            search: SearchConfig {
                serpapi_key: env::var("SERPAPI_API_KEY").unwrap_or_default(),
                max_results: env::var("SEARCH_MAX_RESULTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            agents: AgentConfig {
                max_iterations: env::var("AGENT_MAX_ITER")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
                max_requests_per_minute: env::var("AGENT_MAX_RPM")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
        })
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with no credentials, rooted at `work_dir`
    pub fn for_tests(work_dir: PathBuf) -> Self {
        Self {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
                max_upload_bytes: 1024 * 1024,
            },
            llm: LLMConfig {
                provider: "openai".to_string(),
                api_key: String::new(),
                model: "test-model".to_string(),
                base_url: None,
                temperature: 0.7,
                max_tokens: 256,
                timeout_secs: 5,
            },
            storage: StorageConfig { work_dir },
            search: SearchConfig {
                serpapi_key: String::new(),
                max_results: 5,
            },
            agents: AgentConfig {
                max_iterations: 1,
                max_requests_per_minute: 600,
            },
        }
    }
}
