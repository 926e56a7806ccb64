use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMMessage, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider adapter
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Completion client shared by every agent: one adapter plus the
/// model parameters used for each request.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig, model: impl Into<String>) -> AppResult<Self> {
        let kind = LLMProvider::from_id(&provider.name).ok_or_else(|| {
            AppError::Internal(format!("Unsupported LLM provider: {}", provider.name))
        })?;
        let base_url = provider
            .base_url
            .unwrap_or_else(|| kind.default_base_url().to_string());
        let adapter = crate::llm::openai::OpenAIAdapter::new(&provider.api_key, base_url, provider.timeout)?;

        Ok(Self {
            adapter: Arc::new(adapter),
            provider_name: kind.to_string(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 2048,
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let llm = Self::new(
            LLMProviderConfig {
                name: config.provider.clone(),
                api_key: config.api_key.clone(),
                base_url: config.base_url.clone(),
                timeout: Duration::from_secs(config.timeout_secs),
            },
            config.model.clone(),
        )?;
        Ok(llm
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens))
    }

    /// Wrap an arbitrary adapter (alternative backends, tests)
    pub fn with_adapter(adapter: Arc<dyn LLMAdapter>, provider_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            adapter,
            provider_name: provider_name.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Send `messages` with the configured model parameters
    pub async fn complete(&self, messages: Vec<LLMMessage>) -> AppResult<LLMResponse> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };
        debug!(provider = %self.provider_name, model = %self.model, "Requesting completion");
        self.create_chat_completion(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider() {
        let result = LLM::new(
            LLMProviderConfig {
                name: "carrier-pigeon".to_string(),
                api_key: String::new(),
                base_url: None,
                timeout: Duration::from_secs(1),
            },
            "model",
        );
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_from_config_applies_parameters() {
        let mut config = crate::config::Config::for_tests(std::path::PathBuf::from("data")).llm;
        config.provider = "openrouter".to_string();
        config.temperature = 0.2;

        let llm = LLM::from_config(&config).unwrap();
        assert_eq!(llm.provider_name(), "openrouter");
        assert_eq!(llm.model(), "test-model");
        assert_eq!(llm.temperature, 0.2);
        assert_eq!(llm.max_tokens, 256);
    }
}
