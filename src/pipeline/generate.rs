//! Generation client: send the prompt to a hosted model, return its text.
//!
//! One request per run: no retry, no streaming, no timeout beyond the
//! transport's default. The completion is returned untouched; the parser is
//! tolerant of whatever comes back.
//!
//! [`Generator`] is the seam. [`LlmGenerator`] drives any `edgequake-llm`
//! provider; tests and embedders can supply their own implementation via
//! [`crate::config::IngestConfigBuilder::generator`].

use crate::config::{IngestConfig, DEFAULT_MODEL};
use crate::error::GenerationError;
use crate::output::{GenerationPrompt, GenerationResult};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Turns a prompt into a free-text completion.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
    ) -> Result<GenerationResult, GenerationError>;
}

/// [`Generator`] backed by an `edgequake-llm` provider.
pub struct LlmGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &IngestConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        // The whole prompt goes in a single user turn.
        let messages = vec![ChatMessage::user(prompt.text.as_str())];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| GenerationError::Api {
                message: format!("{}", e),
            })?;

        info!(
            "Model answered in {:?}: {} input tokens, {} output tokens",
            start.elapsed(),
            response.prompt_tokens,
            response.completion_tokens
        );
        debug!("Raw model response:\n{}", response.content);

        Ok(GenerationResult {
            text: response.content,
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
        })
    }
}

fn build_options(config: &IngestConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

/// Pick the generator for a run.
///
/// A configured [`Generator`] or provider instance is used directly. Failing
/// that, a provider named by config or environment is built, and only when
/// nothing is named does `edgequake-llm` scan the environment for any API
/// key it recognises.
pub fn resolve_generator(config: &IngestConfig) -> Result<Arc<dyn Generator>, GenerationError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }
    let provider = match config.provider {
        Some(ref provider) => Arc::clone(provider),
        None => match explicit_choice(config) {
            Some((name, model)) => {
                debug!("Using provider '{}' with model '{}'", name, model);
                create_provider(&name, &model)?
            }
            None => auto_detect_provider()?,
        },
    };
    Ok(Arc::new(LlmGenerator::new(provider, config)))
}

/// Provider and model named by the caller, in priority order:
/// `config.provider_name`, then the `FLASHYY_LLM_PROVIDER`/`FLASHYY_MODEL`
/// pair, then OpenAI whenever `OPENAI_API_KEY` is set. A missing model
/// falls back to [`DEFAULT_MODEL`]; the env pair needs both halves.
fn explicit_choice(config: &IngestConfig) -> Option<(String, String)> {
    let configured_model = || {
        config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    };

    if let Some(ref name) = config.provider_name {
        return Some((name.clone(), configured_model()));
    }
    if let (Some(name), Some(model)) = (
        non_empty_env("FLASHYY_LLM_PROVIDER"),
        non_empty_env("FLASHYY_MODEL"),
    ) {
        return Some((name, model));
    }
    non_empty_env("OPENAI_API_KEY").map(|_| ("openai".to_string(), configured_model()))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn auto_detect_provider() -> Result<Arc<dyn LLMProvider>, GenerationError> {
    let (llm, _embedding) =
        ProviderFactory::from_env().map_err(|e| GenerationError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "no API key found in the environment ({e}); \
                 set OPENAI_API_KEY, GEMINI_API_KEY or ANTHROPIC_API_KEY, or pass --provider"
            ),
        })?;
    Ok(llm)
}

fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, GenerationError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        GenerationError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
