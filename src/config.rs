//! Configuration types.
//!
//! [`IngestConfig`] controls a PDF-to-flashcards run and is built through
//! [`IngestConfigBuilder`]. [`BackendConfig`] locates the hosted row-store.

use crate::error::{IngestError, StoreError};
use crate::pipeline::generate::Generator;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Model used when a provider is named without one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Soft upload guideline; larger documents are processed with a warning.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Pages with fewer characters than this are reported as likely image-only.
pub const DEFAULT_SHORT_PAGE_CHARS: usize = 100;

/// Configuration for one ingestion run.
///
/// # Example
/// ```rust
/// use flashyy::IngestConfig;
///
/// let config = IngestConfig::builder()
///     .model("gpt-4.1-mini")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct IngestConfig {
    /// LLM model identifier, e.g. "gpt-4.1-nano", "gemini-2.0-flash".
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "gemini", "ollama").
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed generator. Takes precedence over every provider field.
    pub generator: Option<Arc<dyn Generator>>,

    /// Sampling temperature. Default: 0.3.
    pub temperature: f32,

    /// Maximum completion tokens. Default: 8192.
    ///
    /// Sixty cards with sentence-length answers run to roughly 4 000 tokens;
    /// a lower cap cuts the list off mid-card and the last pair is lost.
    pub max_tokens: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Custom instruction template with `{min_cards}` and `{text}`.
    pub prompt_template: Option<String>,

    /// Short-page threshold in characters. Default: 100.
    pub short_page_chars: usize,

    /// Soft size guideline in bytes. Default: 10 MiB.
    pub max_document_bytes: u64,

    /// Optional stage/page event receiver.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            generator: None,
            temperature: 0.3,
            max_tokens: 8192,
            password: None,
            prompt_template: None,
            short_page_chars: DEFAULT_SHORT_PAGE_CHARS,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("generator", &self.generator.as_ref().map(|_| "<dyn Generator>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("prompt_template", &self.prompt_template.is_some())
            .field("short_page_chars", &self.short_page_chars)
            .field("max_document_bytes", &self.max_document_bytes)
            .finish()
    }
}

impl IngestConfig {
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`IngestConfig`].
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn short_page_chars(mut self, n: usize) -> Self {
        self.config.short_page_chars = n;
        self
    }

    pub fn max_document_bytes(mut self, n: u64) -> Self {
        self.config.max_document_bytes = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IngestConfig, IngestError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(IngestError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if let Some(ref t) = c.prompt_template {
            if !crate::prompts::is_valid_template(t) {
                return Err(IngestError::InvalidConfig(
                    "prompt template must contain {min_cards} and {text}".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

/// Location and public key of the hosted backend.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`. No trailing slash.
    pub url: String,
    /// Public (anon) API key sent as `apikey` on every request.
    pub anon_key: String,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .finish()
    }
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, StoreError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let anon_key = anon_key.into().trim().to_string();

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StoreError::InvalidConfig(format!(
                "backend URL must start with http:// or https://, got '{url}'"
            )));
        }
        if anon_key.is_empty() {
            return Err(StoreError::InvalidConfig("anon key is empty".into()));
        }
        Ok(Self { url, anon_key })
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, StoreError> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| StoreError::InvalidConfig("SUPABASE_URL is not set".into()))?;
        let key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| StoreError::InvalidConfig("SUPABASE_ANON_KEY is not set".into()))?;
        Self::new(url, key)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    pub fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.url, endpoint)
    }
}
