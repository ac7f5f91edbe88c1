//! # Settings
//!
//! Provider keys, endpoints and model defaults, plus the context policy
//! used by agents. Values come from defaults, a TOML file, or environment
//! variables, and are validated on `build()`.
//!
//! ## Environment Variables
//!
//! ### Providers
//! - `OPENAI_API_KEY` - OpenAI key (no default)
//! - `OPENAI_BASE_URL` - OpenAI endpoint (default: `https://api.openai.com/v1`)
//! - `ANTHROPIC_API_KEY` - Anthropic key (no default)
//! - `ANTHROPIC_BASE_URL` - Anthropic endpoint (default: `https://api.anthropic.com/v1`)
//! - `OLLAMA_BASE_URL` - Ollama endpoint (default: `http://localhost:11434`)
//! - `DEFAULT_MODEL_PROVIDER` - Provider used when none is named (default: `openai`)
//! - `DEFAULT_MODEL_NAME` - OpenAI model (default: `gpt-3.5-turbo`)
//! - `OLLAMA_MODEL_NAME` - Ollama model (default: `llama2`)
//! - `ANTHROPIC_MODEL_NAME` - Anthropic model (default: `claude-3-haiku-20240307`)
//! - `MAX_TOKENS` - Default completion budget (default: 2000)
//! - `TEMPERATURE` - Default sampling temperature (default: 0.7)
//! - `CADRE_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: none)
//!
//! ### Context policy
//! - `CADRE_CONTEXT_MAX_LEN` - Length that triggers compaction (default: 50)
//! - `CADRE_CONTEXT_RETAIN` - Entries kept after compaction (default: 20)
//! - `CADRE_PLANNING_WINDOW` - Context entries shown to the planner (default: 5)
//! - `CADRE_PLAN_MAX_TOKENS` - Token budget for planning calls (default: 300)
//! - `CADRE_INTERACTION_LIMIT` - Interactions kept per session (default: unbounded)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::{env, fmt, fs};

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },

    #[error("Invalid configuration file '{path}': {message}")]
    InvalidFile { path: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// How agents bound their per-session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    pub max_len: usize,
    pub retain: usize,
    pub planning_window: usize,
    pub plan_max_tokens: u32,
    pub interaction_limit: Option<usize>,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_len: 50,
            retain: 20,
            planning_window: 5,
            plan_max_tokens: 300,
            interaction_limit: None,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub ollama_base_url: String,
    pub default_provider: String,
    pub default_model: String,
    pub ollama_model: String,
    pub anthropic_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: Option<u64>,
    pub context: ContextSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            anthropic_api_key: None,
            anthropic_base_url: "https://api.anthropic.com/v1".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            default_provider: "openai".to_string(),
            default_model: "gpt-3.5-turbo".to_string(),
            ollama_model: "llama2".to_string(),
            anthropic_model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            request_timeout_secs: None,
            context: ContextSettings::default(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("ollama_model", &self.ollama_model)
            .field("anthropic_model", &self.anthropic_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("context", &self.context)
            .finish()
    }
}

fn redact(key: &Option<String>) -> &'static str {
    if key.is_some() { "[REDACTED]" } else { "None" }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the result
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        SettingsBuilder::from_env()?.build()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(source).map_err(|e| ConfigError::InvalidFile {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let settings: Settings = toml::from_str(&source).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.default_provider.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_provider cannot be empty".to_string(),
            ));
        }

        let context = &self.context;
        if context.retain == 0 || context.retain > context.max_len {
            return Err(ConfigError::ValidationError(format!(
                "context retain ({}) must be between 1 and max_len ({})",
                context.retain, context.max_len
            )));
        }
        if context.planning_window == 0 {
            return Err(ConfigError::ValidationError(
                "planning_window must be greater than 0".to_string(),
            ));
        }
        if context.plan_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "plan_max_tokens must be greater than 0".to_string(),
            ));
        }
        if context.interaction_limit == Some(0) {
            return Err(ConfigError::ValidationError(
                "interaction_limit must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for `Settings` with environment variable support
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any environment variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut builder = Self::default();

        // Providers
        if let Some(key) = get("OPENAI_API_KEY") {
            builder = builder.openai_api_key(key);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            builder = builder.openai_base_url(url);
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            builder = builder.anthropic_api_key(key);
        }
        if let Some(url) = get("ANTHROPIC_BASE_URL") {
            builder = builder.anthropic_base_url(url);
        }
        if let Some(url) = get("OLLAMA_BASE_URL") {
            builder = builder.ollama_base_url(url);
        }
        if let Some(provider) = get("DEFAULT_MODEL_PROVIDER") {
            builder = builder.default_provider(provider);
        }
        if let Some(model) = get("DEFAULT_MODEL_NAME") {
            builder = builder.default_model(model);
        }
        if let Some(model) = get("OLLAMA_MODEL_NAME") {
            builder = builder.ollama_model(model);
        }
        if let Some(model) = get("ANTHROPIC_MODEL_NAME") {
            builder = builder.anthropic_model(model);
        }
        if let Some(tokens) = parse_var::<u32>("MAX_TOKENS", get("MAX_TOKENS"))? {
            builder = builder.max_tokens(tokens);
        }
        if let Some(temperature) = parse_var::<f32>("TEMPERATURE", get("TEMPERATURE"))? {
            builder = builder.temperature(temperature);
        }
        if let Some(secs) = parse_var::<u64>(
            "CADRE_REQUEST_TIMEOUT_SECS",
            get("CADRE_REQUEST_TIMEOUT_SECS"),
        )? {
            builder = builder.request_timeout_secs(secs);
        }

        // Context policy
        let mut context = ContextSettings::default();
        if let Some(max_len) =
            parse_var::<usize>("CADRE_CONTEXT_MAX_LEN", get("CADRE_CONTEXT_MAX_LEN"))?
        {
            context.max_len = max_len;
        }
        if let Some(retain) = parse_var::<usize>("CADRE_CONTEXT_RETAIN", get("CADRE_CONTEXT_RETAIN"))?
        {
            context.retain = retain;
        }
        if let Some(window) =
            parse_var::<usize>("CADRE_PLANNING_WINDOW", get("CADRE_PLANNING_WINDOW"))?
        {
            context.planning_window = window;
        }
        if let Some(tokens) =
            parse_var::<u32>("CADRE_PLAN_MAX_TOKENS", get("CADRE_PLAN_MAX_TOKENS"))?
        {
            context.plan_max_tokens = tokens;
        }
        if let Some(limit) =
            parse_var::<usize>("CADRE_INTERACTION_LIMIT", get("CADRE_INTERACTION_LIMIT"))?
        {
            context.interaction_limit = Some(limit);
        }
        builder = builder.context(context);

        Ok(builder)
    }

    #[must_use]
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.settings.openai_api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.openai_base_url = url.into();
        self
    }

    #[must_use]
    pub fn anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.settings.anthropic_api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn anthropic_base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.anthropic_base_url = url.into();
        self
    }

    #[must_use]
    pub fn ollama_base_url(mut self, url: impl Into<String>) -> Self {
        self.settings.ollama_base_url = url.into();
        self
    }

    #[must_use]
    pub fn default_provider(mut self, provider: impl Into<String>) -> Self {
        self.settings.default_provider = provider.into();
        self
    }

    #[must_use]
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.settings.default_model = model.into();
        self
    }

    #[must_use]
    pub fn ollama_model(mut self, model: impl Into<String>) -> Self {
        self.settings.ollama_model = model.into();
        self
    }

    #[must_use]
    pub fn anthropic_model(mut self, model: impl Into<String>) -> Self {
        self.settings.anthropic_model = model.into();
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.settings.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.settings.temperature = temperature;
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.settings.request_timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn context(mut self, context: ContextSettings) -> Self {
        self.settings.context = context;
        self
    }

    /// Build and validate the settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}
