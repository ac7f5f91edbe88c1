//! # Backend Contract
//!
//! A backend turns a prompt into text. `generate` never fails: provider
//! errors are rendered into the returned text behind [`ERROR_MARKER`] so the
//! calling agent keeps going. [`CallGuard`] enforces that contract and
//! reports every call to the injected [`CallObserver`].

use crate::error::{BackendError, panic_message};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Prefix of every contained backend failure.
pub const ERROR_MARKER: &str = "Error generating response with";

/// Longest prompt/response excerpt handed to observers, in characters.
pub const OBSERVED_TEXT_LIMIT: usize = 1000;

/// Whether a generated text is a contained backend failure.
pub fn is_error_text(text: &str) -> bool {
    text.contains(ERROR_MARKER)
}

/// Per-call overrides. Unset fields fall back to the backend's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Fill unset fields from `defaults`.
    pub fn resolve(&self, defaults: &ModelParams) -> ModelParams {
        ModelParams {
            model: self.model.clone().unwrap_or_else(|| defaults.model.clone()),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
        }
    }
}

/// Fully resolved model parameters for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ModelParams {
    pub fn new(model: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature,
        }
    }
}

/// A text-generation provider.
pub trait Backend: Send + Sync {
    /// Lowercase provider identifier, e.g. `openai`.
    fn provider(&self) -> &str;

    /// Generate text for `prompt`. Failures come back as text containing
    /// [`ERROR_MARKER`].
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> String;
}

/// What an observer learns about one backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendCall {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub prompt: String,
    pub response: String,
    pub prompt_tokens: usize,
    pub response_tokens: usize,
    pub total_tokens: usize,
    pub elapsed: Duration,
    pub error: Option<String>,
}

impl BackendCall {
    pub fn new(
        provider: &str,
        params: &ModelParams,
        prompt: &str,
        response: &str,
        elapsed: Duration,
        error: Option<String>,
    ) -> Self {
        let prompt_tokens = whitespace_tokens(prompt);
        let response_tokens = whitespace_tokens(response);
        Self {
            provider: provider.to_string(),
            model: params.model.clone(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            prompt: truncate_chars(prompt, OBSERVED_TEXT_LIMIT),
            response: truncate_chars(response, OBSERVED_TEXT_LIMIT),
            prompt_tokens,
            response_tokens,
            total_tokens: prompt_tokens + response_tokens,
            elapsed,
            error,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

fn whitespace_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Telemetry sink notified after each backend call.
///
/// Observers must not influence the call; their return value is ignored.
pub trait CallObserver: Send + Sync {
    fn on_call(&self, call: &BackendCall);
}

/// Observer that discards every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CallObserver for NoopObserver {
    fn on_call(&self, _call: &BackendCall) {}
}

/// Shared wrapper that keeps a provider's failures inside `generate`.
///
/// Providers implement the fallible part as a closure; the guard resolves
/// options, catches errors and panics, renders the failure text and
/// notifies the observer.
#[derive(Clone)]
pub struct CallGuard {
    provider: String,
    display_name: String,
    defaults: ModelParams,
    observer: Arc<dyn CallObserver>,
}

impl CallGuard {
    pub fn new(
        provider: impl Into<String>,
        display_name: impl Into<String>,
        defaults: ModelParams,
        observer: Arc<dyn CallObserver>,
    ) -> Self {
        Self {
            provider: provider.into(),
            display_name: display_name.into(),
            defaults,
            observer,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn defaults(&self) -> &ModelParams {
        &self.defaults
    }

    /// Run one provider call and return its text or the failure text.
    pub fn run<F>(&self, prompt: &str, options: &GenerateOptions, call: F) -> String
    where
        F: FnOnce(&ModelParams) -> Result<String, BackendError>,
    {
        let params = options.resolve(&self.defaults);
        let started = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| call(&params)))
            .unwrap_or_else(|payload| Err(BackendError::Panicked(panic_message(payload))));

        let (text, error) = match outcome {
            Ok(text) => (text, None),
            Err(err) => {
                tracing::warn!(
                    provider = %self.provider,
                    model = %params.model,
                    error_code = err.error_code(),
                    error = %err,
                    "Backend call failed"
                );
                (self.failure_text(&err), Some(err.to_string()))
            }
        };

        let record = BackendCall::new(
            &self.provider,
            &params,
            prompt,
            &text,
            started.elapsed(),
            error,
        );
        self.observer.on_call(&record);

        text
    }

    /// Render a provider failure the way `generate` returns it.
    pub fn failure_text(&self, err: &BackendError) -> String {
        format!("{} {}: {}", ERROR_MARKER, self.display_name, err)
    }
}

impl std::fmt::Debug for CallGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallGuard")
            .field("provider", &self.provider)
            .field("display_name", &self.display_name)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
