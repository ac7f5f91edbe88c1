use crate::http::{JsonRequest, endpoint};
use cadre_core::{
    Backend, BackendError, CallGuard, CallObserver, GenerateOptions, ModelParams, Settings,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Clone, Serialize)]
struct SamplingOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Local Ollama backend.
#[derive(Debug)]
pub struct OllamaBackend {
    base_url: String,
    timeout: Option<Duration>,
    guard: CallGuard,
}

impl OllamaBackend {
    pub const PROVIDER: &'static str = "ollama";

    pub fn new(settings: &Settings, observer: Arc<dyn CallObserver>) -> Self {
        Self {
            base_url: settings.ollama_base_url.clone(),
            timeout: settings.request_timeout_secs.map(Duration::from_secs),
            guard: CallGuard::new(
                Self::PROVIDER,
                "Ollama",
                ModelParams::new(
                    settings.ollama_model.clone(),
                    settings.max_tokens,
                    settings.temperature,
                ),
                observer,
            ),
        }
    }

    fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, BackendError> {
        let body = GenerateRequest {
            model: &params.model,
            prompt,
            stream: false,
            options: SamplingOptions {
                temperature: params.temperature,
                num_predict: params.max_tokens,
            },
        };

        let response: GenerateResponse = JsonRequest {
            url: endpoint(&self.base_url, "api/generate"),
            headers: Vec::new(),
            body: &body,
            timeout: self.timeout,
        }
        .send()?;

        Ok(response.response)
    }
}

impl Backend for OllamaBackend {
    fn provider(&self) -> &str {
        Self::PROVIDER
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> String {
        self.guard
            .run(prompt, options, |params| self.complete(prompt, params))
    }
}
