use crate::http::{JsonRequest, endpoint};
use cadre_core::{
    Backend, BackendError, CallGuard, CallObserver, GenerateOptions, ModelParams, Settings,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Anthropic messages API backend.
pub struct AnthropicBackend {
    api_key: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
    guard: CallGuard,
}

impl AnthropicBackend {
    pub const PROVIDER: &'static str = "anthropic";

    pub fn new(settings: &Settings, observer: Arc<dyn CallObserver>) -> Self {
        Self {
            api_key: settings.anthropic_api_key.clone(),
            base_url: settings.anthropic_base_url.clone(),
            timeout: settings.request_timeout_secs.map(Duration::from_secs),
            guard: CallGuard::new(
                Self::PROVIDER,
                "Anthropic",
                ModelParams::new(
                    settings.anthropic_model.clone(),
                    settings.max_tokens,
                    settings.temperature,
                ),
                observer,
            ),
        }
    }

    fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::MissingApiKey {
                provider: Self::PROVIDER.to_string(),
            })?;

        let body = MessageRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature,
        };

        let response: MessageResponse = JsonRequest {
            url: endpoint(&self.base_url, "messages"),
            headers: vec![
                ("x-api-key", api_key.to_string()),
                ("anthropic-version", API_VERSION.to_string()),
            ],
            body: &body,
            timeout: self.timeout,
        }
        .send()?;

        let text: Vec<String> = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(BackendError::InvalidResponse(
                "no text content blocks".to_string(),
            ));
        }
        Ok(text.join(""))
    }
}

impl Backend for AnthropicBackend {
    fn provider(&self) -> &str {
        Self::PROVIDER
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> String {
        self.guard
            .run(prompt, options, |params| self.complete(prompt, params))
    }
}

impl fmt::Debug for AnthropicBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("defaults", self.guard.defaults())
            .finish()
    }
}
