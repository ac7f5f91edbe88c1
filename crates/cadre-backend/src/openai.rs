use crate::http::{JsonRequest, endpoint};
use cadre_core::{
    Backend, BackendError, CallGuard, CallObserver, GenerateOptions, ModelParams, Settings,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat completions backend.
pub struct OpenAiBackend {
    api_key: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
    guard: CallGuard,
}

impl OpenAiBackend {
    pub const PROVIDER: &'static str = "openai";

    pub fn new(settings: &Settings, observer: Arc<dyn CallObserver>) -> Self {
        Self {
            api_key: settings.openai_api_key.clone(),
            base_url: settings.openai_base_url.clone(),
            timeout: settings.request_timeout_secs.map(Duration::from_secs),
            guard: CallGuard::new(
                Self::PROVIDER,
                "OpenAI",
                ModelParams::new(
                    settings.default_model.clone(),
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

        let body = ChatRequest {
            model: &params.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response: ChatResponse = JsonRequest {
            url: endpoint(&self.base_url, "chat/completions"),
            headers: vec![("Authorization", format!("Bearer {}", api_key))],
            body: &body,
            timeout: self.timeout,
        }
        .send()?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::InvalidResponse("no completion choices".to_string()))
    }
}

impl Backend for OpenAiBackend {
    fn provider(&self) -> &str {
        Self::PROVIDER
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> String {
        self.guard
            .run(prompt, options, |params| self.complete(prompt, params))
    }
}

impl fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("defaults", self.guard.defaults())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_core::{NoopObserver, is_error_text};
    use serde_json::json;

    #[test]
    fn request_body_shape() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 300,
            temperature: 0.5,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 300,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn missing_key_is_reported_as_text() {
        let backend = OpenAiBackend::new(&Settings::default(), Arc::new(NoopObserver));
        let text = backend.generate("hello", &GenerateOptions::new());

        assert!(is_error_text(&text));
        assert_eq!(
            text,
            "Error generating response with OpenAI: missing API key for provider 'openai'"
        );
    }

    #[test]
    fn debug_hides_key() {
        let settings = Settings {
            openai_api_key: Some("sk-very-secret".to_string()),
            ..Settings::default()
        };
        let backend = OpenAiBackend::new(&settings, Arc::new(NoopObserver));
        assert!(!format!("{backend:?}").contains("sk-very-secret"));
    }
}
