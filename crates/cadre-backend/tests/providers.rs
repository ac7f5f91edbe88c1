//! Provider round trips against a mock HTTP server.
//!
//! Most tests run on the multi-threaded flavour, where backends block in
//! place. One runs on the default current-thread flavour.

use cadre_backend::{
    AnthropicBackend, Backend, GenerateOptions, NoopObserver, OllamaBackend, OpenAiBackend,
};
use cadre_core::{BackendCall, CallObserver, Settings, is_error_text};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Calls(Mutex<Vec<BackendCall>>);

impl CallObserver for Calls {
    fn on_call(&self, call: &BackendCall) {
        self.0.lock().unwrap().push(call.clone());
    }
}

fn settings_for(server: &MockServer) -> Settings {
    Settings {
        openai_api_key: Some("test-openai-key".to_string()),
        openai_base_url: server.uri(),
        anthropic_api_key: Some("test-anthropic-key".to_string()),
        anthropic_base_url: server.uri(),
        ollama_base_url: server.uri(),
        request_timeout_secs: Some(5),
        ..Settings::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn openai_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-openai-key"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 300,
            "messages": [{"role": "user", "content": "plan a trip"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Day one: Lisbon"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calls = Arc::new(Calls::default());
    let backend = OpenAiBackend::new(&settings_for(&server), calls.clone());
    let text = backend.generate("plan a trip", &GenerateOptions::new().with_max_tokens(300));

    assert_eq!(text, "Day one: Lisbon");
    let calls = calls.0.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].provider, "openai");
    assert_eq!(calls[0].max_tokens, 300);
    assert!(calls[0].error.is_none());
}

#[tokio::test]
async fn openai_answers_from_current_thread_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Porto by train"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let calls = Arc::new(Calls::default());
    let backend = OpenAiBackend::new(&settings_for(&server), calls.clone());
    let text = backend.generate("hi", &GenerateOptions::new());

    assert_eq!(text, "Porto by train");
    assert!(!is_error_text(&text));
    assert!(calls.0.lock().unwrap()[0].error.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn openai_error_status_becomes_failure_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let calls = Arc::new(Calls::default());
    let backend = OpenAiBackend::new(&settings_for(&server), calls.clone());
    let text = backend.generate("hello", &GenerateOptions::new());

    assert_eq!(
        text,
        "Error generating response with OpenAI: HTTP 401: Incorrect API key provided"
    );
    assert!(calls.0.lock().unwrap()[0].is_failure());
}

#[tokio::test(flavor = "multi_thread")]
async fn openai_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = OpenAiBackend::new(&settings_for(&server), Arc::new(NoopObserver));
    let text = backend.generate("hello", &GenerateOptions::new());
    assert!(text.starts_with("Error generating response with OpenAI: invalid response"));
}

#[tokio::test(flavor = "multi_thread")]
async fn ollama_sends_sampling_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama2",
            "prompt": "hello",
            "stream": false,
            "options": {"num_predict": 128}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama2",
            "response": "Hi from llama",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = OllamaBackend::new(&settings_for(&server), Arc::new(NoopObserver));
    let text = backend.generate("hello", &GenerateOptions::new().with_max_tokens(128));
    assert_eq!(text, "Hi from llama");
}

#[tokio::test(flavor = "multi_thread")]
async fn ollama_model_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "model 'llama9' not found"})),
        )
        .mount(&server)
        .await;

    let backend = OllamaBackend::new(&settings_for(&server), Arc::new(NoopObserver));
    let text = backend.generate("hello", &GenerateOptions::new().with_model("llama9"));
    assert_eq!(
        text,
        "Error generating response with Ollama: HTTP 404: model 'llama9' not found"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn anthropic_joins_text_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-anthropic-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Budget: "},
                {"type": "text", "text": "about 900 EUR"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = AnthropicBackend::new(&settings_for(&server), Arc::new(NoopObserver));
    let text = backend.generate("budget?", &GenerateOptions::new());
    assert_eq!(text, "Budget: about 900 EUR");
}

#[tokio::test(flavor = "multi_thread")]
async fn anthropic_overloaded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let backend = AnthropicBackend::new(&settings_for(&server), Arc::new(NoopObserver));
    let text = backend.generate("hello", &GenerateOptions::new());
    assert!(is_error_text(&text));
    assert!(text.ends_with("HTTP 529: Overloaded"));
}

#[test]
fn missing_keys_never_touch_the_network() {
    let settings = Settings {
        openai_base_url: "http://127.0.0.1:1".to_string(),
        anthropic_base_url: "http://127.0.0.1:1".to_string(),
        ..Settings::default()
    };

    let openai = OpenAiBackend::new(&settings, Arc::new(NoopObserver));
    let anthropic = AnthropicBackend::new(&settings, Arc::new(NoopObserver));

    assert!(
        openai
            .generate("x", &GenerateOptions::new())
            .contains("missing API key for provider 'openai'")
    );
    assert!(
        anthropic
            .generate("x", &GenerateOptions::new())
            .contains("missing API key for provider 'anthropic'")
    );
}
