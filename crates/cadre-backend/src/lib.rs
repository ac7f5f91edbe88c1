//! # Cadre Backends
//!
//! Concrete text-generation providers and the selector that picks one by
//! name.
//!
//! ## Providers
//!
//! - `openai`: chat completions API (default)
//! - `ollama`: local `/api/generate`
//! - `anthropic`: messages API
//!
//! Every backend answers `generate` with text. Provider failures are
//! rendered as `Error generating response with <Provider>: <reason>`.

mod anthropic;
mod http;
mod observer;
mod ollama;
mod openai;
mod selector;

pub use anthropic::AnthropicBackend;
pub use cadre_core::{Backend, CallObserver, GenerateOptions, NoopObserver};
pub use observer::TracingObserver;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;
pub use selector::{BackendFactory, BackendSelector, Provider};
