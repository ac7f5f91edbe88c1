//! Backends and observers that never touch the network.

use cadre_core::{
    Backend, BackendCall, BackendError, CallGuard, CallObserver, GenerateOptions, ModelParams,
    NoopObserver,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A prompt as seen by a [`ScriptedBackend`], with the options it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPrompt {
    pub prompt: String,
    pub params: ModelParams,
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<String>,
    fallback: String,
    prompts: Vec<RecordedPrompt>,
}

/// Backend answering from a script.
///
/// Queued responses are returned in order; once the queue is empty every
/// call gets the fallback response.
#[derive(Debug, Clone)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
    guard: CallGuard,
}

impl ScriptedBackend {
    pub const PROVIDER: &'static str = "scripted";

    /// Backend that always answers `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                fallback: response.into(),
                ..Script::default()
            })),
            guard: CallGuard::new(
                Self::PROVIDER,
                "Scripted",
                ModelParams::new("scripted-model", 2000, 0.7),
                Arc::new(NoopObserver),
            ),
        }
    }

    /// Queue a response for the next unanswered call.
    #[must_use]
    pub fn then(self, response: impl Into<String>) -> Self {
        lock(&self.script).queued.push_back(response.into());
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.guard = CallGuard::new(
            Self::PROVIDER,
            "Scripted",
            self.guard.defaults().clone(),
            observer,
        );
        self
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<RecordedPrompt> {
        lock(&self.script).prompts.clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.script).prompts.last().map(|p| p.prompt.clone())
    }

    pub fn call_count(&self) -> usize {
        lock(&self.script).prompts.len()
    }
}

impl Backend for ScriptedBackend {
    fn provider(&self) -> &str {
        Self::PROVIDER
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> String {
        self.guard.run(prompt, options, |params| {
            let mut script = lock(&self.script);
            script.prompts.push(RecordedPrompt {
                prompt: prompt.to_string(),
                params: params.clone(),
            });
            let response = match script.queued.pop_front() {
                Some(response) => response,
                None => script.fallback.clone(),
            };
            Ok(response)
        })
    }
}

/// Backend whose every call fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    error: BackendError,
    calls: Arc<Mutex<usize>>,
    guard: CallGuard,
}

impl FailingBackend {
    pub const PROVIDER: &'static str = "failing";

    pub fn new(error: BackendError) -> Self {
        Self::with_observer(error, Arc::new(NoopObserver))
    }

    /// Fails like an unreachable server.
    pub fn unreachable() -> Self {
        Self::new(BackendError::Request("connection refused".to_string()))
    }

    pub fn with_observer(error: BackendError, observer: Arc<dyn CallObserver>) -> Self {
        Self {
            error,
            calls: Arc::new(Mutex::new(0)),
            guard: CallGuard::new(
                Self::PROVIDER,
                "Failing",
                ModelParams::new("failing-model", 2000, 0.7),
                observer,
            ),
        }
    }

    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }
}

impl Backend for FailingBackend {
    fn provider(&self) -> &str {
        Self::PROVIDER
    }

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> String {
        self.guard.run(prompt, options, |_| {
            *lock(&self.calls) += 1;
            Err(self.error.clone())
        })
    }
}

/// Observer that keeps every call it is told about.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    pub fn failures(&self) -> Vec<BackendCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.is_failure())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CallObserver for RecordingObserver {
    fn on_call(&self, call: &BackendCall) {
        lock(&self.calls).push(call.clone());
    }
}
