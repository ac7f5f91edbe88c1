//! Provider selection by name.

use crate::{AnthropicBackend, OllamaBackend, OpenAiBackend};
use cadre_core::{Backend, CallObserver, NoopObserver, Settings};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds a backend from settings and an observer.
pub type BackendFactory =
    Arc<dyn Fn(&Settings, Arc<dyn CallObserver>) -> Box<dyn Backend> + Send + Sync>;

/// Built-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Ollama,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Ollama, Provider::Anthropic];

    pub fn name(self) -> &'static str {
        match self {
            Provider::OpenAi => OpenAiBackend::PROVIDER,
            Provider::Ollama => OllamaBackend::PROVIDER,
            Provider::Anthropic => AnthropicBackend::PROVIDER,
        }
    }

    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|provider| provider.name().eq_ignore_ascii_case(name))
    }

    pub fn build(self, settings: &Settings, observer: Arc<dyn CallObserver>) -> Box<dyn Backend> {
        match self {
            Provider::OpenAi => Box::new(OpenAiBackend::new(settings, observer)),
            Provider::Ollama => Box::new(OllamaBackend::new(settings, observer)),
            Provider::Anthropic => Box::new(AnthropicBackend::new(settings, observer)),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hands out backends by provider name.
///
/// Unknown names fall back to the configured default provider, or to
/// `openai` when the default itself is unknown. Custom factories registered
/// with [`BackendSelector::with_provider`] take precedence over built-ins.
#[derive(Clone)]
pub struct BackendSelector {
    settings: Settings,
    observer: Arc<dyn CallObserver>,
    custom: BTreeMap<String, BackendFactory>,
}

impl BackendSelector {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            observer: Arc::new(NoopObserver),
            custom: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Register a factory under `name` (matched case-insensitively).
    #[must_use]
    pub fn with_provider<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Settings, Arc<dyn CallObserver>) -> Box<dyn Backend> + Send + Sync + 'static,
    {
        self.custom
            .insert(name.into().trim().to_ascii_lowercase(), Arc::new(factory));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Every name `get_provider` recognises, built-ins first.
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Provider::ALL
            .iter()
            .map(|provider| provider.name().to_string())
            .collect();
        for name in self.custom.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    fn is_known(&self, name: &str) -> bool {
        let key = name.trim().to_ascii_lowercase();
        self.custom.contains_key(&key) || Provider::from_name(&key).is_some()
    }

    /// The provider name `get_provider(name)` will actually use.
    pub fn resolve_name(&self, name: &str) -> String {
        if self.is_known(name) {
            return name.trim().to_ascii_lowercase();
        }

        let fallback = if self.is_known(&self.settings.default_provider) {
            self.settings.default_provider.trim().to_ascii_lowercase()
        } else {
            Provider::OpenAi.name().to_string()
        };
        tracing::warn!(
            requested = %name,
            fallback = %fallback,
            "Unknown model provider, using fallback"
        );
        fallback
    }

    /// Build the backend for `name`, falling back for unknown names.
    pub fn get_provider(&self, name: &str) -> Box<dyn Backend> {
        let resolved = self.resolve_name(name);
        if let Some(factory) = self.custom.get(&resolved) {
            return factory(&self.settings, self.observer.clone());
        }
        Provider::from_name(&resolved)
            .unwrap_or(Provider::OpenAi)
            .build(&self.settings, self.observer.clone())
    }

    /// Backend for the configured default provider.
    pub fn default_backend(&self) -> Box<dyn Backend> {
        self.get_provider(&self.settings.default_provider)
    }
}

impl fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSelector")
            .field("settings", &self.settings)
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
