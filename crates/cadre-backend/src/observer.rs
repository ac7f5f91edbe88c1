use cadre_core::{BackendCall, CallObserver};

/// Observer that emits one structured `tracing` event per backend call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_call(&self, call: &BackendCall) {
        match &call.error {
            None => tracing::info!(
                provider = %call.provider,
                model = %call.model,
                temperature = call.temperature,
                max_tokens = call.max_tokens,
                prompt_tokens = call.prompt_tokens,
                response_tokens = call.response_tokens,
                total_tokens = call.total_tokens,
                elapsed_ms = call.elapsed.as_millis() as u64,
                "Backend call completed"
            ),
            Some(error) => tracing::warn!(
                provider = %call.provider,
                model = %call.model,
                prompt_tokens = call.prompt_tokens,
                elapsed_ms = call.elapsed.as_millis() as u64,
                error = %error,
                "Backend call returned failure text"
            ),
        }
    }
}
