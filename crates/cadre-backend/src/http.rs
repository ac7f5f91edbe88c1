//! Blocking JSON-over-HTTP plumbing shared by the providers.

use cadre_core::BackendError;
use cadre_core::error::panic_message;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

/// Execute an async operation using the current runtime or creating a new one.
///
/// Inside a multi-threaded runtime the call blocks in place. A current-thread
/// runtime cannot block in place, so the operation runs on a fresh runtime
/// in a scoped thread. Outside any runtime a fresh one is built on the
/// calling thread.
pub(crate) fn run_async<F, Fut, T>(f: F) -> Result<T, BackendError>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T, BackendError>>,
    T: Send,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| handle.block_on(f()))
        }
        Ok(_) => thread::scope(|scope| {
            scope
                .spawn(|| block_on_fresh(f))
                .join()
                .unwrap_or_else(|payload| Err(BackendError::Panicked(panic_message(payload))))
        }),
        Err(_) => block_on_fresh(f),
    }
}

fn block_on_fresh<F, Fut, T>(f: F) -> Result<T, BackendError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    match Runtime::new() {
        Ok(rt) => rt.block_on(f()),
        Err(e) => Err(BackendError::Runtime(e.to_string())),
    }
}

/// One outgoing JSON POST.
pub(crate) struct JsonRequest<'a, B> {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: &'a B,
    pub timeout: Option<Duration>,
}

impl<B: Serialize + Sync> JsonRequest<'_, B> {
    /// Send the request and decode a successful body as `R`.
    ///
    /// A client is built per call; connections are not pooled across calls.
    pub(crate) fn send<R: DeserializeOwned + Send>(self) -> Result<R, BackendError> {
        run_async(|| async move {
            let mut builder = Client::builder();
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder
                .build()
                .map_err(|e| BackendError::Request(e.to_string()))?;

            let mut request = client.post(&self.url).json(self.body);
            for (name, value) in &self.headers {
                request = request.header(*name, value);
            }

            let response = request
                .send()
                .await
                .map_err(|e| BackendError::Request(e.to_string()))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| BackendError::Request(e.to_string()))?;

            if !status.is_success() {
                return Err(BackendError::Status {
                    status: status.as_u16(),
                    message: error_message(&text),
                });
            }

            serde_json::from_str(&text).map_err(|e| BackendError::InvalidResponse(e.to_string()))
        })
    }
}

/// Pull the human-readable part out of a provider error body.
///
/// Understands `{"error": {"message": ...}}` and `{"error": "..."}`;
/// anything else is returned as-is.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|value| {
        let error = value.get("error")?;
        error
            .get("message")
            .and_then(|message| message.as_str())
            .or_else(|| error.as_str())
            .map(str::to_string)
    });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"error":{"message":"Invalid API key","type":"auth"}}"#, "Invalid API key")]
    #[case(r#"{"error":"model 'llama9' not found"}"#, "model 'llama9' not found")]
    #[case("upstream timeout", "upstream timeout")]
    #[case("", "empty response body")]
    fn extracts_error_messages(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(error_message(body), expected);
    }

    #[rstest]
    #[case("http://localhost:11434", "api/generate")]
    #[case("http://localhost:11434/", "/api/generate")]
    fn joins_endpoints(#[case] base: &str, #[case] path: &str) {
        assert_eq!(endpoint(base, path), "http://localhost:11434/api/generate");
    }

    #[test]
    fn run_async_without_runtime() {
        let value = run_async(|| async { Ok::<_, BackendError>(7) }).unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn run_async_inside_current_thread_runtime() {
        let value = run_async(|| async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, BackendError>("done")
        })
        .unwrap();
        assert_eq!(value, "done");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_async_inside_multi_thread_runtime() {
        let value = run_async(|| async { Ok::<_, BackendError>(11) }).unwrap();
        assert_eq!(value, 11);
    }
}
