//! # Mock Tools for Testing
//!
//! Tools that return predictable responses and remember how they were
//! called.

use cadre_core::{ExecutionResult, Tool, ToolParameters};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mock tool that returns predefined responses based on its input.
///
/// The input of a call is the value of its only string parameter, or the
/// compact JSON of all parameters otherwise.
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    description: String,
    responses: HashMap<String, ExecutionResult>,
    default_response: Option<ExecutionResult>,
    panic_on_call: bool,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockTool {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: format!("Mock {name} tool"),
            name,
            responses: HashMap::new(),
            default_response: None,
            panic_on_call: false,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a response for a specific input
    #[must_use]
    pub fn with_response(mut self, input: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .insert(input.into(), ExecutionResult::success(response));
        self
    }

    /// Add a failure response for a specific input
    #[must_use]
    pub fn with_failure(mut self, input: impl Into<String>, error: impl Into<String>) -> Self {
        self.responses
            .insert(input.into(), ExecutionResult::failure(error));
        self
    }

    /// Set a default response for any unmatched input
    #[must_use]
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(ExecutionResult::success(response));
        self
    }

    /// Set a default failure for any unmatched input
    #[must_use]
    pub fn with_default_failure(mut self, error: impl Into<String>) -> Self {
        self.default_response = Some(ExecutionResult::failure(error));
        self
    }

    /// Make every call panic, for exercising registry containment.
    #[must_use]
    pub fn panicking(mut self) -> Self {
        self.panic_on_call = true;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.call_history).len()
    }

    pub fn call_history(&self) -> Vec<String> {
        lock(&self.call_history).clone()
    }

    pub fn was_called_with(&self, input: &str) -> bool {
        lock(&self.call_history).iter().any(|seen| seen == input)
    }

    pub fn reset(&self) {
        lock(&self.call_history).clear();
    }
}

fn input_key(parameters: &ToolParameters) -> String {
    let mut strings = parameters.values().filter_map(Value::as_str);
    match (parameters.len(), strings.next()) {
        (1, Some(only)) => only.to_string(),
        _ => Value::Object(parameters.clone()).to_string(),
    }
}

impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameter_schema(&self) -> Value {
        serde_json::json!({"type": "object"})
    }

    fn call(&self, parameters: &ToolParameters) -> ExecutionResult {
        let input = input_key(parameters);
        lock(&self.call_history).push(input.clone());

        if self.panic_on_call {
            panic!("mock tool '{}' panicked on '{}'", self.name, input);
        }

        if let Some(response) = self.responses.get(&input) {
            response.clone()
        } else if let Some(default) = &self.default_response {
            default.clone()
        } else {
            ExecutionResult::success(format!("Mock response for: {}", input))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_core::single_parameter;
    use rstest::rstest;

    #[rstest]
    #[case("paris", "Sunny")]
    #[case("oslo", "Snow")]
    #[case("lima", "Mock response for: lima")]
    fn responds_by_input(#[case] city: &str, #[case] expected: &str) {
        let tool = MockTool::new("weather")
            .with_response("paris", "Sunny")
            .with_response("oslo", "Snow");

        let result = tool.call(&single_parameter("city", city));
        assert_eq!(result.output(), expected);
        assert!(tool.was_called_with(city));
    }

    #[test]
    fn failures_and_defaults() {
        let tool = MockTool::new("flaky")
            .with_failure("bad", "boom")
            .with_default_response("fine");

        assert!(!tool.call(&single_parameter("q", "bad")).is_success());
        assert_eq!(tool.call(&single_parameter("q", "other")).output(), "fine");
        assert_eq!(tool.call_count(), 2);

        tool.reset();
        assert_eq!(tool.call_count(), 0);
    }

    #[test]
    fn multi_parameter_input_is_json() {
        let tool = MockTool::new("pair");
        let mut parameters = single_parameter("a", "1");
        parameters.insert("b".to_string(), Value::from(2));

        tool.call(&parameters);
        assert_eq!(tool.call_history(), vec![r#"{"a":"1","b":2}"#.to_string()]);
    }
}
