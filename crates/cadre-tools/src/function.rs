use cadre_core::{ExecutionResult, Tool, ToolParameters};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

type Executor = Arc<dyn Fn(&ToolParameters) -> ExecutionResult + Send + Sync>;

/// A tool backed by a closure.
///
/// ```rust
/// use cadre_tools::{ExecutionResult, FunctionTool, Tool};
/// use cadre_core::single_parameter;
///
/// let weather = FunctionTool::new("weather", "Current weather for a city", |params| {
///     let city = params.get("city").and_then(|v| v.as_str()).unwrap_or("nowhere");
///     ExecutionResult::success(format!("Sunny in {city}"))
/// });
///
/// let output = weather.call(&single_parameter("city", "Porto"));
/// assert_eq!(output.output(), "Sunny in Porto");
/// ```
#[derive(Clone)]
pub struct FunctionTool {
    name: String,
    description: String,
    schema: serde_json::Value,
    executor: Executor,
}

impl FunctionTool {
    /// Create a tool accepting any object of parameters.
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, executor: F) -> Self
    where
        F: Fn(&ToolParameters) -> ExecutionResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema: json!({"type": "object"}),
            executor: Arc::new(executor),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = schema;
        self
    }
}

impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameter_schema(&self) -> serde_json::Value {
        self.schema.clone()
    }

    fn call(&self, parameters: &ToolParameters) -> ExecutionResult {
        (self.executor)(parameters)
    }
}

impl fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
