use cadre_core::error::panic_message;
use cadre_core::{
    ErrorPayload, ExecutionResult, Tool, ToolError, ToolInfo, ToolName, ToolParameters,
    validate_tool,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Trait for managing and dispatching tool calls.
///
/// A registry is the catalog an agent plans against. Lookups and execution
/// never panic: missing tools and executor faults come back as
/// [`ToolError`] values.
pub trait ToolRegistry {
    /// Register a tool under its own name.
    ///
    /// An existing tool with the same name is replaced. Fails only when the
    /// tool's metadata is incomplete.
    fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError>;

    /// Name and description of every registered tool, in registration order.
    fn get_available_tools(&self) -> Vec<ToolInfo>;

    /// Execute a tool by name.
    ///
    /// # Returns
    ///
    /// `Ok(output)` on success, `Err(ToolError::NotFound)` for an unknown
    /// name, and `Err(ToolError::ExecutionFailed)` when the executor fails
    /// or panics.
    fn execute(&self, name: &str, parameters: &ToolParameters) -> Result<String, ToolError>;

    /// Whether a tool is registered under `name`.
    fn contains(&self, name: &str) -> bool;
}

/// In-memory tool registry for local tool storage and dispatch.
///
/// Tools are stored by validated name for O(1) lookup; registration order
/// is kept separately so catalogs render the same way every time.
///
/// # Example
///
/// ```rust
/// use cadre_tools::{InMemoryToolRegistry, SearchTool, ToolRegistry};
/// use cadre_core::single_parameter;
/// use std::sync::Arc;
///
/// let mut registry = InMemoryToolRegistry::new();
/// registry.register_tool(Arc::new(SearchTool::new())).unwrap();
///
/// let output = registry
///     .execute("search", &single_parameter("query", "lisbon"))
///     .unwrap();
/// assert!(output.contains("lisbon"));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryToolRegistry {
    tools: HashMap<ToolName, Arc<dyn Tool>>,
    order: Vec<ToolName>,
}

impl InMemoryToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool using the builder pattern.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::InvalidDefinition` if the tool's metadata is incomplete.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolError> {
        self.register_tool(tool)?;
        Ok(self)
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let name = ToolName::new(name).ok()?;
        self.tools.get(&name).cloned()
    }

    /// Registered tool names in registration order.
    pub fn tool_names(&self) -> Vec<String> {
        self.order.iter().map(|name| name.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = validate_tool(tool.as_ref())?;

        if self.tools.insert(name.clone(), tool).is_some() {
            debug!(tool = %name, "Replaced existing tool registration");
        } else {
            debug!(tool = %name, "Registered tool");
            self.order.push(name);
        }
        Ok(())
    }

    fn get_available_tools(&self) -> Vec<ToolInfo> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolInfo::of(tool.as_ref()))
            .collect()
    }

    fn execute(&self, name: &str, parameters: &ToolParameters) -> Result<String, ToolError> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| tool.call(parameters)))
            .unwrap_or_else(|payload| ExecutionResult::failure(panic_message(payload)));

        result
            .into_result()
            .inspect(|output| debug!(tool = %name, output_len = output.len(), "Tool executed"))
            .map_err(|reason| {
                warn!(tool = %name, error = %reason, "Tool execution failed");
                ToolError::execution_failed(name, reason.message())
            })
    }

    fn contains(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }
}

/// Tool boundary result as data: `{"result": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    Completed { result: String },
    Failed(ErrorPayload),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Failed(_))
    }
}

impl From<Result<String, ToolError>> for ToolOutcome {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(result) => ToolOutcome::Completed { result },
            Err(err) => ToolOutcome::Failed(ErrorPayload::from(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_core::single_parameter;
    use serde_json::json;

    struct UppercaseTool;

    impl Tool for UppercaseTool {
        fn name(&self) -> &str {
            "uppercase"
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn parameter_schema(&self) -> serde_json::Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        fn call(&self, parameters: &ToolParameters) -> ExecutionResult {
            match parameters.get("text").and_then(|v| v.as_str()) {
                Some(text) => ExecutionResult::success(text.to_uppercase()),
                None => ExecutionResult::failure("text is required"),
            }
        }
    }

    struct ShoutTool(&'static str);

    impl Tool for ShoutTool {
        fn name(&self) -> &str {
            "uppercase"
        }

        fn description(&self) -> &str {
            self.0
        }

        fn parameter_schema(&self) -> serde_json::Value {
            json!({"type": "object"})
        }

        fn call(&self, _parameters: &ToolParameters) -> ExecutionResult {
            ExecutionResult::success("SHOUT")
        }
    }

    struct PanickingTool;

    impl Tool for PanickingTool {
        fn name(&self) -> &str {
            "unstable"
        }

        fn description(&self) -> &str {
            "Always panics"
        }

        fn parameter_schema(&self) -> serde_json::Value {
            json!({"type": "object"})
        }

        fn call(&self, _parameters: &ToolParameters) -> ExecutionResult {
            panic!("executor blew up")
        }
    }

    #[test]
    fn registry_executes_registered_tool() {
        let registry = InMemoryToolRegistry::new()
            .with_tool(Arc::new(UppercaseTool))
            .unwrap();

        let output = registry
            .execute("uppercase", &single_parameter("text", "cadre"))
            .unwrap();
        assert_eq!(output, "CADRE");
    }

    #[test]
    fn registry_reports_missing_tool() {
        let registry = InMemoryToolRegistry::new();
        let err = registry
            .execute("nonexistent_tool", &ToolParameters::new())
            .unwrap_err();
        assert_eq!(err.kind(), "ToolNotFound");
    }

    #[test]
    fn registry_reports_invalid_lookup_name_as_missing() {
        let registry = InMemoryToolRegistry::new();
        let err = registry.execute("not a name!", &ToolParameters::new()).unwrap_err();
        assert_eq!(err, ToolError::not_found("not a name!"));
    }

    #[test]
    fn registry_wraps_executor_failure() {
        let registry = InMemoryToolRegistry::new()
            .with_tool(Arc::new(UppercaseTool))
            .unwrap();

        let err = registry
            .execute("uppercase", &ToolParameters::new())
            .unwrap_err();
        assert_eq!(err.kind(), "ToolExecutionError");
        assert!(err.to_string().contains("text is required"));
    }

    #[test]
    fn registry_contains_executor_panic() {
        let registry = InMemoryToolRegistry::new()
            .with_tool(Arc::new(PanickingTool))
            .unwrap();

        let err = registry.execute("unstable", &ToolParameters::new()).unwrap_err();
        assert_eq!(err.kind(), "ToolExecutionError");
        assert!(err.to_string().contains("executor blew up"));
    }

    #[test]
    fn registry_last_registration_wins() {
        let mut registry = InMemoryToolRegistry::new();
        registry.register_tool(Arc::new(UppercaseTool)).unwrap();
        registry.register_tool(Arc::new(ShoutTool("Shouts"))).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.execute("uppercase", &ToolParameters::new()).unwrap(),
            "SHOUT"
        );
        assert_eq!(registry.get_available_tools()[0].description, "Shouts");
    }

    #[test]
    fn registry_rejects_incomplete_tool() {
        let mut registry = InMemoryToolRegistry::new();
        let err = registry.register_tool(Arc::new(ShoutTool(""))).unwrap_err();
        assert_eq!(err.kind(), "InvalidToolDefinition");
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_catalog_keeps_registration_order() {
        let registry = InMemoryToolRegistry::new()
            .with_tool(Arc::new(PanickingTool))
            .unwrap()
            .with_tool(Arc::new(UppercaseTool))
            .unwrap();

        let names: Vec<String> = registry
            .get_available_tools()
            .into_iter()
            .map(|info| info.name)
            .collect();
        assert_eq!(names, vec!["unstable", "uppercase"]);
        assert_eq!(registry.tool_names(), names);
    }

    #[test]
    fn outcome_serializes_as_result_or_error() {
        let ok = ToolOutcome::from(Ok::<_, ToolError>("42".to_string()));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"result": "42"}));

        let failed = ToolOutcome::from(Err(ToolError::not_found("weather")));
        assert!(failed.is_error());
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["kind"], "ToolNotFound");
        assert!(value["error"].as_str().unwrap().contains("weather"));
    }
}
