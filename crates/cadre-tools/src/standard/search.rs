use cadre_core::{ExecutionResult, Tool, ToolParameters, string_param};
use serde_json::json;

/// Web search stand-in.
///
/// Network transport is left to embedding hosts; this tool answers with a
/// deterministic result line for the query so the agent pipeline can be
/// exercised end to end.
#[derive(Debug, Clone, Default)]
pub struct SearchTool;

impl SearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query"}
            },
            "required": ["query"]
        })
    }

    fn call(&self, parameters: &ToolParameters) -> ExecutionResult {
        match string_param(parameters, "query") {
            Ok(query) => ExecutionResult::success(format!(
                "Search results for '{}' would be displayed here in a real implementation.",
                query
            )),
            Err(reason) => ExecutionResult::failed(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_core::{FailureReason, single_parameter};

    #[test]
    fn search_echoes_query() {
        let result = SearchTool::new().call(&single_parameter("query", "museums in Porto"));
        assert_eq!(
            result.output(),
            "Search results for 'museums in Porto' would be displayed here in a real implementation."
        );
    }

    #[test]
    fn search_requires_query() {
        let result = SearchTool::new().call(&ToolParameters::new());
        assert_eq!(
            result,
            ExecutionResult::failed(FailureReason::MissingParameter {
                name: "query".to_string()
            })
        );
    }
}
