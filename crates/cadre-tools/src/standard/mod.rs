//! Standard tool library.

mod calculator;
mod search;

pub use calculator::{CalculatorTool, EvalError, MAX_NESTING, evaluate, extract_expression};
pub use search::SearchTool;

use cadre_core::Tool;
use std::sync::Arc;

/// Tools shipped with Cadre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardTool {
    Search,
    Calculator,
}

impl StandardTool {
    pub fn name(&self) -> &'static str {
        match self {
            StandardTool::Search => "search",
            StandardTool::Calculator => "calculator",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tool| tool.name() == name)
    }

    pub fn all() -> &'static [StandardTool] {
        &[StandardTool::Search, StandardTool::Calculator]
    }

    /// Build a fresh instance of the tool.
    pub fn build(&self) -> Arc<dyn Tool> {
        match self {
            StandardTool::Search => Arc::new(SearchTool::new()),
            StandardTool::Calculator => Arc::new(CalculatorTool::new()),
        }
    }
}
