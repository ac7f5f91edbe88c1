//! The role table.
//!
//! Each role is data: role text, bound tools, and keyword triggers checked
//! in order against the generated plan text and the user message.

use cadre_core::{ToolParameters, single_parameter};
use cadre_tools::StandardTool;
use cadre_tools::standard::extract_expression;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known agent role types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    #[default]
    TravelPlanner,
    LocalGuide,
    BudgetAdvisor,
}

/// How a trigger derives tool parameters from the user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// `{query: prefix + message}`
    Query { prefix: &'static str },
    /// `{expression: first arithmetic run in the message}`, or the whole
    /// message when it holds none.
    Expression,
}

impl ParameterSource {
    pub fn parameters(&self, message: &str) -> ToolParameters {
        match self {
            ParameterSource::Query { prefix } => {
                single_parameter("query", format!("{prefix}{message}"))
            }
            ParameterSource::Expression => single_parameter(
                "expression",
                extract_expression(message).unwrap_or_else(|| message.to_string()),
            ),
        }
    }
}

/// One keyword rule selecting a tool.
///
/// Fires when the lowercased plan text contains any of `plan_keywords` or
/// the lowercased message contains any of `message_keywords`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub tool: StandardTool,
    pub plan_keywords: &'static [&'static str],
    pub message_keywords: &'static [&'static str],
    pub parameters: ParameterSource,
}

impl Trigger {
    pub fn matches(&self, plan_text: &str, message: &str) -> bool {
        let plan_text = plan_text.to_lowercase();
        let message = message.to_lowercase();
        self.plan_keywords.iter().any(|k| plan_text.contains(k))
            || self.message_keywords.iter().any(|k| message.contains(k))
    }
}

const SEARCH_ON_EITHER: Trigger = Trigger {
    tool: StandardTool::Search,
    plan_keywords: &["search"],
    message_keywords: &["search"],
    parameters: ParameterSource::Query { prefix: "" },
};

const TRAVEL_PLANNER_TRIGGERS: &[Trigger] = &[
    SEARCH_ON_EITHER,
    Trigger {
        tool: StandardTool::Calculator,
        plan_keywords: &["calculate", "budget"],
        message_keywords: &[],
        parameters: ParameterSource::Expression,
    },
];

const LOCAL_GUIDE_TRIGGERS: &[Trigger] = &[SEARCH_ON_EITHER];

const BUDGET_ADVISOR_TRIGGERS: &[Trigger] = &[
    Trigger {
        tool: StandardTool::Calculator,
        plan_keywords: &["calculate"],
        message_keywords: &["budget"],
        parameters: ParameterSource::Expression,
    },
    Trigger {
        tool: StandardTool::Search,
        plan_keywords: &["search"],
        message_keywords: &[],
        parameters: ParameterSource::Query {
            prefix: "budget information for ",
        },
    },
];

impl RoleKind {
    pub const ALL: [RoleKind; 3] = [
        RoleKind::TravelPlanner,
        RoleKind::LocalGuide,
        RoleKind::BudgetAdvisor,
    ];

    /// The registration name of the role.
    pub fn type_name(self) -> &'static str {
        match self {
            RoleKind::TravelPlanner => "travel_planner",
            RoleKind::LocalGuide => "local_guide",
            RoleKind::BudgetAdvisor => "budget_advisor",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.type_name().eq_ignore_ascii_case(name))
    }

    /// Text substituted into `You are {role}.` of the planning prompt.
    pub fn role_text(self) -> &'static str {
        match self {
            RoleKind::TravelPlanner => {
                "a senior travel planner with 20 years of experience, \
                 skilled at building personalised itineraries from traveller preferences"
            }
            RoleKind::LocalGuide => {
                "a local guide, a long-time resident of the destination \
                 who knows its culture and food intimately"
            }
            RoleKind::BudgetAdvisor => {
                "a budget advisor, a financial planning expert \
                 who keeps travel spending under control without spoiling the experience"
            }
        }
    }

    /// Tools bound to every agent of this role, in registration order.
    pub fn tools(self) -> &'static [StandardTool] {
        match self {
            RoleKind::TravelPlanner => &[StandardTool::Search, StandardTool::Calculator],
            RoleKind::LocalGuide => &[StandardTool::Search],
            RoleKind::BudgetAdvisor => &[StandardTool::Calculator, StandardTool::Search],
        }
    }

    /// Triggers in evaluation order; the first match wins.
    pub fn triggers(self) -> &'static [Trigger] {
        match self {
            RoleKind::TravelPlanner => TRAVEL_PLANNER_TRIGGERS,
            RoleKind::LocalGuide => LOCAL_GUIDE_TRIGGERS,
            RoleKind::BudgetAdvisor => BUDGET_ADVISOR_TRIGGERS,
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
