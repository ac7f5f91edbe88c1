//! Planning prompt construction and plan classification.

use crate::role::Trigger;
use cadre_core::{Message, Plan, ToolInfo};

/// Render the planning prompt.
///
/// `context` is expected to be already limited to the planning window.
pub fn build_planning_prompt(
    role_text: &str,
    context: &[Message],
    message: &str,
    tools: &[ToolInfo],
) -> String {
    let mut prompt = format!(
        "You are {role_text}. Your goal is to help the user with their request.\n\n\
         Conversation context:\n"
    );
    for (i, entry) in context.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, entry.content));
    }

    prompt.push_str(&format!("\nUser message: {message}\n\nAvailable tools:\n"));
    for tool in tools {
        prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
    }

    prompt.push_str(
        "\nPlease provide your plan in a structured format. \
         You can use available tools if needed.",
    );
    prompt
}

/// Turn generated plan text into a [`Plan`].
///
/// Triggers are tried in order and only those whose tool passes
/// `is_bound` are considered. No match means a direct response carrying
/// the plan text.
pub fn classify_plan<F>(triggers: &[Trigger], plan_text: &str, message: &str, is_bound: F) -> Plan
where
    F: Fn(&str) -> bool,
{
    triggers
        .iter()
        .filter(|trigger| is_bound(trigger.tool.name()))
        .find(|trigger| trigger.matches(plan_text, message))
        .map(|trigger| Plan::use_tool(trigger.tool.name(), trigger.parameters.parameters(message)))
        .unwrap_or_else(|| Plan::respond(plan_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleKind;
    use cadre_core::single_parameter;
    use rstest::rstest;

    fn all_bound(_: &str) -> bool {
        true
    }

    #[test]
    fn prompt_layout() {
        let context = vec![Message::user("hi"), Message::assistant("hello")];
        let tools = vec![ToolInfo {
            name: "search".to_string(),
            description: "Search the web for information".to_string(),
        }];
        let prompt = build_planning_prompt("a tester", &context, "find flights", &tools);

        assert!(prompt.starts_with(
            "You are a tester. Your goal is to help the user with their request.\n\n"
        ));
        assert!(prompt.contains("Conversation context:\n1. hi\n2. hello\n"));
        assert!(prompt.contains("\nUser message: find flights\n\n"));
        assert!(prompt.contains("Available tools:\n- search: Search the web for information\n"));
        assert!(prompt.ends_with("You can use available tools if needed."));
    }

    #[rstest]
    #[case::message_search(RoleKind::TravelPlanner, "Sure.", "please search for X", Some("search"))]
    #[case::plan_search(RoleKind::TravelPlanner, "I will SEARCH hotels", "hotels?", Some("search"))]
    #[case::plan_budget(RoleKind::TravelPlanner, "Let me work out the budget", "Rome", Some("calculator"))]
    #[case::message_budget_ignored(RoleKind::TravelPlanner, "Enjoy", "my budget is small", None)]
    #[case::search_beats_calculate(RoleKind::TravelPlanner, "calculate then search", "x", Some("search"))]
    #[case::guide_search(RoleKind::LocalGuide, "ok", "search food stalls", Some("search"))]
    #[case::guide_never_calculates(RoleKind::LocalGuide, "calculate the budget", "x", None)]
    #[case::advisor_message_budget(RoleKind::BudgetAdvisor, "ok", "Budget for Rome", Some("calculator"))]
    #[case::advisor_calculate_first(RoleKind::BudgetAdvisor, "search and calculate", "x", Some("calculator"))]
    #[case::advisor_plan_search(RoleKind::BudgetAdvisor, "search prices", "Rome", Some("search"))]
    #[case::advisor_message_search_ignored(RoleKind::BudgetAdvisor, "ok", "search Rome", None)]
    fn trigger_table(
        #[case] role: RoleKind,
        #[case] plan_text: &str,
        #[case] message: &str,
        #[case] expected_tool: Option<&str>,
    ) {
        let plan = classify_plan(role.triggers(), plan_text, message, all_bound);
        assert_eq!(plan.tool_name(), expected_tool);
        if expected_tool.is_none() {
            assert_eq!(plan, Plan::respond(plan_text));
        }
    }

    #[test]
    fn search_query_is_the_raw_message() {
        let plan = classify_plan(
            RoleKind::TravelPlanner.triggers(),
            "Sure.",
            "please search for X",
            all_bound,
        );
        assert_eq!(
            plan,
            Plan::use_tool("search", single_parameter("query", "please search for X"))
        );
    }

    #[test]
    fn advisor_search_query_is_prefixed() {
        let plan = classify_plan(
            RoleKind::BudgetAdvisor.triggers(),
            "search prices",
            "Rome",
            all_bound,
        );
        assert_eq!(
            plan,
            Plan::use_tool(
                "search",
                single_parameter("query", "budget information for Rome")
            )
        );
    }

    #[test]
    fn unbound_tools_are_skipped() {
        let plan = classify_plan(
            RoleKind::TravelPlanner.triggers(),
            "search it",
            "x",
            |name| name != "search",
        );
        assert_eq!(plan, Plan::respond("search it"));
    }
}
