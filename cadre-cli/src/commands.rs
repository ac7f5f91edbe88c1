//! Subcommand implementations. Each returns the JSON document to print.

use cadre_agent::{Agent, RoleKind, TaskCoordinator};
use cadre_backend::{BackendSelector, TracingObserver};
use cadre_core::{CadreError, ErrorPayload, Message, Settings, ToolInfo};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;

pub type CommandResult = Result<Value, CadreError>;

pub fn load_settings(path: Option<&Path>) -> Result<Settings, CadreError> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::from_env()?,
    };
    Ok(settings)
}

fn coordinator(settings: Settings) -> TaskCoordinator {
    let selector = BackendSelector::new(settings).with_observer(Arc::new(TracingObserver));
    TaskCoordinator::new(selector)
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| json!({ "error": err.to_string() }))
}

/// Register one agent per role and run the request through all of them.
pub fn plan(settings: Settings, request: &str, session: &str, provider: Option<&str>) -> CommandResult {
    let provider = provider
        .map(str::to_string)
        .unwrap_or_else(|| settings.default_provider.clone());
    let mut coordinator = coordinator(settings);

    for role in RoleKind::ALL {
        let capability = match role {
            RoleKind::TravelPlanner => "destination_recommendation",
            RoleKind::LocalGuide => "local_knowledge",
            RoleKind::BudgetAdvisor => "cost_estimation",
        };
        coordinator.register_agent(
            role.type_name(),
            role.type_name(),
            vec![capability.to_string()],
            &provider,
        );
    }

    let reports = coordinator.handle_request(request, session)?;
    Ok(json!({
        "request": request,
        "session": session,
        "reports": to_value(&reports),
        "queue": to_value(&coordinator.task_queue()),
    }))
}

pub fn chat(
    settings: Settings,
    message: &str,
    agent_type: &str,
    provider: Option<&str>,
    session: &str,
) -> CommandResult {
    let provider = provider
        .map(str::to_string)
        .unwrap_or_else(|| settings.default_provider.clone());
    let mut coordinator = coordinator(settings);
    coordinator.register_agent("cli-agent", agent_type, Vec::new(), &provider);

    let Some(agent) = coordinator.agent_mut("cli-agent") else {
        return Ok(to_value(&ErrorPayload::new("agent registration failed")));
    };
    let response = agent.process_message(Message::user(message), session);
    Ok(to_value(&response))
}

pub fn tools(agent_type: &str) -> CommandResult {
    let role = RoleKind::from_type_name(agent_type).unwrap_or_default();
    let catalog: Vec<ToolInfo> = role
        .tools()
        .iter()
        .map(|tool| ToolInfo::of(tool.build().as_ref()))
        .collect();
    Ok(json!({
        "role": role.type_name(),
        "tools": to_value(&catalog),
    }))
}

pub fn analyze(settings: Settings, request: &str) -> CommandResult {
    Ok(to_value(&coordinator(settings).analyze_request(request)))
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => println!("{}", json!({ "error": err.to_string() })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_lists_role_catalog() {
        let value = tools("local_guide").unwrap();
        assert_eq!(value["role"], "local_guide");
        assert_eq!(value["tools"].as_array().unwrap().len(), 1);
        assert_eq!(value["tools"][0]["name"], "search");
    }

    #[test]
    fn tools_unknown_role_uses_default() {
        let value = tools("pirate").unwrap();
        assert_eq!(value["role"], "travel_planner");
    }

    #[test]
    fn analyze_prints_three_tasks() {
        let value = analyze(Settings::default(), "Kyoto").unwrap();
        let tasks = value["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[2]["type"], "budget_planning");
    }

    #[test]
    fn chat_against_unreachable_backend_still_answers() {
        let settings = Settings {
            ollama_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: Some(2),
            ..Settings::default()
        };
        let value = chat(settings, "hello there", "local_guide", Some("ollama"), "t").unwrap();

        assert_eq!(value["role"], "assistant");
        assert_eq!(value["agent_id"], "cli-agent");
        assert!(
            value["content"]
                .as_str()
                .unwrap()
                .contains("Error generating response with Ollama")
        );
    }
}
