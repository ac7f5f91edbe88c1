//! Property tests for context compaction and interaction ordering.

use cadre_core::{AgentResponse, Message, Plan, single_parameter};
use cadre_memory::{CompactionPolicy, ContextStore};
use proptest::prelude::*;

/// Expected length after `n` appends under a policy: compaction happens on
/// every append that pushes the length past `max_len`.
fn expected_len(n: usize, policy: CompactionPolicy) -> usize {
    let mut len = 0;
    for _ in 0..n {
        len += 1;
        if len > policy.max_len() {
            len = policy.retain();
        }
    }
    len
}

proptest! {
    /// Context is always bounded and always the most recent suffix in order.
    #[test]
    fn context_is_most_recent_suffix(n in 0usize..200) {
        let policy = CompactionPolicy::default();
        let mut store = ContextStore::new("agent");
        for i in 0..n {
            store.update_context("s1", Message::user(i.to_string()));
        }

        let context = store.get_context("s1");
        prop_assert_eq!(context.len(), expected_len(n, policy));
        prop_assert!(context.len() <= policy.max_len());

        for (offset, message) in context.iter().enumerate() {
            let expected = n - context.len() + offset;
            prop_assert_eq!(&message.content, &expected.to_string());
        }
    }

    /// Below the threshold, nothing is lost.
    #[test]
    fn short_sessions_keep_everything(n in 0usize..=50) {
        let mut store = ContextStore::new("agent");
        for i in 0..n {
            store.update_context("s1", Message::user(i.to_string()));
        }
        prop_assert_eq!(store.get_context("s1").len(), n);
    }

    /// Custom policies hold the same bound.
    #[test]
    fn custom_policy_bound(max_len in 1usize..40, retain in 1usize..40, n in 0usize..120) {
        let policy = CompactionPolicy::new(max_len, retain);
        let mut store = ContextStore::new("agent").with_policy(policy);
        for i in 0..n {
            store.update_context("s1", Message::user(i.to_string()));
        }
        let context = store.get_context("s1");
        prop_assert_eq!(context.len(), expected_len(n, policy));
        if let Some(last) = context.last() {
            prop_assert_eq!(&last.content, &(n - 1).to_string());
        }
    }

    /// Interaction history preserves insertion order and all fields.
    #[test]
    fn interaction_history_in_insertion_order(inputs in proptest::collection::vec("[a-z ]{1,16}", 0..30)) {
        let mut store = ContextStore::new("agent");
        for (i, text) in inputs.iter().enumerate() {
            let plan = if i % 2 == 0 {
                Plan::respond(text.clone())
            } else {
                Plan::use_tool("search", single_parameter("query", text.clone()))
            };
            store.store_interaction(
                "s1",
                Message::user(text.clone()),
                AgentResponse::new("agent", format!("reply to {text}")),
                plan,
            );
        }

        let history = store.get_interaction_history("s1");
        prop_assert_eq!(history.len(), inputs.len());
        for (i, (record, text)) in history.iter().zip(&inputs).enumerate() {
            prop_assert_eq!(&record.input.content, text);
            prop_assert_eq!(&record.output.content, &format!("reply to {text}"));
            prop_assert_eq!(record.plan.is_tool_call(), i % 2 == 1);
        }
    }
}

#[test]
fn fifty_one_messages_leave_exactly_the_last_twenty() {
    let mut store = ContextStore::new("agent");
    for i in 0..51 {
        store.update_context("s1", Message::user(format!("m{i}")));
    }

    let contents: Vec<&str> = store
        .get_context("s1")
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    let expected: Vec<String> = (31..51).map(|i| format!("m{i}")).collect();
    assert_eq!(contents, expected);
}
