// ABOUTME: End-to-end coverage of the agentic loop: tool dispatch, prompt assembly, iteration bounding
// run with `cargo test --features testing`

mod common;

use chrono::Utc;
use common::fake_transport;
use mcp_bridge_server::agentic_loop::{AgenticLoop, LoopOutcome};
use mcp_bridge_server::config::AgenticLoopConfig;
use mcp_bridge_server::llm::{ChatCompletion, ChatResponse, ScriptedLmProvider, TokenUsage};
use mcp_bridge_server::mcp::McpRegistry;
use mcp_bridge_server::models::ToolCall;
use mcp_bridge_server::permissions::AllowedToolsView;
use mcp_bridge_server::test_utils::{test_admin_role, test_mcp, test_user};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn loop_config(max_iterations: u32) -> AgenticLoopConfig {
    AgenticLoopConfig {
        max_iterations,
        thread_context_messages: 3,
        request_timeout: Duration::from_secs(5),
    }
}

async fn registry_with_postgres() -> Arc<McpRegistry> {
    let registry = McpRegistry::new(mcp_bridge_server::config::McpRegistryConfig {
        schema_ttl: Duration::from_secs(300),
        refresh_interval: Duration::from_secs(300),
    });
    registry.register(test_mcp("postgres", true), fake_transport("postgres", "get_health"));
    Arc::new(registry)
}

#[tokio::test]
async fn answers_directly_when_lm_needs_no_tools() {
    let registry = registry_with_postgres().await;
    let mcps = registry.snapshot().await;
    let user = test_user("u1", test_admin_role());
    let view = AllowedToolsView {
        tools: mcps.iter().flat_map(|(_, _, t)| t.iter().map(|s| s.qualified_name())).collect(),
        computed_at: Utc::now(),
    };

    let lm = Arc::new(ScriptedLmProvider::new(vec![ChatResponse {
        completion: ChatCompletion::Answer("all good".to_owned()),
        usage: TokenUsage {
            input_tokens: 100,
            output_tokens: 20,
            cached_tokens: 80,
        },
    }]));
    let agentic_loop = AgenticLoop::new(loop_config(10), lm);

    let result = agentic_loop
        .run(&registry, &user, &view, &mcps, &[], "how is the database?")
        .await
        .unwrap();

    match result.outcome {
        LoopOutcome::Answered { answer } => assert_eq!(answer, "all good"),
        LoopOutcome::MaxIterationsReached { .. } => panic!("expected a direct answer"),
    }
    assert_eq!(result.iterations, 1);
    assert!((result.usage.estimated_cost_usd() - TokenUsage {
        input_tokens: 100,
        output_tokens: 20,
        cached_tokens: 80,
    }.estimated_cost_usd()).abs() < f64::EPSILON);
}

#[tokio::test]
async fn dispatches_tool_call_then_answers() {
    let registry = registry_with_postgres().await;
    let mcps = registry.snapshot().await;
    let user = test_user("u1", test_admin_role());
    let view = AllowedToolsView {
        tools: HashSet::from(["postgres.get_health".to_owned()]),
        computed_at: Utc::now(),
    };

    let lm = Arc::new(ScriptedLmProvider::new(vec![
        ChatResponse {
            completion: ChatCompletion::ToolCalls(vec![ToolCall {
                id: "call-1".to_owned(),
                qualified_name: "postgres.get_health".to_owned(),
                arguments: serde_json::json!({}),
            }]),
            usage: TokenUsage::default(),
        },
        ChatResponse {
            completion: ChatCompletion::Answer("database is healthy".to_owned()),
            usage: TokenUsage::default(),
        },
    ]));
    let agentic_loop = AgenticLoop::new(loop_config(10), lm);

    let result = agentic_loop
        .run(&registry, &user, &view, &mcps, &[], "how is the database?")
        .await
        .unwrap();

    match result.outcome {
        LoopOutcome::Answered { answer } => assert_eq!(answer, "database is healthy"),
        LoopOutcome::MaxIterationsReached { .. } => panic!("expected a final answer after dispatch"),
    }
    assert_eq!(result.iterations, 2);
    assert_eq!(result.tool_calls.len(), 1);
}

#[tokio::test]
async fn denied_tool_call_is_excluded_from_the_recorded_tool_calls() {
    let registry = registry_with_postgres().await;
    let mcps = registry.snapshot().await;
    let user = test_user("u1", test_admin_role());
    // Only postgres.get_health is in the view; the LM will also ask for a
    // tool that was never offered, which must be denied by dispatch's
    // re-validation rather than trusted from the stale view.
    let view = AllowedToolsView {
        tools: HashSet::from(["postgres.get_health".to_owned()]),
        computed_at: Utc::now(),
    };

    let lm = Arc::new(ScriptedLmProvider::new(vec![
        ChatResponse {
            completion: ChatCompletion::ToolCalls(vec![
                ToolCall {
                    id: "call-1".to_owned(),
                    qualified_name: "postgres.get_health".to_owned(),
                    arguments: serde_json::json!({}),
                },
                ToolCall {
                    id: "call-2".to_owned(),
                    qualified_name: "postgres.drop_table".to_owned(),
                    arguments: serde_json::json!({}),
                },
            ]),
            usage: TokenUsage::default(),
        },
        ChatResponse {
            completion: ChatCompletion::Answer("database is healthy".to_owned()),
            usage: TokenUsage::default(),
        },
    ]));
    let agentic_loop = AgenticLoop::new(loop_config(10), lm);

    let result = agentic_loop
        .run(&registry, &user, &view, &mcps, &[], "how is the database?")
        .await
        .unwrap();

    assert_eq!(result.tool_calls.len(), 1, "the denied tool call must not be recorded");
    assert_eq!(result.tool_calls[0].id, "call-1");
}

#[tokio::test]
async fn stops_at_max_iterations_with_best_effort_answer() {
    let registry = registry_with_postgres().await;
    let mcps = registry.snapshot().await;
    let user = test_user("u1", test_admin_role());
    let view = AllowedToolsView {
        tools: HashSet::from(["postgres.get_health".to_owned()]),
        computed_at: Utc::now(),
    };

    let call = || ChatResponse {
        completion: ChatCompletion::ToolCalls(vec![ToolCall {
            id: "call-1".to_owned(),
            qualified_name: "postgres.get_health".to_owned(),
            arguments: serde_json::json!({}),
        }]),
        usage: TokenUsage::default(),
    };
    let lm = Arc::new(ScriptedLmProvider::new(vec![call(), call(), call()]));
    let agentic_loop = AgenticLoop::new(loop_config(2), lm);

    let result = agentic_loop
        .run(&registry, &user, &view, &mcps, &[], "keep checking")
        .await
        .unwrap();

    match result.outcome {
        LoopOutcome::MaxIterationsReached { best_effort_answer } => {
            assert!(best_effort_answer.contains("iteration limit"));
        }
        LoopOutcome::Answered { .. } => panic!("expected the iteration ceiling to trigger"),
    }
    assert_eq!(result.iterations, 2);
}
