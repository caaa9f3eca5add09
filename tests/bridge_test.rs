// ABOUTME: End-to-end coverage of Bridge::handle_request across every audit outcome
// run with `cargo test --features testing`

mod common;

use common::fake_transport;
use mcp_bridge_server::audit::InMemoryAuditSink;
use mcp_bridge_server::bridge::Bridge;
use mcp_bridge_server::config::{
    AgenticLoopConfig, BridgeConfig, McpRegistryConfig, PermissionsConfig, RateLimiterConfig, ThreadStoreConfig,
};
use mcp_bridge_server::llm::{ChatCompletion, ChatResponse, ScriptedLmProvider, TokenUsage};
use mcp_bridge_server::logging::LoggingConfig;
use mcp_bridge_server::mcp::McpRegistry;
use mcp_bridge_server::models::AuditOutcome;
use mcp_bridge_server::request::BridgeRequest;
use mcp_bridge_server::test_utils::{test_admin_role, test_member_role, test_mcp, test_user};
use std::sync::Arc;
use std::time::Duration;

fn config(rate_limit_window_secs: u64, max_iterations: u32) -> BridgeConfig {
    BridgeConfig {
        logging: LoggingConfig {
            filter: "info".to_owned(),
            format: mcp_bridge_server::logging::LogFormat::Pretty,
        },
        agentic_loop: AgenticLoopConfig {
            max_iterations,
            thread_context_messages: 3,
            request_timeout: Duration::from_secs(5),
        },
        rate_limiter: RateLimiterConfig {
            window: Duration::from_secs(rate_limit_window_secs),
        },
        mcp_registry: McpRegistryConfig {
            schema_ttl: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(300),
        },
        permissions: PermissionsConfig {
            cache_ttl: Duration::from_secs(300),
        },
        thread_store: ThreadStoreConfig {
            ttl: Duration::from_secs(86_400),
            sweep_interval: Duration::from_secs(300),
        },
    }
}

fn registry_with_postgres(cfg: &McpRegistryConfig) -> Arc<McpRegistry> {
    let registry = McpRegistry::new(cfg.clone());
    registry.register(test_mcp("postgres", true), fake_transport("postgres", "get_health"));
    Arc::new(registry)
}

fn answer_provider(text: &str) -> Arc<ScriptedLmProvider> {
    Arc::new(ScriptedLmProvider::new(vec![ChatResponse {
        completion: ChatCompletion::Answer(text.to_owned()),
        usage: TokenUsage {
            input_tokens: 50,
            output_tokens: 10,
            cached_tokens: 0,
        },
    }]))
}

#[tokio::test]
async fn completes_and_records_one_audit_record() {
    let cfg = config(3_600, 10);
    let registry = registry_with_postgres(&cfg.mcp_registry);
    let sink = Arc::new(InMemoryAuditSink::new());
    let bridge = Bridge::new(cfg, registry, answer_provider("all healthy"), sink.clone(), 16);
    let user = test_user("u1", test_admin_role());

    let response = bridge
        .handle_request(
            &user,
            BridgeRequest {
                user_id: "u1".to_owned(),
                conversation_id: Some("c1".to_owned()),
                message: "how is the db?".to_owned(),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.answer, "all healthy");
    assert_eq!(response.outcome, AuditOutcome::Completed);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let records = sink.snapshot().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuditOutcome::Completed);
}

#[tokio::test]
async fn requests_without_a_conversation_id_skip_thread_history() {
    let cfg = config(3_600, 10);
    let registry = registry_with_postgres(&cfg.mcp_registry);
    let sink = Arc::new(InMemoryAuditSink::new());
    let bridge = Bridge::new(cfg, registry, answer_provider("all healthy"), sink.clone(), 16);
    let user = test_user("u1", test_admin_role());

    let response = bridge
        .handle_request(
            &user,
            BridgeRequest {
                user_id: "u1".to_owned(),
                conversation_id: None,
                message: "how is the db?".to_owned(),
            },
        )
        .await
        .unwrap();

    assert_eq!(response.answer, "all healthy");

    tokio::time::sleep(Duration::from_millis(20)).await;
    let records = sink.snapshot().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].conversation_id, None);
}

#[tokio::test]
async fn rate_limited_requests_are_rejected_and_audited() {
    let cfg = config(3_600, 10);
    let registry = registry_with_postgres(&cfg.mcp_registry);
    let sink = Arc::new(InMemoryAuditSink::new());
    let mut role = test_member_role();
    role.rate_limit_per_window = Some(1);
    let user = test_user("u1", role);
    let bridge = Bridge::new(cfg, registry, answer_provider("ok"), sink.clone(), 16);

    let request = || BridgeRequest {
        user_id: "u1".to_owned(),
        conversation_id: Some("c1".to_owned()),
        message: "ping".to_owned(),
    };

    bridge.handle_request(&user, request()).await.unwrap();
    let second = bridge.handle_request(&user, request()).await;
    assert!(second.is_err());

    tokio::time::sleep(Duration::from_millis(20)).await;
    let records = sink.snapshot().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].outcome, AuditOutcome::RateLimited);
}

#[tokio::test]
async fn users_with_no_allowed_tools_are_denied() {
    let cfg = config(3_600, 10);
    let registry = registry_with_postgres(&cfg.mcp_registry);
    let sink = Arc::new(InMemoryAuditSink::new());
    // A role with no MCP access at all resolves to an empty Allowed-Tools View.
    let role = mcp_bridge_server::models::Role {
        name: "guest".to_owned(),
        mcp_access: std::collections::HashMap::new(),
        rate_limit_per_window: Some(10),
    };
    let user = test_user("u1", role);
    let bridge = Bridge::new(cfg, registry, answer_provider("ok"), sink.clone(), 16);

    let result = bridge
        .handle_request(
            &user,
            BridgeRequest {
                user_id: "u1".to_owned(),
                conversation_id: Some("c1".to_owned()),
                message: "anything?".to_owned(),
            },
        )
        .await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(20)).await;
    let records = sink.snapshot().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuditOutcome::PermissionDenied);
}
