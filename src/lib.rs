// ABOUTME: Main library entry point for the MCP orchestration bridge
// ABOUTME: Wires together permissioning, rate limiting, MCP routing, the LM
// adapter, and the agentic loop behind one request/response surface
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # MCP Orchestration Bridge
//!
//! A multi-tenant bridge between chat users and a fleet of external
//! tool-providing services ("MCPs"). A request carries a user id and a
//! natural-language message; the bridge resolves which tools that user may
//! invoke, drives an upstream LM through zero or more tool calls, and
//! returns a synthesized answer.
//!
//! ## Architecture
//!
//! - [`mcp`]: discovers tools from each configured MCP, caches their
//!   schemas, tracks health, and performs invocations.
//! - [`permissions`]: computes the per-user Allowed-Tools View.
//! - [`rate_limiting`]: sliding-window admission control per role.
//! - [`llm`]: the upstream language-model adapter (system block assembly,
//!   invocation, token/cost accounting).
//! - [`agentic_loop`]: drives one request through LM iterations and tool
//!   dispatch until a final answer or a terminal condition is reached.
//! - [`audit`]: durably records the outcome of every request.
//! - [`thread_store`]: short-lived conversational context, not state of record.
//! - [`bridge`]: the top-level orchestrator tying the above together.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcp_bridge_server::config::BridgeConfig;
//! use mcp_bridge_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = BridgeConfig::from_env()?;
//!     println!("bridge configured: max_iterations={}", config.agentic_loop.max_iterations);
//!     Ok(())
//! }
//! ```

/// Top-level orchestrator wiring every component behind `handle_request`.
pub mod bridge;

/// Application constants.
pub mod constants;

/// Environment-driven configuration for every component.
pub mod config;

/// Centralized error handling.
pub mod errors;

/// Production logging setup.
pub mod logging;

/// The agentic loop: iteration bounding, tool dispatch, prompt caching hooks.
pub mod agentic_loop;

/// Durable per-request outcome recording.
pub mod audit;

/// The upstream LM adapter.
pub mod llm;

/// MCP registry, health tracking, schema caching, and tool invocation.
pub mod mcp;

/// Domain data model: users, roles, MCP descriptors, tools, threads, audit records.
pub mod models;

/// Per-user permission resolution and the Allowed-Tools View.
pub mod permissions;

/// Inbound request / outbound response shapes.
pub mod request;

/// Sliding-window rate limiting per role.
pub mod rate_limiting;

/// In-process conversational context with TTL eviction.
pub mod thread_store;

/// Fixture builders shared by unit and integration tests.
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
