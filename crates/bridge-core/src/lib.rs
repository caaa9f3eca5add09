// ABOUTME: Foundation crate for the MCP orchestration bridge
// ABOUTME: Shared glob matching and permission-decision primitives, kept
// dependency-free so both the permission resolver and the MCP registry can
// build on them without pulling the whole server crate.
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![deny(unsafe_code)]

//! Foundation types for the MCP orchestration bridge.
//!
//! This crate intentionally stays small: it holds only the primitives that
//! need to be shared between the permission resolver and other crates
//! without creating a dependency on the full server crate.

/// Glob-style tool-name matching (`*` wildcard only).
pub mod glob;

/// Permission decision types shared between the resolver and its callers.
pub mod permission;

pub use glob::glob_match;
pub use permission::{DenyReason, PermissionDecision};
