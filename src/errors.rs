// ABOUTME: Centralized error handling and error types for the MCP bridge
// ABOUTME: Defines the standard error code set and HTTP response formatting
// shared by every component in §7 of the spec
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! # Unified Error Handling System
//!
//! One `AppError`/`ErrorCode` pair is used across the whole bridge so that
//! every component (permission resolver, rate limiter, MCP client, LM
//! adapter, agentic loop) reports failures the same way, and so the thin
//! HTTP binary can turn any of them into a consistent response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The request exceeded the caller's sliding-window rate limit.
    RateLimited,
    /// The LM requested a tool the user is not permitted to invoke.
    PermissionDenied,
    /// A network or auth failure talking to an MCP.
    McpTransportError,
    /// An MCP returned a tool-level failure payload.
    ToolExecutionError,
    /// The LM invocation failed after retries.
    LmError,
    /// The request deadline was exceeded.
    Timeout,
    /// The agentic loop hit its iteration ceiling.
    MaxIterationsReached,
    /// Input validation failed.
    InvalidInput,
    /// Requested resource (user, MCP, tool, conversation) was not found.
    NotFound,
    /// Configuration is missing or invalid.
    ConfigError,
    /// Unexpected internal error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error, used by the thin demonstration binary.
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::McpTransportError => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::ToolExecutionError | Self::LmError => StatusCode::BAD_GATEWAY,
            Self::MaxIterationsReached => StatusCode::OK,
            Self::ConfigError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-stable tag, used as the audit record's `warning`/error tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::PermissionDenied => "permission_denied",
            Self::McpTransportError => "mcp_transport_error",
            Self::ToolExecutionError => "tool_execution_error",
            Self::LmError => "lm_error",
            Self::Timeout => "timeout",
            Self::MaxIterationsReached => "max_iterations_reached",
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
        }
    }

    #[must_use]
    const fn description(self) -> &'static str {
        match self {
            Self::RateLimited => "Rate limit exceeded. Please slow down your requests",
            Self::PermissionDenied => "You do not have permission to use this tool",
            Self::McpTransportError => "An MCP server is temporarily unreachable",
            Self::ToolExecutionError => "A tool invocation failed",
            Self::LmError => "The language model could not complete the request",
            Self::Timeout => "The request deadline was exceeded",
            Self::MaxIterationsReached => "The iteration limit was reached",
            Self::InvalidInput => "The provided input is invalid",
            Self::NotFound => "The requested resource was not found",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "rate_limited" => Ok(Self::RateLimited),
            "permission_denied" => Ok(Self::PermissionDenied),
            "mcp_transport_error" => Ok(Self::McpTransportError),
            "tool_execution_error" => Ok(Self::ToolExecutionError),
            "lm_error" => Ok(Self::LmError),
            "timeout" => Ok(Self::Timeout),
            "max_iterations_reached" => Ok(Self::MaxIterationsReached),
            "invalid_input" => Ok(Self::InvalidInput),
            "not_found" => Ok(Self::NotFound),
            "config_error" => Ok(Self::ConfigError),
            "internal_error" => Ok(Self::InternalError),
            _ => Err(serde::de::Error::unknown_variant(&s, &[])),
        }
    }
}

/// The bridge's unified error type.
#[derive(Debug, Clone, Error)]
pub struct AppError {
    /// Error code identifying the failure category.
    pub code: ErrorCode,
    /// Human-readable message (may contain details unsafe to expose to clients).
    pub message: String,
}

impl AppError {
    /// Construct a new `AppError`.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Message safe for client exposure; internal errors are replaced with a
    /// generic description so storage/network details never leak.
    #[must_use]
    pub fn sanitized_message(&self) -> String {
        match self.code {
            ErrorCode::InvalidInput
            | ErrorCode::NotFound
            | ErrorCode::RateLimited
            | ErrorCode::PermissionDenied
            | ErrorCode::Timeout
            | ErrorCode::MaxIterationsReached => self.message.clone(),
            _ => self.code.description().to_owned(),
        }
    }

    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimited, message)
    }

    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    #[must_use]
    pub fn mcp_transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::McpTransportError, message)
    }

    #[must_use]
    pub fn tool_execution(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ToolExecutionError, message)
    }

    #[must_use]
    pub fn lm(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LmError, message)
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.tag(), self.message)
    }
}

/// Result alias used throughout the bridge.
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response body for the demonstration binary.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: ErrorCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.code.tag(), message = %self.message, "request failed");
        let status = self.code.http_status();
        let body = ErrorResponse {
            code: self.code,
            message: self.sanitized_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_input(format!("JSON error: {error}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::mcp_transport(error.to_string())
        }
    }
}
