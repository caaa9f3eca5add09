// ABOUTME: HTTP implementation of McpTransport
// the only wire transport the bridge ships; streaming/stdio backends would
// implement the same trait (see SPEC_FULL.md §4.1) but are out of scope

use crate::errors::{AppError, AppResult};
use crate::mcp::McpTransport;
use crate::models::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Talks to one MCP over HTTP: `POST {base_url}/list-tools` and
/// `POST {base_url}/call-tool`, matching the wire shape the MCP SDK itself
/// defines (the SDK's exact envelope format is out of scope here; this
/// transport assumes a JSON body/response pair per call).
pub struct HttpMcpTransport {
    mcp_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpMcpTransport {
    /// # Panics
    ///
    /// Panics if `timeout` cannot be used to build a `reqwest::Client`,
    /// which only happens if the TLS backend fails to initialize.
    #[must_use]
    pub fn new(mcp_id: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            mcp_id: mcp_id.into(),
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl McpTransport for HttpMcpTransport {
    async fn list_tools(&self) -> AppResult<Vec<ToolSchema>> {
        let url = format!("{}/list-tools", self.base_url);
        let response = self.client.post(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::mcp_transport(format!(
                "{} returned {} from list-tools",
                self.mcp_id,
                response.status()
            )));
        }
        let raw: Vec<RawToolSchema> = response.json().await?;
        Ok(raw
            .into_iter()
            .map(|t| ToolSchema {
                mcp_id: self.mcp_id.clone(),
                name: t.name,
                description: t.description,
                input_schema: t.input_schema,
            })
            .collect())
    }

    async fn call_tool(&self, tool_name: &str, arguments: Value) -> AppResult<Value> {
        let url = format!("{}/call-tool", self.base_url);
        let body = serde_json::json!({ "name": tool_name, "arguments": arguments });
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(AppError::tool_execution(format!(
                "{} tool {} returned {}",
                self.mcp_id,
                tool_name,
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn ping(&self) -> AppResult<()> {
        let url = format!("{}/list-tools", self.base_url);
        let response = self.client.head(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::mcp_transport(format!(
                "{} ping returned {}",
                self.mcp_id,
                response.status()
            )))
        }
    }
}

#[derive(serde::Deserialize)]
struct RawToolSchema {
    name: String,
    description: String,
    input_schema: Value,
}
