//! The tool gateway: catalog listing and per-call dispatch.
//!
//! [`AladhanTools::call_tool`] never fails. Every outcome, including unknown tools, invalid
//! arguments and upstream failures, becomes a single text block in the returned
//! `CallToolResult`.

use crate::args::{self, ToolArgs};
use crate::catalog::{self, AladhanTool};
use crate::client::AladhanClient;
use crate::config::UpstreamConfig;
use crate::error::Result;
use crate::format;
use crate::request::UpstreamRequest;
use chrono::{Local, NaiveDate};
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct AladhanTools {
    client: AladhanClient,
    tools: Arc<Vec<Tool>>,
}

enum Reply {
    Text(String),
    Error(String),
}

impl AladhanTools {
    /// Build the gateway with its own upstream client.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream configuration is invalid.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self::with_client(AladhanClient::new(config)?))
    }

    #[must_use]
    pub fn with_client(client: AladhanClient) -> Self {
        Self {
            client,
            tools: Arc::new(catalog::list_tools()),
        }
    }

    /// The fixed catalog, in advertised order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.as_ref().clone()
    }

    /// Execute one tool call. Dates default to the local calendar day.
    pub async fn call_tool(&self, name: &str, arguments: Option<&Value>) -> CallToolResult {
        self.call_tool_on(name, arguments, Local::now().date_naive())
            .await
    }

    /// Like [`call_tool`](Self::call_tool), with an explicit "today".
    pub async fn call_tool_on(
        &self,
        name: &str,
        arguments: Option<&Value>,
        today: NaiveDate,
    ) -> CallToolResult {
        let Some(tool) = AladhanTool::from_name(name) else {
            info!(tool = %name, "unknown tool requested");
            return error_result(format!("Unknown tool: {name}"));
        };

        let started = Instant::now();
        let reply = match self.execute(tool, arguments, today).await {
            Ok(reply) => reply,
            Err(e) => Reply::Error(format!("Error executing {name}: {e}")),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match reply {
            Reply::Text(text) => {
                info!(tool = %name, elapsed_ms, "tool call completed");
                CallToolResult::success(vec![Content::text(text)])
            }
            Reply::Error(text) => {
                info!(tool = %name, elapsed_ms, error = %text, "tool call failed");
                error_result(text)
            }
        }
    }

    async fn execute(
        &self,
        tool: AladhanTool,
        arguments: Option<&Value>,
        today: NaiveDate,
    ) -> Result<Reply> {
        let args = args::parse(tool, arguments, today)?;
        let request = UpstreamRequest::for_args(&args);

        let body = match self.client.get(&request).await {
            Ok(body) => body,
            Err(failure) => return Ok(Reply::Error(format!("Error: {}", failure.error))),
        };
        if let Some(error) = format::upstream_error(&body) {
            return Ok(Reply::Error(format!("Error: {error}")));
        }

        let text = match &args {
            ToolArgs::PrayerTimesByCity { city, country, .. } => {
                format::prayer_times(&format::city_location(city, country), &body)?
            }
            ToolArgs::PrayerTimesByCoordinates { coordinates, .. } => {
                format::prayer_times(&format::coordinate_location(coordinates), &body)?
            }
            ToolArgs::GregorianToHijri { .. } => format::hijri_conversion(&body)?,
            ToolArgs::QiblaDirection { coordinates } => {
                format::qibla_direction(coordinates, &body)?
            }
            ToolArgs::CalculationMethods => format::calculation_methods(&body)?,
        };
        Ok(Reply::Text(text))
    }
}

fn error_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: None,
        is_error: Some(true),
        meta: None,
    }
}
