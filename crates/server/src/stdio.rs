//! MCP over stdio: newline-delimited JSON-RPC 2.0.
//!
//! Requests are handled one at a time in arrival order. Notifications (messages without an
//! `id`) never get a reply. Replies are built from `rmcp` model types.

use crate::error::Result;
use aladhan_mcp_tools::AladhanTools;
use rmcp::model::{
    CallToolResult, ErrorCode, ErrorData, Implementation, InitializeResult, JsonRpcVersion2_0,
    ListToolsResult, ProtocolVersion, RequestId, ServerCapabilities, ServerJsonRpcMessage,
    ServerResult,
};
use serde::{Deserialize as _, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "aladhan-api";

/// Offered when the client's `initialize` names no protocol version.
pub const DEFAULT_PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::V_2024_11_05;

/// One line written to stdout.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outgoing {
    Message(ServerJsonRpcMessage),
    Unidentified(UnidentifiedError),
}

/// Error reply to a message whose id could not be read. `RequestId` has no `null` form.
#[derive(Debug, Serialize)]
struct UnidentifiedError {
    jsonrpc: JsonRpcVersion2_0,
    id: Option<RequestId>,
    error: ErrorData,
}

impl Outgoing {
    fn error(id: Option<&Value>, error: ErrorData) -> Self {
        match id.and_then(|v| RequestId::deserialize(v).ok()) {
            Some(id) => Self::Message(ServerJsonRpcMessage::error(error, id)),
            None => Self::Unidentified(UnidentifiedError {
                jsonrpc: JsonRpcVersion2_0,
                id: None,
                error,
            }),
        }
    }
}

/// Serve until `reader` reaches EOF.
///
/// # Errors
///
/// Returns an error if reading a line or writing a reply fails.
pub async fn serve<R, W>(tools: &AladhanTools, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(reply) = handle_line(tools, &line).await {
            write_json_line(&mut writer, &reply).await?;
        }
    }
    info!("stdin closed, shutting down");
    Ok(())
}

async fn handle_line(tools: &AladhanTools, line: &str) -> Option<Outgoing> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(line) {
        Ok(msg) => handle_message(tools, &msg).await,
        Err(e) => {
            warn!(error = %e, "failed to parse JSON-RPC message");
            Some(Outgoing::error(
                None,
                ErrorData::parse_error("parse error", None),
            ))
        }
    }
}

async fn handle_message(tools: &AladhanTools, msg: &Value) -> Option<Outgoing> {
    let Some(method) = msg.get("method").and_then(Value::as_str) else {
        // Responses to requests we never sent are dropped.
        if msg.get("result").is_some() || msg.get("error").is_some() {
            return None;
        }
        warn!("JSON-RPC message without a method");
        return Some(Outgoing::error(
            msg.get("id"),
            ErrorData::invalid_request("invalid request", None),
        ));
    };

    let Some(raw_id) = msg.get("id") else {
        debug!(method, "notification");
        return None;
    };
    let Ok(id) = RequestId::deserialize(raw_id) else {
        warn!(method, "request id is neither a number nor a string");
        return Some(Outgoing::error(
            None,
            ErrorData::invalid_request("invalid request id", None),
        ));
    };

    let outcome: std::result::Result<ServerResult, ErrorData> = match method {
        "initialize" => Ok(initialize_result(msg).into()),
        "ping" => Ok(ServerResult::empty(())),
        "tools/list" => Ok(ListToolsResult::with_all_items(tools.list_tools()).into()),
        "tools/call" => call_tool(tools, msg).await.map(ServerResult::from),
        other => {
            debug!(method = other, "method not found");
            Err(ErrorData::new(
                ErrorCode::METHOD_NOT_FOUND,
                "method not found",
                None,
            ))
        }
    };

    Some(Outgoing::Message(match outcome {
        Ok(result) => ServerJsonRpcMessage::response(result, id),
        Err(error) => ServerJsonRpcMessage::error(error, id),
    }))
}

fn initialize_result(msg: &Value) -> InitializeResult {
    let protocol_version = msg
        .get("params")
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| ProtocolVersion::deserialize(v).ok())
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    InitializeResult {
        protocol_version,
        capabilities: ServerCapabilities::builder().enable_tools().build(),
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Implementation::default()
        },
        instructions: None,
    }
}

async fn call_tool(
    tools: &AladhanTools,
    msg: &Value,
) -> std::result::Result<CallToolResult, ErrorData> {
    let params = msg.get("params");
    let Some(name) = params.and_then(|p| p.get("name")).and_then(Value::as_str) else {
        return Err(ErrorData::invalid_params(
            "invalid params: missing tool name",
            None,
        ));
    };
    let arguments = params.and_then(|p| p.get("arguments"));

    Ok(tools.call_tool(name, arguments).await)
}

async fn write_json_line<W>(writer: &mut W, reply: &Outgoing) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(reply)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
