//! Newline-delimited JSON-RPC over stdio.
//!
//! stdout carries only protocol messages; logs go to stderr.

use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::orchestrator::Orchestrator;
use crate::tools;

pub const PROTOCOL_VERSION: &str = "2025-06-18";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;

/// Serve until stdin closes. Only stdio failures end the loop with an error.
pub async fn serve_stdio(orch: &Orchestrator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!(protocol = PROTOCOL_VERSION, "serving MCP on stdio");

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(request) => handle_message(orch, &request).await,
            Err(e) => {
                warn!(error = %e, "discarding unparseable message");
                Some(rpc_error(Value::Null, PARSE_ERROR, "parse error"))
            }
        };

        if let Some(response) = response {
            let mut serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            serialized.push('\n');
            stdout
                .write_all(serialized.as_bytes())
                .await
                .context("failed to write response")?;
            stdout.flush().await.context("failed to flush response")?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Answer one message. Notifications (no `id`) get no response.
pub async fn handle_message(orch: &Orchestrator, request: &Value) -> Option<Value> {
    let method = request.get("method").and_then(Value::as_str);
    let Some(id) = request.get("id").cloned() else {
        debug!(method = ?method, "notification");
        return None;
    };

    let result = match method {
        Some("initialize") => json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
        Some("ping") => json!({}),
        Some("tools/list") => json!({
            "tools": crate::mcp::tool_definitions()
        }),
        Some("tools/call") => handle_tool_call(orch, request).await,
        Some(other) => {
            return Some(rpc_error(
                id,
                METHOD_NOT_FOUND,
                &format!("method not found: {other}"),
            ));
        }
        None => return Some(rpc_error(id, INVALID_REQUEST, "missing method")),
    };

    Some(json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    }))
}

async fn handle_tool_call(orch: &Orchestrator, request: &Value) -> Value {
    let Some(params) = request.get("params").and_then(Value::as_object) else {
        return tools::error_result("invalid_input", "params must be an object", None);
    };
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return tools::error_result("invalid_input", "params.name must be a string", None);
    };
    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    info!(tool = name, "tool call");
    let started = Instant::now();
    let result = tools::dispatch(orch, name, &args).await;

    let is_error = result
        .get("isError")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    info!(
        tool = name,
        is_error,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tool call finished"
    );
    result
}

fn rpc_error(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message}
    })
}
