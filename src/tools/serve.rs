//
//  redmine-cli
//  tools/serve.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Stdio Tool Server
//!
//! Serves the tool catalog over line-delimited JSON, one request per line on
//! the input and one response per line on the output.
//!
//! ## Request
//!
//! ```json
//! {"id": 1, "tool": "get_issue", "arguments": {"issue_id": 42}}
//! ```
//!
//! ## Responses
//!
//! ```json
//! {"id": 1, "result": {"issue": {"id": 42}}}
//! {"id": 2, "error": "Resource not found.", "status_code": 404}
//! ```
//!
//! ## Notes
//!
//! - Requests run concurrently on the shared client; responses are written in
//!   completion order, so callers match them up by `id`
//! - A line that is not a valid request is answered with `"id": null`
//! - End of input stops the server once in-flight requests have finished

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinSet;

use super::dispatch;
use crate::api::{ErrorDescriptor, RedmineClient};

/// One tool call read from the input.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Echoed back unchanged in the response.
    #[serde(default)]
    pub id: Value,

    pub tool: String,

    #[serde(default)]
    pub arguments: Value,
}

/// One line written to the output.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolResponse {
    Success {
        id: Value,
        result: Value,
    },
    Failure {
        id: Value,
        #[serde(flatten)]
        error: ErrorDescriptor,
    },
}

impl ToolResponse {
    pub fn id(&self) -> &Value {
        match self {
            Self::Success { id, .. } | Self::Failure { id, .. } => id,
        }
    }
}

/// Parses one input line and runs the requested tool.
pub async fn handle_line(client: &RedmineClient, line: &str) -> ToolResponse {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Rejected request line: {}", e);
            return ToolResponse::Failure {
                id: Value::Null,
                error: ErrorDescriptor {
                    error: format!("Invalid request: {e}"),
                    status_code: None,
                },
            };
        }
    };

    match dispatch(client, &request.tool, request.arguments).await {
        Ok(result) => ToolResponse::Success {
            id: request.id,
            result,
        },
        Err(e) => {
            if e.is_local() {
                tracing::debug!("{} rejected before sending: {}", request.tool, e);
            } else {
                tracing::debug!("{} failed: {}", request.tool, e);
            }
            ToolResponse::Failure {
                id: request.id,
                error: ErrorDescriptor::from(&e),
            }
        }
    }
}

/// Serves requests from `reader` until end of input.
///
/// # Errors
///
/// Returns an error only when reading the input or writing the output fails.
/// Tool failures are reported to the caller as error responses.
pub async fn run<R, W>(client: Arc<RedmineClient>, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut tasks: JoinSet<ToolResponse> = JoinSet::new();
    let mut reading = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if reading => {
                match line.context("Failed to read request")? {
                    Some(line) if !line.trim().is_empty() => {
                        let client = Arc::clone(&client);
                        tasks.spawn(async move { handle_line(&client, &line).await });
                    }
                    Some(_) => {}
                    None => {
                        tracing::debug!("Input closed, {} requests in flight", tasks.len());
                        reading = false;
                    }
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                let response = joined.unwrap_or_else(|e| ToolResponse::Failure {
                    id: Value::Null,
                    error: ErrorDescriptor {
                        error: format!("Unexpected error: {e}"),
                        status_code: None,
                    },
                });
                write_response(&mut writer, &response).await?;
            }
            else => break,
        }
    }

    Ok(())
}

/// Serves requests from stdin, writing responses to stdout.
pub async fn serve_stdio(client: Arc<RedmineClient>) -> Result<()> {
    tracing::info!("Serving Redmine tools on stdio for {}", client.base_url());
    run(
        client,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &ToolResponse) -> Result<()> {
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer
        .write_all(&line)
        .await
        .context("Failed to write response")?;
    writer.flush().await.context("Failed to flush response")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use serde_json::json;

    fn parse_output(out: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn by_id<'a>(responses: &'a [Value], id: &Value) -> &'a Value {
        responses.iter().find(|r| &r["id"] == id).unwrap()
    }

    #[test]
    fn test_response_shapes() {
        let ok = ToolResponse::Success {
            id: json!(1),
            result: json!({"a": 1}),
        };
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"id": 1, "result": {"a": 1}}));

        let failed = ToolResponse::Failure {
            id: json!("x"),
            error: ErrorDescriptor {
                error: "Resource not found.".into(),
                status_code: Some(404),
            },
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"id": "x", "error": "Resource not found.", "status_code": 404})
        );
        assert_eq!(failed.id(), &json!("x"));
    }

    #[tokio::test]
    async fn test_serves_every_line() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/trackers.json")
            .with_status(200)
            .with_body(r#"{"trackers":[{"id":1,"name":"Bug"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/issues/404.json")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = Arc::new(client_for(&server));
        let input = concat!(
            r#"{"id": 1, "tool": "list_trackers"}"#,
            "\n",
            "\n",
            r#"{"id": 2, "tool": "nope", "arguments": {}}"#,
            "\n",
            "this is not json\n",
            r#"{"id": "x", "tool": "get_issue", "arguments": {"issue_id": 404}}"#,
            "\n",
            r#"{"id": 3, "tool": "update_issue", "arguments": {"issue_id": 1}}"#,
            "\n",
        );

        let mut out = Vec::new();
        run(client, input.as_bytes(), &mut out).await.unwrap();

        let responses = parse_output(&out);
        assert_eq!(responses.len(), 5);

        let trackers = by_id(&responses, &json!(1));
        assert_eq!(trackers["result"]["trackers"][0]["name"], "Bug");

        let unknown = by_id(&responses, &json!(2));
        assert_eq!(unknown["error"], "Unknown tool: nope");
        assert!(unknown["status_code"].is_null());

        let invalid = by_id(&responses, &Value::Null);
        assert!(invalid["error"].as_str().unwrap().starts_with("Invalid request"));

        let missing = by_id(&responses, &json!("x"));
        assert_eq!(missing["error"], "Resource not found.");
        assert_eq!(missing["status_code"], 404);

        let empty_update = by_id(&responses, &json!(3));
        assert_eq!(
            empty_update["error"],
            "At least one field must be specified for update"
        );
    }

    #[tokio::test]
    async fn test_exact_output_line() {
        let server = mockito::Server::new_async().await;
        let client = Arc::new(client_for(&server));

        let reader = tokio_test::io::Builder::new()
            .read(b"{\"id\": 7, \"tool\": \"nope\"}\n")
            .build();
        let writer = tokio_test::io::Builder::new()
            .write(b"{\"id\":7,\"error\":\"Unknown tool: nope\",\"status_code\":null}\n")
            .build();

        run(client, BufReader::new(reader), writer).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_input() {
        let server = mockito::Server::new_async().await;
        let client = Arc::new(client_for(&server));

        let mut out = Vec::new();
        run(client, &b""[..], &mut out).await.unwrap();
        assert!(out.is_empty());
    }
}
