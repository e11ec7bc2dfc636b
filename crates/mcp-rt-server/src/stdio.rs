//! The stdio transport (§4.3): one line in, one line out, single
//! cooperative loop — no concurrency, so ordering comes for free.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use mcp_rt_json_rpc::dispatch::{parse_json_rpc_message, IncomingMessage};
use mcp_rt_json_rpc::r#async::JsonRpcDispatcher;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};

/// Drives the dispatcher over a pair of line-oriented streams. Production
/// use wires this to real stdin/stdout; tests wire it to in-memory buffers.
pub struct StdioTransport {
    dispatcher: Arc<JsonRpcDispatcher<McpError>>,
    logger: Arc<dyn Logger>,
}

impl StdioTransport {
    pub fn new(dispatcher: Arc<JsonRpcDispatcher<McpError>>) -> Self {
        Self::with_logger(dispatcher, Arc::new(NoopLogger))
    }

    pub fn with_logger(dispatcher: Arc<JsonRpcDispatcher<McpError>>, logger: Arc<dyn Logger>) -> Self {
        Self { dispatcher, logger }
    }

    /// Read one line per message until EOF; empty lines are skipped.
    /// Requests are dispatched to completion and answered with exactly
    /// one line; notifications never produce a line.
    pub async fn run<R, W>(&self, input: R, output: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(input).lines();
        let mut writer = BufWriter::new(output);

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match parse_json_rpc_message(line) {
                Ok(IncomingMessage::Request(request)) => {
                    self.logger.debug(
                        "dispatching request",
                        LogFields::new().with_method(request.method.clone()),
                    );
                    let result = self.dispatcher.handle_request(request).await;
                    self.write_line(&mut writer, &result).await?;
                }
                Ok(IncomingMessage::Notification(notification)) => {
                    let method = notification.method.clone();
                    if let Err(err) = self.dispatcher.handle_notification(notification).await {
                        self.logger.warn(
                            &format!("notification handling failed: {err}"),
                            LogFields::new().with_method(method),
                        );
                    }
                }
                Err(rpc_error) => {
                    self.logger.warn("malformed JSON-RPC message", LogFields::new());
                    self.write_line(&mut writer, &rpc_error).await?;
                }
            }
        }

        Ok(())
    }

    async fn write_line<W, T>(&self, writer: &mut BufWriter<W>, value: &T) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
        T: serde::Serialize,
    {
        let body = serde_json::to_string(value)
            .unwrap_or_else(|_| "{\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32603,\"message\":\"internal error\"},\"id\":null}".to_string());
        writer.write_all(body.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mcp_rt_json_rpc::r#async::{JsonRpcHandler, SessionContext};
    use mcp_rt_json_rpc::request::RequestParams;
    use serde_json::Value;
    use std::io::Cursor;

    struct PingHandler;

    #[async_trait]
    impl JsonRpcHandler for PingHandler {
        type Error = McpError;

        async fn handle(
            &self,
            _method: &str,
            _params: Option<RequestParams>,
            _session_context: Option<SessionContext>,
        ) -> Result<Value, Self::Error> {
            Ok(serde_json::json!({}))
        }

        fn supported_methods(&self) -> Vec<String> {
            vec!["ping".to_string()]
        }
    }

    fn dispatcher() -> Arc<JsonRpcDispatcher<McpError>> {
        let mut dispatcher = JsonRpcDispatcher::new();
        dispatcher.register_method("ping".to_string(), PingHandler);
        Arc::new(dispatcher)
    }

    #[tokio::test]
    async fn request_line_produces_one_response_line() {
        let transport = StdioTransport::new(dispatcher());
        let input = Cursor::new(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".to_vec());
        let mut output = Vec::new();
        transport.run(input, &mut output).await.unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&output).unwrap().lines().collect();
        assert_eq!(lines.len(), 1);
        let value: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let transport = StdioTransport::new(dispatcher());
        let input = Cursor::new(b"\n\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n".to_vec());
        let mut output = Vec::new();
        transport.run(input, &mut output).await.unwrap();

        let lines: Vec<&str> = std::str::from_utf8(&output).unwrap().lines().collect();
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn notification_produces_no_output_line() {
        let transport = StdioTransport::new(dispatcher());
        let input = Cursor::new(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n".to_vec());
        let mut output = Vec::new();
        transport.run(input, &mut output).await.unwrap();

        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_yields_parse_error_line() {
        let transport = StdioTransport::new(dispatcher());
        let input = Cursor::new(b"not json\n".to_vec());
        let mut output = Vec::new();
        transport.run(input, &mut output).await.unwrap();

        let value: Value = serde_json::from_slice(&output[..output.len() - 1]).unwrap();
        assert_eq!(value["error"]["code"], -32700);
    }
}
