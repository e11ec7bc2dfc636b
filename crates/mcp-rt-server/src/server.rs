//! [`McpServer`]: the assembled set of registries plus whichever transport
//! is asked to run them. One server, two ways to serve it (§4.2-§4.4).

use std::net::SocketAddr;
use std::sync::Arc;

use mcp_rt_http::{HttpMcpServer, HttpMcpServerBuilder};
use mcp_rt_json_rpc::r#async::JsonRpcDispatcher;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::initialize::Implementation;
use mcp_rt_protocol::observability::{Clock, Logger};
use mcp_rt_session::InMemorySessionStorage;

use crate::initialize::InitializeHandler;
use crate::prompt::{PromptRegistry, PromptsHandler};
use crate::resource::{ResourceRegistry, ResourcesHandler};
use crate::stdio::StdioTransport;
use crate::tool::{ToolRegistry, ToolsHandler};

/// Transport-level knobs named in §10.3, layered on top of
/// [`mcp_rt_http::ServerConfig`]'s equivalents.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub path: String,
    pub allowed_origins: Vec<String>,
    pub session_required: bool,
    pub enable_cors: bool,
    pub enable_sse: bool,
    pub max_body_size: usize,
    pub session_expiry_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".parse().unwrap(),
            path: "/".to_string(),
            allowed_origins: Vec::new(),
            session_required: true,
            enable_cors: true,
            enable_sse: true,
            max_body_size: 1024 * 1024,
            session_expiry_minutes: 30,
        }
    }
}

/// The assembled server: capability registries, session storage, and the
/// collaborators (§10.1) every handler is built with.
pub struct McpServer {
    server_info: Implementation,
    instructions: Option<String>,
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
    prompts: Arc<PromptRegistry>,
    sessions: Arc<InMemorySessionStorage>,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
    config: ServerConfig,
}

impl McpServer {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        server_info: Implementation,
        instructions: Option<String>,
        tools: Arc<ToolRegistry>,
        resources: Arc<ResourceRegistry>,
        prompts: Arc<PromptRegistry>,
        sessions: Arc<InMemorySessionStorage>,
        logger: Arc<dyn Logger>,
        clock: Arc<dyn Clock>,
        config: ServerConfig,
    ) -> Self {
        Self {
            server_info,
            instructions,
            tools,
            resources,
            prompts,
            sessions,
            logger,
            clock,
            config,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    fn dispatcher(&self) -> JsonRpcDispatcher<McpError> {
        let mut dispatcher = JsonRpcDispatcher::new();
        dispatcher.register_methods(
            vec!["tools/list".to_string(), "tools/call".to_string()],
            ToolsHandler::with_logger(Arc::clone(&self.tools), Arc::clone(&self.logger)),
        );
        dispatcher.register_methods(
            vec!["resources/list".to_string(), "resources/read".to_string()],
            ResourcesHandler::with_logger(Arc::clone(&self.resources), Arc::clone(&self.logger)),
        );
        dispatcher.register_methods(
            vec!["prompts/list".to_string(), "prompts/get".to_string()],
            PromptsHandler::with_logger(Arc::clone(&self.prompts), Arc::clone(&self.logger)),
        );
        dispatcher.register_methods(
            vec![
                "initialize".to_string(),
                "ping".to_string(),
                "notifications/initialized".to_string(),
            ],
            InitializeHandler::with_logger(
                self.server_info.clone(),
                self.instructions.clone(),
                Arc::clone(&self.tools),
                Arc::clone(&self.resources),
                Arc::clone(&self.prompts),
                Arc::clone(&self.sessions),
                Arc::clone(&self.logger),
            ),
        );
        dispatcher
    }

    /// Build the Streamable-HTTP transport around this server's registries
    /// and run it to completion (bind failure aside, this never returns).
    pub async fn run_http(&self) -> Result<(), mcp_rt_protocol::errors::TransportError> {
        self.build_http().run().await
    }

    /// Construct (but do not bind) the HTTP server, for callers that need
    /// to inspect it (tests, `stats()`) before running.
    pub fn build_http(&self) -> HttpMcpServer {
        let mut builder = HttpMcpServerBuilder::with_storage(Arc::clone(&self.sessions))
            .logger(Arc::clone(&self.logger))
            .clock(Arc::clone(&self.clock))
            .bind_address(self.config.bind_addr)
            .mcp_path(self.config.path.clone())
            .cors(self.config.enable_cors)
            .sse(self.config.enable_sse)
            .max_body_size(self.config.max_body_size)
            .allowed_origins(self.config.allowed_origins.clone())
            .require_session(self.config.session_required)
            .session_expiry_minutes(self.config.session_expiry_minutes);

        builder = builder.register_handler(
            vec!["tools/list".to_string(), "tools/call".to_string()],
            ToolsHandler::with_logger(Arc::clone(&self.tools), Arc::clone(&self.logger)),
        );
        builder = builder.register_handler(
            vec!["resources/list".to_string(), "resources/read".to_string()],
            ResourcesHandler::with_logger(Arc::clone(&self.resources), Arc::clone(&self.logger)),
        );
        builder = builder.register_handler(
            vec!["prompts/list".to_string(), "prompts/get".to_string()],
            PromptsHandler::with_logger(Arc::clone(&self.prompts), Arc::clone(&self.logger)),
        );
        builder = builder.register_handler(
            vec![
                "initialize".to_string(),
                "ping".to_string(),
                "notifications/initialized".to_string(),
            ],
            InitializeHandler::with_logger(
                self.server_info.clone(),
                self.instructions.clone(),
                Arc::clone(&self.tools),
                Arc::clone(&self.resources),
                Arc::clone(&self.prompts),
                Arc::clone(&self.sessions),
                Arc::clone(&self.logger),
            ),
        );

        builder.build()
    }

    /// Run the stdio transport over the given streams (§4.3). Production
    /// callers pass `tokio::io::stdin()`/`tokio::io::stdout()`; tests pass
    /// in-memory buffers.
    pub async fn run_stdio<R, W>(&self, input: R, output: W) -> std::io::Result<()>
    where
        R: tokio::io::AsyncRead + Unpin,
        W: tokio::io::AsyncWrite + Unpin,
    {
        let dispatcher = Arc::new(self.dispatcher());
        let transport = StdioTransport::with_logger(dispatcher, Arc::clone(&self.logger));
        transport.run(input, output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::McpServerBuilder;

    #[tokio::test]
    async fn stdio_round_trip_answers_ping() {
        let server = McpServerBuilder::new("test-server", "0.1.0").build();
        let input = std::io::Cursor::new(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".to_vec());
        let mut output = Vec::new();
        server.run_stdio(input, &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"result\":{}"));
    }

    #[test]
    fn http_builder_honors_configured_path() {
        let server = McpServerBuilder::new("test-server", "0.1.0")
            .path("/mcp")
            .build();
        let http = server.build_http();
        drop(http);
    }
}
