//! Builder-pattern assembly of an [`McpServer`](crate::server::McpServer)
//! (§10.3): registers tools/resources/prompts, then hands the wiring to
//! either the HTTP or stdio transport.

use std::net::SocketAddr;
use std::sync::Arc;

use mcp_rt_protocol::initialize::Implementation;
use mcp_rt_protocol::observability::{Clock, Logger, NoopLogger, SystemClock};
use mcp_rt_session::InMemorySessionStorage;

use crate::prompt::{McpPrompt, PromptRegistry};
use crate::resource::{McpResource, ResourceRegistry};
use crate::server::{McpServer, ServerConfig};
use crate::tool::{McpTool, ToolRegistry};

/// Assembles a server's capabilities and transport configuration before
/// `build()` produces the immutable [`McpServer`].
pub struct McpServerBuilder {
    name: String,
    version: String,
    instructions: Option<String>,
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
    prompts: Arc<PromptRegistry>,
    sessions: Option<Arc<InMemorySessionStorage>>,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
    config: ServerConfig,
}

impl McpServerBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            instructions: None,
            tools: Arc::new(ToolRegistry::new()),
            resources: Arc::new(ResourceRegistry::new()),
            prompts: Arc::new(PromptRegistry::new()),
            sessions: None,
            logger: Arc::new(NoopLogger),
            clock: Arc::new(SystemClock),
            config: ServerConfig::default(),
        }
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn tool<T: McpTool + 'static>(self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn resource<R: McpResource + 'static>(self, resource: R) -> Self {
        self.resources.register(resource);
        self
    }

    pub fn prompt<P: McpPrompt + 'static>(self, prompt: P) -> Self {
        self.prompts.register(prompt);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session_storage(mut self, sessions: Arc<InMemorySessionStorage>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config.allowed_origins = origins;
        self
    }

    pub fn session_required(mut self, required: bool) -> Self {
        self.config.session_required = required;
        self
    }

    pub fn cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    pub fn sse(mut self, enable: bool) -> Self {
        self.config.enable_sse = enable;
        self
    }

    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    pub fn session_expiry_minutes(mut self, minutes: u64) -> Self {
        self.config.session_expiry_minutes = minutes;
        self
    }

    pub fn build(self) -> McpServer {
        let sessions = self.sessions.unwrap_or_else(|| {
            Arc::new(InMemorySessionStorage::with_logger_and_clock(
                Arc::clone(&self.logger),
                Arc::clone(&self.clock),
            ))
        });

        McpServer::new(
            Implementation::new(self.name, self.version),
            self.instructions,
            self.tools,
            self.resources,
            self.prompts,
            sessions,
            self.logger,
            self.clock,
            self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mcp_rt_json_rpc::r#async::SessionContext;
    use mcp_rt_protocol::content::ContentBlock;
    use mcp_rt_protocol::errors::McpError;
    use mcp_rt_protocol::tools::ToolOutcome;
    use std::collections::HashMap;

    struct NoopTool;

    #[async_trait]
    impl McpTool for NoopTool {
        fn name(&self) -> &str {
            "noop"
        }

        async fn call(
            &self,
            _arguments: HashMap<String, serde_json::Value>,
            _session: Option<SessionContext>,
        ) -> Result<ToolOutcome, McpError> {
            Ok(ToolOutcome::from(ContentBlock::text("ok")))
        }
    }

    #[test]
    fn builder_registers_tools_before_build() {
        let server = McpServerBuilder::new("test-server", "0.1.0")
            .tool(NoopTool)
            .build();
        assert_eq!(server.tools().list().len(), 1);
    }

    #[test]
    fn builder_carries_config_overrides_into_the_server() {
        let addr: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        let server = McpServerBuilder::new("test-server", "0.1.0")
            .bind_address(addr)
            .path("/mcp")
            .session_required(false)
            .build();
        assert_eq!(server.config().bind_addr, addr);
        assert_eq!(server.config().path, "/mcp");
        assert!(!server.config().session_required);
    }
}
