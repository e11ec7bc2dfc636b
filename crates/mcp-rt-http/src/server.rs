//! The listening HTTP server around [`HttpTransport`] (§4.4 "bind socket,
//! start accept loop").

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use mcp_rt_json_rpc::r#async::{JsonRpcDispatcher, JsonRpcHandler};
use mcp_rt_protocol::errors::{McpError, TransportError};
use mcp_rt_protocol::observability::{Clock, LogFields, Logger, NoopLogger, SystemClock};
use mcp_rt_session::InMemorySessionStorage;
use mcp_rt_session::SessionStorage;

use crate::cors::CorsLayer;
use crate::transport::{HttpTransport, HttpTransportConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub mcp_path: String,
    pub enable_cors: bool,
    pub max_body_size: usize,
    pub enable_sse: bool,
    pub allowed_origins: Vec<String>,
    pub require_session: bool,
    pub session_expiry_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".parse().unwrap(),
            mcp_path: "/".to_string(),
            enable_cors: true,
            max_body_size: 1024 * 1024,
            enable_sse: true,
            allowed_origins: Vec::new(),
            require_session: true,
            session_expiry_minutes: 30,
        }
    }
}

impl From<&ServerConfig> for HttpTransportConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            mcp_path: config.mcp_path.clone(),
            max_body_size: config.max_body_size,
            allowed_origins: config.allowed_origins.clone(),
            require_session: config.require_session,
        }
    }
}

pub struct HttpMcpServerBuilder {
    config: ServerConfig,
    dispatcher: JsonRpcDispatcher<McpError>,
    session_storage: Arc<InMemorySessionStorage>,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
}

impl HttpMcpServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher: JsonRpcDispatcher::new(),
            session_storage: Arc::new(InMemorySessionStorage::new()),
            logger: Arc::new(NoopLogger),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_storage(session_storage: Arc<InMemorySessionStorage>) -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher: JsonRpcDispatcher::new(),
            session_storage,
            logger: Arc::new(NoopLogger),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    pub fn mcp_path(mut self, path: impl Into<String>) -> Self {
        self.config.mcp_path = path.into();
        self
    }

    pub fn cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    pub fn sse(mut self, enable: bool) -> Self {
        self.config.enable_sse = enable;
        self
    }

    pub fn allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config.allowed_origins = origins;
        self
    }

    pub fn require_session(mut self, require: bool) -> Self {
        self.config.require_session = require;
        self
    }

    pub fn session_expiry_minutes(mut self, minutes: u64) -> Self {
        self.config.session_expiry_minutes = minutes;
        self
    }

    pub fn register_handler<H>(mut self, methods: Vec<String>, handler: H) -> Self
    where
        H: JsonRpcHandler<Error = McpError> + 'static,
    {
        self.dispatcher.register_methods(methods, handler);
        self
    }

    pub fn default_handler<H>(mut self, handler: H) -> Self
    where
        H: JsonRpcHandler<Error = McpError> + 'static,
    {
        self.dispatcher.set_default_handler(handler);
        self
    }

    pub fn build(self) -> HttpMcpServer {
        let transport_config = HttpTransportConfig::from(&self.config);
        let transport = HttpTransport::with_logger_and_clock(
            transport_config,
            Arc::new(self.dispatcher),
            Arc::clone(&self.session_storage),
            Arc::clone(&self.logger),
            Arc::clone(&self.clock),
        );

        HttpMcpServer {
            config: self.config,
            transport,
            session_storage: self.session_storage,
            logger: self.logger,
            clock: self.clock,
        }
    }
}

impl Default for HttpMcpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running (or not-yet-bound) MCP HTTP server: one [`HttpTransport`]
/// behind a hyper accept loop, plus the background session-expiry sweep.
#[derive(Clone)]
pub struct HttpMcpServer {
    config: ServerConfig,
    transport: Arc<HttpTransport>,
    session_storage: Arc<InMemorySessionStorage>,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
}

impl HttpMcpServer {
    pub fn builder() -> HttpMcpServerBuilder {
        HttpMcpServerBuilder::new()
    }

    pub fn builder_with_storage(session_storage: Arc<InMemorySessionStorage>) -> HttpMcpServerBuilder {
        HttpMcpServerBuilder::with_storage(session_storage)
    }

    /// Bind the socket and serve until the process is killed.
    pub async fn run(&self) -> Result<(), TransportError> {
        self.spawn_session_cleanup();

        let listener = TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(|err| TransportError::BindFailed(err.to_string()))?;
        self.logger.info(
            &format!("MCP HTTP server listening on {}", self.config.bind_address),
            LogFields::new(),
        );
        self.logger.info(
            &format!("endpoint: {}", self.config.mcp_path),
            LogFields::new(),
        );

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    self.logger.error(&format!("accept failed: {err}"), LogFields::new());
                    continue;
                }
            };
            self.logger.debug(&format!("connection from {peer_addr}"), LogFields::new());

            let transport = Arc::clone(&self.transport);
            let enable_cors = self.config.enable_cors;
            let logger = Arc::clone(&self.logger);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let transport = Arc::clone(&transport);
                    async move {
                        let mut response = transport.handle(req).await;
                        if enable_cors {
                            CorsLayer::apply_cors_headers(response.headers_mut());
                        }
                        Ok::<_, hyper::Error>(response)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    logger.debug(&format!("connection closed: {err}"), LogFields::new());
                }
            });
        }
    }

    fn spawn_session_cleanup(&self) {
        let storage = Arc::clone(&self.session_storage);
        let expiry_minutes = self.config.session_expiry_minutes;
        let logger = Arc::clone(&self.logger);
        let clock = Arc::clone(&self.clock);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                let cutoff = clock.now() - std::time::Duration::from_secs(expiry_minutes * 60);
                match storage.expire_sessions(cutoff).await {
                    Ok(expired) if !expired.is_empty() => {
                        logger.info(&format!("expired {} sessions", expired.len()), LogFields::new());
                    }
                    Ok(_) => {}
                    Err(err) => logger.error(&format!("session cleanup error: {err}"), LogFields::new()),
                }
            }
        });
    }

    /// Stop accepting and drain in-flight requests (§4.4 `close()`).
    pub async fn close(&self) {
        self.transport.close().await;
    }

    pub async fn stats(&self) -> ServerStats {
        ServerStats {
            sessions: self.session_storage.session_count().await.unwrap_or(0),
            storage_type: self.session_storage.backend_name().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerStats {
    pub sessions: usize,
    pub storage_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn server_config_default_matches_the_spec_path() {
        let config = ServerConfig::default();
        assert_eq!(config.mcp_path, "/");
        assert!(config.enable_cors);
        assert!(config.require_session);
    }

    #[test]
    fn builder_overrides_bind_address_and_path() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 3000);
        let server = HttpMcpServerBuilder::new()
            .bind_address(addr)
            .mcp_path("/mcp")
            .cors(false)
            .build();

        assert_eq!(server.config.bind_address, addr);
        assert_eq!(server.config.mcp_path, "/mcp");
        assert!(!server.config.enable_cors);
    }

    #[tokio::test]
    async fn stats_reports_zero_sessions_before_any_connect() {
        let server = HttpMcpServerBuilder::new().build();
        let stats = server.stats().await;
        assert_eq!(stats.sessions, 0);
        assert_eq!(stats.storage_type, "InMemory");
    }
}
