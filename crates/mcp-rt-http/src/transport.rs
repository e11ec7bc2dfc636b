//! The Streamable-HTTP transport: one endpoint path serving POST (JSON-RPC
//! request/notification) and GET (`text/event-stream`) (§4.4).
//!
//! This is the single handler for the transport; it replaces three
//! overlapping implementations the lineage carried side by side (a
//! placeholder handler, a multi-protocol-version streaming handler, and a
//! session-aware handler with its own Accept-header taxonomy). None of that
//! complexity survives here: one protocol version, no progress-token
//! streaming, no chunked Transfer-Encoding, one `SessionStorage`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_stream::StreamExt;

use mcp_rt_json_rpc::dispatch::{parse_json_rpc_message, IncomingMessage};
use mcp_rt_json_rpc::error::{JsonRpcError, JsonRpcErrorObject};
use mcp_rt_json_rpc::notification::JsonRpcNotification;
use mcp_rt_json_rpc::r#async::{JsonRpcDispatcher, SessionContext};
use mcp_rt_json_rpc::request::JsonRpcRequest;
use mcp_rt_json_rpc::response::JsonRpcMessage;
use mcp_rt_protocol::errors::{McpError, TransportError};
use mcp_rt_protocol::observability::{Clock, LogFields, Logger, NoopLogger, SystemClock};
use mcp_rt_protocol::{ServerCapabilities, MCP_PROTOCOL_VERSION};
use mcp_rt_session::InMemorySessionStorage;
use mcp_rt_session::SessionStorage;

use crate::protocol::{
    accept_allows_event_stream, accept_allows_json_and_event_stream, content_type_is_json,
    extract_last_event_id, extract_origin, extract_protocol_version, extract_session_id,
};
use crate::sse::SseManager;

/// Boxed response body: `Full` for ordinary responses, a broadcast-backed
/// stream for SSE. Unifying the type lets one handler return either.
pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, Infallible>;

/// `Created → Connected → Draining → Closed` (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Created,
    Connected,
    Draining,
    Closed,
}

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub mcp_path: String,
    pub max_body_size: usize,
    /// Empty means no origin restriction (§4.4 step 3).
    pub allowed_origins: Vec<String>,
    /// Whether non-`initialize` messages must carry a valid `Mcp-Session-Id`.
    pub require_session: bool,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            mcp_path: "/".to_string(),
            max_body_size: 1024 * 1024,
            allowed_origins: Vec::new(),
            require_session: true,
        }
    }
}

/// One message handed from a POST handler to the dispatcher worker loop.
/// Requests carry a `correlation_id` bound to a [`ResponseSlot`]; a
/// notification has nowhere to reply to and is handled best-effort (§4.4).
enum Inbound {
    Request {
        correlation_id: u64,
        request: JsonRpcRequest,
        session: Option<SessionContext>,
    },
    Notification {
        notification: JsonRpcNotification,
        session: Option<SessionContext>,
    },
}

type ResponseSlots = Arc<Mutex<HashMap<u64, oneshot::Sender<JsonRpcMessage>>>>;

/// The Streamable-HTTP transport. One instance owns one `SseManager` (so SSE
/// event ids stay monotonic per transport instance), one `SessionStorage`,
/// and the single dispatcher worker loop every POST enqueues onto.
pub struct HttpTransport {
    config: HttpTransportConfig,
    dispatcher: Arc<JsonRpcDispatcher<McpError>>,
    sessions: Arc<InMemorySessionStorage>,
    sse: Arc<SseManager>,
    inbound_tx: mpsc::Sender<Inbound>,
    slots: ResponseSlots,
    next_correlation_id: AtomicU64,
    state: RwLock<TransportState>,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
}

impl HttpTransport {
    pub fn new(
        config: HttpTransportConfig,
        dispatcher: Arc<JsonRpcDispatcher<McpError>>,
        sessions: Arc<InMemorySessionStorage>,
    ) -> Arc<Self> {
        Self::with_logger(config, dispatcher, sessions, Arc::new(NoopLogger))
    }

    pub fn with_logger(
        config: HttpTransportConfig,
        dispatcher: Arc<JsonRpcDispatcher<McpError>>,
        sessions: Arc<InMemorySessionStorage>,
        logger: Arc<dyn Logger>,
    ) -> Arc<Self> {
        Self::with_logger_and_clock(config, dispatcher, sessions, logger, Arc::new(SystemClock))
    }

    pub fn with_logger_and_clock(
        config: HttpTransportConfig,
        dispatcher: Arc<JsonRpcDispatcher<McpError>>,
        sessions: Arc<InMemorySessionStorage>,
        logger: Arc<dyn Logger>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let (inbound_tx, inbound_rx) = mpsc::channel(1024);
        let slots: ResponseSlots = Arc::new(Mutex::new(HashMap::new()));

        let transport = Arc::new(Self {
            config,
            dispatcher: Arc::clone(&dispatcher),
            sessions,
            sse: Arc::new(SseManager::with_logger(Arc::clone(&logger))),
            inbound_tx,
            slots: Arc::clone(&slots),
            next_correlation_id: AtomicU64::new(1),
            state: RwLock::new(TransportState::Created),
            logger: Arc::clone(&logger),
            clock,
        });

        transport.spawn_worker(inbound_rx, dispatcher, slots, logger);
        *transport.state.write().unwrap() = TransportState::Connected;
        transport
    }

    fn spawn_worker(
        &self,
        mut inbound_rx: mpsc::Receiver<Inbound>,
        dispatcher: Arc<JsonRpcDispatcher<McpError>>,
        slots: ResponseSlots,
        logger: Arc<dyn Logger>,
    ) {
        tokio::spawn(async move {
            while let Some(item) = inbound_rx.recv().await {
                match item {
                    Inbound::Request {
                        correlation_id,
                        request,
                        session,
                    } => {
                        let result = match session {
                            Some(ctx) => dispatcher.handle_request_with_context(request, ctx).await,
                            None => dispatcher.handle_request(request).await,
                        };
                        if let Some(tx) = slots.lock().await.remove(&correlation_id) {
                            let _ = tx.send(result);
                        }
                    }
                    Inbound::Notification {
                        notification,
                        session,
                    } => {
                        if let Err(err) = dispatcher
                            .handle_notification_with_context(notification, session)
                            .await
                        {
                            logger.warn(
                                &format!("notification handling failed: {err}"),
                                LogFields::new(),
                            );
                        }
                    }
                }
            }
        });
    }

    pub fn state(&self) -> TransportState {
        *self.state.read().unwrap()
    }

    /// `close()`: stop accepting, release every pending slot with a
    /// transport error, then transition to `Closed`. Idempotent.
    pub async fn close(&self) {
        if self.state() == TransportState::Closed {
            return;
        }
        *self.state.write().unwrap() = TransportState::Draining;

        let mut slots = self.slots.lock().await;
        for (_, tx) in slots.drain() {
            let error = McpError::from(TransportError::Closed).to_error_object();
            let _ = tx.send(JsonRpcMessage::error(JsonRpcError::new(None, error)));
        }
        drop(slots);

        *self.state.write().unwrap() = TransportState::Closed;
    }

    /// Single entry point a hyper `service_fn` calls for every request.
    pub async fn handle(&self, req: Request<Incoming>) -> Response<BoxBody> {
        if req.uri().path() != self.config.mcp_path {
            return text_response(StatusCode::NOT_FOUND, "not found");
        }

        match *req.method() {
            Method::POST => self.handle_post(req).await,
            Method::GET => self.handle_get(req).await,
            Method::OPTIONS => self.handle_preflight(),
            _ => method_not_allowed(),
        }
    }

    async fn handle_post(&self, req: Request<Incoming>) -> Response<BoxBody> {
        if self.state() != TransportState::Connected {
            return json_rpc_error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                None,
                McpError::from(TransportError::Closed).to_error_object(),
            );
        }

        let headers = req.headers().clone();

        // Step 1: Content-Type / Accept.
        if !content_type_is_json(&headers) {
            return text_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type must be application/json",
            );
        }
        if !accept_allows_json_and_event_stream(&headers) {
            return text_response(
                StatusCode::NOT_ACCEPTABLE,
                "Accept must include application/json and text/event-stream",
            );
        }

        // Step 2: protocol version.
        if let Some(version) = extract_protocol_version(&headers) {
            if version != MCP_PROTOCOL_VERSION {
                let error = McpError::from(TransportError::UnsupportedProtocolVersion {
                    expected: MCP_PROTOCOL_VERSION.to_string(),
                    actual: version,
                })
                .to_error_object();
                return json_rpc_error_response(StatusCode::BAD_REQUEST, None, error);
            }
        }

        // Step 3: origin allow-list.
        if !self.config.allowed_origins.is_empty() {
            if let Some(origin) = extract_origin(&headers) {
                if !self.config.allowed_origins.iter().any(|o| o == &origin) {
                    return text_response(StatusCode::FORBIDDEN, "origin not allowed");
                }
            }
        }

        let body_bytes = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                self.logger.error(
                    &format!("failed to read request body: {err}"),
                    LogFields::new(),
                );
                return text_response(StatusCode::BAD_REQUEST, "failed to read request body");
            }
        };
        if body_bytes.len() > self.config.max_body_size {
            return text_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large");
        }
        let body_str = match std::str::from_utf8(&body_bytes) {
            Ok(s) => s,
            Err(_) => return text_response(StatusCode::BAD_REQUEST, "request body must be UTF-8"),
        };

        // Step 4: classify.
        let message = match parse_json_rpc_message(body_str) {
            Ok(m) => m,
            Err(rpc_err) => return json_message_response(StatusCode::OK, &JsonRpcMessage::Error(rpc_err), None, None),
        };

        let is_initialize = matches!(&message, IncomingMessage::Request(r) if r.method == "initialize");

        // Steps 5 & 6: session validation / creation.
        let provided_session_id = extract_session_id(&headers);
        let session_id = if is_initialize {
            match self
                .sessions
                .create_session(ServerCapabilities::default())
                .await
            {
                Ok(session) => Some(session.session_id),
                Err(err) => {
                    self.logger.error(
                        &format!("failed to create session: {err}"),
                        LogFields::new(),
                    );
                    return json_rpc_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        None,
                        McpError::internal(err.to_string()).to_error_object(),
                    );
                }
            }
        } else if self.config.require_session {
            match &provided_session_id {
                None => {
                    let error = McpError::from(TransportError::SessionRequired).to_error_object();
                    return json_rpc_error_response(StatusCode::BAD_REQUEST, None, error);
                }
                Some(id) => match self.sessions.get_session(id).await {
                    Ok(Some(_)) => Some(id.clone()),
                    _ => {
                        let error = McpError::from(TransportError::InvalidSession).to_error_object();
                        return json_rpc_error_response(StatusCode::BAD_REQUEST, None, error);
                    }
                },
            }
        } else {
            provided_session_id
        };

        let timestamp = self
            .clock
            .now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let session_context = session_id.as_ref().map(|id| SessionContext {
            session_id: id.clone(),
            metadata: HashMap::new(),
            broadcaster: None,
            timestamp,
        });

        match message {
            // Step 7: notification fast path.
            IncomingMessage::Notification(notification) => {
                let _ = self
                    .inbound_tx
                    .send(Inbound::Notification {
                        notification,
                        session: session_context,
                    })
                    .await;
                accepted_response(session_id.as_deref())
            }
            // Step 8: request, blocking on its ResponseSlot.
            IncomingMessage::Request(request) => {
                let correlation_id = self.next_correlation_id.fetch_add(1, Ordering::SeqCst);
                let (reply_tx, reply_rx) = oneshot::channel();
                self.slots.lock().await.insert(correlation_id, reply_tx);

                if self
                    .inbound_tx
                    .send(Inbound::Request {
                        correlation_id,
                        request,
                        session: session_context,
                    })
                    .await
                    .is_err()
                {
                    self.slots.lock().await.remove(&correlation_id);
                    return json_rpc_error_response(
                        StatusCode::SERVICE_UNAVAILABLE,
                        None,
                        McpError::from(TransportError::Closed).to_error_object(),
                    );
                }

                let result = match reply_rx.await {
                    Ok(result) => result,
                    Err(_) => {
                        self.logger.debug(
                            &format!("response slot {correlation_id} dropped without a reply"),
                            LogFields::new().with_correlation_id(correlation_id),
                        );
                        return json_rpc_error_response(
                            StatusCode::SERVICE_UNAVAILABLE,
                            None,
                            McpError::from(TransportError::Closed).to_error_object(),
                        );
                    }
                };

                // Step 9: optional SSE mirroring, before the 200 body.
                if self.sse.subscriber_count() > 0 {
                    if let Ok(value) = serde_json::to_value(&result) {
                        self.sse.broadcast_response(value);
                    }
                }

                json_message_response(StatusCode::OK, &result, Some(MCP_PROTOCOL_VERSION), session_id.as_deref())
            }
        }
    }

    async fn handle_get(&self, req: Request<Incoming>) -> Response<BoxBody> {
        if !accept_allows_event_stream(req.headers()) {
            return text_response(StatusCode::NOT_ACCEPTABLE, "text/event-stream required");
        }
        if let Some(last_event_id) = extract_last_event_id(req.headers()) {
            self.logger.debug(
                &format!("SSE reconnect with Last-Event-ID: {last_event_id} (resumption not supported)"),
                LogFields::new(),
            );
        }

        let connection = self.sse.connection_event();
        let first = tokio_stream::iter(std::iter::once(Ok::<_, Infallible>(
            http_body::Frame::data(Bytes::from(connection.format())),
        )));
        let rest = tokio_stream::wrappers::BroadcastStream::new(self.sse.subscribe())
            .filter_map(|event| {
                event
                    .ok()
                    .map(|event| Ok::<_, Infallible>(http_body::Frame::data(Bytes::from(event.format()))))
            });
        let body = StreamBody::new(first.chain(rest)).boxed();

        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .header("Connection", "keep-alive")
            .header("X-Accel-Buffering", "no")
            .body(body)
            .expect("static headers are valid")
    }

    fn handle_preflight(&self) -> Response<BoxBody> {
        Response::builder()
            .status(StatusCode::OK)
            .header("Allow", "GET, POST, OPTIONS")
            .body(empty_body())
            .expect("static headers are valid")
    }
}

fn method_not_allowed() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Allow", "GET, POST, OPTIONS")
        .body(empty_body())
        .expect("static headers are valid")
}

fn accepted_response(session_id: Option<&str>) -> Response<BoxBody> {
    let mut builder = Response::builder()
        .status(StatusCode::ACCEPTED)
        .header("MCP-Protocol-Version", MCP_PROTOCOL_VERSION);
    if let Some(id) = session_id {
        builder = builder.header("Mcp-Session-Id", id);
    }
    builder.body(empty_body()).expect("static headers are valid")
}

fn json_message_response(
    status: StatusCode,
    message: &JsonRpcMessage,
    protocol_version: Option<&str>,
    session_id: Option<&str>,
) -> Response<BoxBody> {
    let body = serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string());
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json");
    if let Some(version) = protocol_version {
        builder = builder.header("MCP-Protocol-Version", version);
    }
    if let Some(id) = session_id {
        builder = builder.header("Mcp-Session-Id", id);
    }
    builder
        .body(Full::new(Bytes::from(body)).map_err(|never| match never {}).boxed())
        .expect("static headers are valid")
}

fn json_rpc_error_response(
    status: StatusCode,
    id: Option<mcp_rt_json_rpc::types::RequestId>,
    error: JsonRpcErrorObject,
) -> Response<BoxBody> {
    let message = JsonRpcMessage::Error(JsonRpcError::new(id, error));
    json_message_response(status, &message, None, None)
}

fn text_response(status: StatusCode, message: &str) -> Response<BoxBody> {
    Response::builder()
        .status(status)
        .body(
            Full::new(Bytes::from(message.to_string()))
                .map_err(|never| match never {})
                .boxed(),
        )
        .expect("static headers are valid")
}

fn empty_body() -> BoxBody {
    Full::new(Bytes::new()).map_err(|never| match never {}).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_rt_json_rpc::r#async::JsonRpcHandler;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoHandler;

    #[async_trait]
    impl JsonRpcHandler for EchoHandler {
        type Error = McpError;

        async fn handle(
            &self,
            _method: &str,
            _params: Option<mcp_rt_json_rpc::request::RequestParams>,
            _session_context: Option<SessionContext>,
        ) -> Result<Value, Self::Error> {
            Ok(json!({"ok": true}))
        }
    }

    fn build_transport() -> Arc<HttpTransport> {
        let mut dispatcher = JsonRpcDispatcher::<McpError>::new();
        dispatcher.register_method("ping".to_string(), EchoHandler);
        HttpTransport::new(
            HttpTransportConfig::default(),
            Arc::new(dispatcher),
            Arc::new(InMemorySessionStorage::new()),
        )
    }

    #[test]
    fn starts_connected_and_closes_idempotently() {
        let transport = build_transport();
        assert_eq!(transport.state(), TransportState::Connected);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_releases_pending_slots() {
        let transport = build_transport();
        let (tx, rx) = oneshot::channel();
        transport.slots.lock().await.insert(1, tx);

        transport.close().await;
        assert_eq!(transport.state(), TransportState::Closed);
        assert!(rx.await.unwrap().is_error());

        transport.close().await;
        assert_eq!(transport.state(), TransportState::Closed);
    }

    #[test]
    fn accepted_response_carries_protocol_and_session_headers() {
        let response = accepted_response(Some("abc"));
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get("Mcp-Session-Id").unwrap(), "abc");
    }

    #[test]
    fn json_rpc_error_response_wraps_error_object() {
        let error = JsonRpcErrorObject::invalid_params("bad");
        let response = json_rpc_error_response(StatusCode::BAD_REQUEST, None, error);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
