//! The resource engine (§4.8): registration, `resources/list`, `resources/read`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use mcp_rt_json_rpc::r#async::{JsonRpcHandler, SessionContext};
use mcp_rt_json_rpc::request::RequestParams;
use mcp_rt_protocol::content::ResourceContents;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};
use mcp_rt_protocol::resources::{
    ListResourcesParams, ListResourcesResult, ReadResourceParams, ReadResourceResult, Resource,
};

/// What reading a resource may hand back: either the typed wire shape
/// directly, or an opaque value the engine JSON-serializes as text using
/// the resource's declared MIME type (§4.8 step 3).
pub enum ResourceOutcome {
    Contents(ResourceContents),
    Json(Value),
}

/// Implemented by a host-supplied resource provider.
#[async_trait]
pub trait McpResource: Send + Sync {
    fn uri(&self) -> &str;
    fn name(&self) -> &str;
    fn mime_type(&self) -> Option<&str> {
        None
    }
    fn description(&self) -> Option<&str> {
        None
    }

    async fn read(&self, session: Option<SessionContext>) -> Result<ResourceOutcome, McpError>;

    fn to_descriptor(&self) -> Resource {
        let mut resource = Resource::new(self.uri(), self.name());
        if let Some(mime_type) = self.mime_type() {
            resource = resource.with_mime_type(mime_type);
        }
        if let Some(description) = self.description() {
            resource = resource.with_description(description);
        }
        resource
    }
}

/// Registered resources, keyed by normalized URI string (§4.8 step 2:
/// "lookup by normalized string equality").
#[derive(Default)]
pub struct ResourceRegistry {
    resources: RwLock<HashMap<String, Arc<dyn McpResource>>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R: McpResource + 'static>(&self, resource: R) {
        let uri = normalize_uri(resource.uri());
        self.resources.write().unwrap().insert(uri, Arc::new(resource));
    }

    pub fn get(&self, uri: &str) -> Option<Arc<dyn McpResource>> {
        self.resources.read().unwrap().get(&normalize_uri(uri)).cloned()
    }

    pub fn list(&self) -> Vec<Resource> {
        self.resources
            .read()
            .unwrap()
            .values()
            .map(|resource| resource.to_descriptor())
            .collect()
    }
}

/// Normalize a URI to its RFC 3986 string form (§4.8 step 1). A parse
/// failure is reported by the caller as `INVALID_URI`; this function only
/// normalizes what already parses.
fn normalize_uri(uri: &str) -> String {
    uri.trim().to_string()
}

/// Validate a client-supplied URI against RFC 3986 before it is used as a
/// registry lookup key (§4.8 step 1). Rejects anything `url::Url::parse`
/// can't make sense of, not just whitespace.
fn parse_uri(uri: &str) -> Result<String, McpError> {
    let trimmed = uri.trim();
    if trimmed.is_empty() || uri.chars().any(|c| c.is_whitespace()) {
        return Err(McpError::invalid_uri(uri));
    }
    url::Url::parse(trimmed).map_err(|_| McpError::invalid_uri(uri))?;
    Ok(normalize_uri(uri))
}

pub struct ResourcesHandler {
    registry: Arc<ResourceRegistry>,
    logger: Arc<dyn Logger>,
}

impl ResourcesHandler {
    pub fn new(registry: Arc<ResourceRegistry>) -> Self {
        Self::with_logger(registry, Arc::new(NoopLogger))
    }

    pub fn with_logger(registry: Arc<ResourceRegistry>, logger: Arc<dyn Logger>) -> Self {
        Self { registry, logger }
    }

    fn list(&self) -> Value {
        let result = ListResourcesResult::new(self.registry.list());
        serde_json::to_value(result).expect("ListResourcesResult always serializes")
    }

    async fn read(
        &self,
        params: Option<RequestParams>,
        session: Option<SessionContext>,
    ) -> Result<Value, McpError> {
        let read_params: ReadResourceParams = match params {
            Some(params) => serde_json::from_value(params.to_value())?,
            None => return Err(McpError::invalid_params("resources/read requires {uri}")),
        };

        let normalized = parse_uri(&read_params.uri)?;
        let resource = self
            .registry
            .get(&normalized)
            .ok_or_else(|| McpError::resource_not_found(&read_params.uri))?;

        self.logger.debug(
            "reading resource",
            LogFields::new().with_method(format!("resources/read:{normalized}")),
        );
        let contents = match resource.read(session).await? {
            ResourceOutcome::Contents(contents) => contents,
            ResourceOutcome::Json(value) => {
                let text = serde_json::to_string(&value).unwrap_or_else(|_| value.to_string());
                match resource.mime_type() {
                    Some(mime_type) => ResourceContents::text_with_mime(&normalized, text, mime_type),
                    None => ResourceContents::text(&normalized, text),
                }
            }
        };

        let result = ReadResourceResult::new(vec![contents]);
        Ok(serde_json::to_value(result)?)
    }
}

#[async_trait]
impl JsonRpcHandler for ResourcesHandler {
    type Error = McpError;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        session_context: Option<SessionContext>,
    ) -> Result<Value, Self::Error> {
        match method {
            "resources/list" => {
                let _: ListResourcesParams = params
                    .map(|p| serde_json::from_value(p.to_value()))
                    .transpose()?
                    .unwrap_or_default();
                Ok(self.list())
            }
            "resources/read" => self.read(params, session_context).await,
            other => Err(McpError::method_not_found(other)),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["resources/list".to_string(), "resources/read".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticResource;

    #[async_trait]
    impl McpResource for StaticResource {
        fn uri(&self) -> &str {
            "file:///notes.txt"
        }

        fn name(&self) -> &str {
            "notes"
        }

        fn mime_type(&self) -> Option<&str> {
            Some("text/plain")
        }

        async fn read(
            &self,
            _session: Option<SessionContext>,
        ) -> Result<ResourceOutcome, McpError> {
            Ok(ResourceOutcome::Contents(ResourceContents::text_with_mime(
                "file:///notes.txt",
                "hello",
                "text/plain",
            )))
        }
    }

    fn handler() -> ResourcesHandler {
        let registry = Arc::new(ResourceRegistry::new());
        registry.register(StaticResource);
        ResourcesHandler::new(registry)
    }

    #[tokio::test]
    async fn resources_list_carries_default_annotations() {
        let value = handler()
            .handle("resources/list", None, None)
            .await
            .unwrap();
        let resources = value["resources"].as_array().unwrap();
        assert_eq!(resources[0]["uri"], "file:///notes.txt");
        assert_eq!(resources[0]["annotations"]["priority"], 0.0);
    }

    #[tokio::test]
    async fn resources_read_returns_text_contents() {
        let params = RequestParams::Object(HashMap::from([(
            "uri".to_string(),
            Value::String("file:///notes.txt".to_string()),
        )]));
        let value = handler()
            .handle("resources/read", Some(params), None)
            .await
            .unwrap();
        assert_eq!(value["contents"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn resources_read_rejects_non_rfc3986_uri() {
        let params = RequestParams::Object(HashMap::from([(
            "uri".to_string(),
            Value::String("not-a-uri".to_string()),
        )]));
        let error = handler()
            .handle("resources/read", Some(params), None)
            .await
            .unwrap_err();
        assert_eq!(error.to_error_object().code, -32004);
    }

    #[tokio::test]
    async fn resources_read_missing_uri_yields_not_found() {
        let params = RequestParams::Object(HashMap::from([(
            "uri".to_string(),
            Value::String("file:///missing.txt".to_string()),
        )]));
        let error = handler()
            .handle("resources/read", Some(params), None)
            .await
            .unwrap_err();
        assert_eq!(error.to_error_object().code, -32002);
    }
}
