//! Runtime resource construction, mirroring [`crate::tool`] for
//! [`mcp_rt_server::McpResource`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use mcp_rt_json_rpc::r#async::SessionContext;
use mcp_rt_protocol::errors::McpError;
use mcp_rt_server::{McpResource, ResourceOutcome};

pub type ResourceFn = Arc<
    dyn Fn(Option<SessionContext>) -> Pin<Box<dyn Future<Output = Result<ResourceOutcome, McpError>> + Send>>
        + Send
        + Sync,
>;

pub struct ResourceBuilder {
    uri: String,
    name: String,
    description: Option<String>,
    mime_type: Option<String>,
    handler: Option<ResourceFn>,
}

impl ResourceBuilder {
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let name = uri.rsplit('/').next().unwrap_or(&uri).to_string();
        Self {
            uri,
            name,
            description: None,
            mime_type: None,
            handler: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Option<SessionContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ResourceOutcome, McpError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |session| Box::pin(handler(session))));
        self
    }

    pub fn build(self) -> DynamicResource {
        DynamicResource {
            uri: self.uri,
            name: self.name,
            description: self.description,
            mime_type: self.mime_type,
            handler: self.handler.expect("ResourceBuilder::handler was never called"),
        }
    }
}

pub struct DynamicResource {
    uri: String,
    name: String,
    description: Option<String>,
    mime_type: Option<String>,
    handler: ResourceFn,
}

#[async_trait]
impl McpResource for DynamicResource {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    async fn read(&self, session: Option<SessionContext>) -> Result<ResourceOutcome, McpError> {
        (self.handler)(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn built_resource_serves_its_handler_output() {
        let resource = ResourceBuilder::new("file:///config.json")
            .description("app config")
            .mime_type("application/json")
            .handler(|_session| async move { Ok(ResourceOutcome::Json(json!({"debug": false}))) })
            .build();

        assert_eq!(resource.name(), "config.json");
        assert_eq!(resource.mime_type(), Some("application/json"));
        let outcome = resource.read(None).await.unwrap();
        assert!(matches!(outcome, ResourceOutcome::Json(_)));
    }

    #[test]
    #[should_panic(expected = "handler was never called")]
    fn build_without_handler_panics() {
        ResourceBuilder::new("file:///missing").build();
    }
}
