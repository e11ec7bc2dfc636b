//! Scans `<root>/{tools,resources,prompts}` for manifest files and
//! registers whatever parses and resolves against the handler table
//! (§4.10).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use mcp_rt_builders::{PromptBuilder, ResourceBuilder, ToolBuilder};
use mcp_rt_protocol::observability::{LogFields, Logger, NoopLogger};
use mcp_rt_server::{PromptRegistry, ResourceRegistry, ToolRegistry};

use crate::handlers::HandlerTable;
use crate::manifest::{PromptManifest, ResourceManifest, ToolManifest};

/// How many components of each kind the scan registered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub tools: usize,
    pub resources: usize,
    pub prompts: usize,
}

pub struct AutoLoader {
    handlers: HandlerTable,
    logger: Arc<dyn Logger>,
}

impl AutoLoader {
    pub fn new(handlers: HandlerTable) -> Self {
        Self::with_logger(handlers, Arc::new(NoopLogger))
    }

    pub fn with_logger(handlers: HandlerTable, logger: Arc<dyn Logger>) -> Self {
        Self { handlers, logger }
    }

    /// Walk `root`'s three component subdirectories and register every
    /// manifest found. A missing root, an unparseable file, or an
    /// unresolvable `handler` only skips that one file (§4.10); the scan
    /// itself never fails.
    pub fn load_into(
        &self,
        root: &Path,
        tools: &ToolRegistry,
        resources: &ResourceRegistry,
        prompts: &PromptRegistry,
    ) -> LoadSummary {
        LoadSummary {
            tools: self.load_tools(&root.join("tools"), tools),
            resources: self.load_resources(&root.join("resources"), resources),
            prompts: self.load_prompts(&root.join("prompts"), prompts),
        }
    }

    fn manifest_files(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.exists() {
            self.logger.warn(
                "auto-loader directory does not exist, skipping",
                LogFields::new().with_method(dir.display().to_string()),
            );
            return Vec::new();
        }
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                matches!(
                    entry.path().extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    fn read(&self, path: &Path) -> Option<String> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Some(contents),
            Err(err) => {
                self.warn_skip(path, &err.to_string());
                None
            }
        }
    }

    fn warn_skip(&self, path: &Path, reason: &str) {
        self.logger.warn(
            &format!("skipping manifest: {reason}"),
            LogFields::new().with_method(path.display().to_string()),
        );
    }

    fn info_loaded(&self, path: &Path, name: &str) {
        self.logger.info(
            "registered component from manifest",
            LogFields::new()
                .with_method(path.display().to_string())
                .with_correlation_id(0)
                .with_event_id(0)
                .with_session_id(name.to_string()),
        );
    }

    fn load_tools(&self, dir: &Path, registry: &ToolRegistry) -> usize {
        let mut loaded = 0;
        for path in self.manifest_files(dir) {
            let Some(contents) = self.read(&path) else {
                continue;
            };
            let manifest: ToolManifest = match serde_yml::from_str(&contents) {
                Ok(manifest) => manifest,
                Err(err) => {
                    self.warn_skip(&path, &err.to_string());
                    continue;
                }
            };
            let Some(handler) = self.handlers.tools.get(&manifest.handler).cloned() else {
                self.warn_skip(&path, &format!("unresolved tool handler '{}'", manifest.handler));
                continue;
            };

            let mut builder = ToolBuilder::new(manifest.name.clone());
            if let Some(description) = manifest.description {
                builder = builder.description(description);
            }
            for parameter in manifest.parameters {
                builder = builder.parameter(parameter);
            }
            let tool = builder
                .handler(move |args, session| {
                    let handler = Arc::clone(&handler);
                    async move { handler(args, session).await }
                })
                .build();

            registry.register(tool);
            self.info_loaded(&path, &manifest.name);
            loaded += 1;
        }
        loaded
    }

    fn load_resources(&self, dir: &Path, registry: &ResourceRegistry) -> usize {
        let mut loaded = 0;
        for path in self.manifest_files(dir) {
            let Some(contents) = self.read(&path) else {
                continue;
            };
            let manifest: ResourceManifest = match serde_yml::from_str(&contents) {
                Ok(manifest) => manifest,
                Err(err) => {
                    self.warn_skip(&path, &err.to_string());
                    continue;
                }
            };
            let Some(handler) = self.handlers.resources.get(&manifest.handler).cloned() else {
                self.warn_skip(
                    &path,
                    &format!("unresolved resource handler '{}'", manifest.handler),
                );
                continue;
            };

            let mut builder = ResourceBuilder::new(manifest.uri.clone());
            if let Some(name) = manifest.name {
                builder = builder.name(name);
            }
            if let Some(description) = manifest.description {
                builder = builder.description(description);
            }
            if let Some(mime_type) = manifest.mime_type {
                builder = builder.mime_type(mime_type);
            }
            let resource = builder
                .handler(move |session| {
                    let handler = Arc::clone(&handler);
                    async move { handler(session).await }
                })
                .build();

            registry.register(resource);
            self.info_loaded(&path, &manifest.uri);
            loaded += 1;
        }
        loaded
    }

    fn load_prompts(&self, dir: &Path, registry: &PromptRegistry) -> usize {
        let mut loaded = 0;
        for path in self.manifest_files(dir) {
            let Some(contents) = self.read(&path) else {
                continue;
            };
            let manifest: PromptManifest = match serde_yml::from_str(&contents) {
                Ok(manifest) => manifest,
                Err(err) => {
                    self.warn_skip(&path, &err.to_string());
                    continue;
                }
            };
            let Some(renderer) = self.handlers.prompts.get(&manifest.handler).cloned() else {
                self.warn_skip(
                    &path,
                    &format!("unresolved prompt handler '{}'", manifest.handler),
                );
                continue;
            };

            let mut builder = PromptBuilder::new(manifest.name.clone());
            if let Some(description) = manifest.description {
                builder = builder.description(description);
            }
            for argument in manifest.arguments {
                builder = builder.argument(argument);
            }
            let prompt = builder.messages(renderer()).build();

            registry.register(prompt);
            self.info_loaded(&path, &manifest.name);
            loaded += 1;
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_rt_protocol::prompts::PromptMessage;
    use mcp_rt_protocol::tools::ToolOutcome;
    use std::fs;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn scans_and_registers_every_kind() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        write(
            root,
            "tools/double.yaml",
            "name: double\nhandler: double\nparameters:\n  - name: value\n    type: number\n",
        );
        write(
            root,
            "resources/notes.yaml",
            "uri: file:///notes.txt\nhandler: notes\nmimeType: text/plain\n",
        );
        write(
            root,
            "prompts/greeting.yaml",
            "name: greeting\nhandler: greeting\narguments:\n  - name: name\n    required: true\n",
        );

        let handlers = HandlerTable::new()
            .tool(
                "double",
                Arc::new(|args, _session| {
                    Box::pin(async move {
                        let value = args.get("value").and_then(|v| v.as_f64()).unwrap_or(0.0);
                        Ok(ToolOutcome::Json(serde_json::json!({ "result": value * 2.0 })))
                    })
                }),
            )
            .resource(
                "notes",
                Arc::new(|_session| {
                    Box::pin(async move {
                        Ok(mcp_rt_server::ResourceOutcome::Json(serde_json::json!("hello")))
                    })
                }),
            )
            .prompt(
                "greeting",
                Arc::new(|| vec![PromptMessage::user_text("Hello {name}!")]),
            );

        let loader = AutoLoader::new(handlers);
        let tools = ToolRegistry::new();
        let resources = ResourceRegistry::new();
        let prompts = PromptRegistry::new();

        let summary = loader.load_into(root, &tools, &resources, &prompts);
        assert_eq!(summary, LoadSummary { tools: 1, resources: 1, prompts: 1 });
        assert!(tools.get("double").is_some());
        assert!(resources.get("file:///notes.txt").is_some());
        assert!(prompts.get("greeting").is_some());
    }

    #[test]
    fn missing_root_yields_empty_summary() {
        let loader = AutoLoader::new(HandlerTable::new());
        let tools = ToolRegistry::new();
        let resources = ResourceRegistry::new();
        let prompts = PromptRegistry::new();

        let summary = loader.load_into(Path::new("/nonexistent/auto-load/root"), &tools, &resources, &prompts);
        assert_eq!(summary, LoadSummary::default());
    }

    #[tokio::test]
    async fn unresolved_handler_skips_only_that_file() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "tools/known.yaml", "name: known\nhandler: known\n");
        write(root, "tools/unknown.yaml", "name: mystery\nhandler: missing\n");

        let handlers = HandlerTable::new().tool(
            "known",
            Arc::new(|_args, _session| Box::pin(async move { Ok(ToolOutcome::Text("ok".to_string())) })),
        );
        let loader = AutoLoader::new(handlers);
        let tools = ToolRegistry::new();
        let resources = ResourceRegistry::new();
        let prompts = PromptRegistry::new();

        let summary = loader.load_into(root, &tools, &resources, &prompts);
        assert_eq!(summary.tools, 1);
        assert!(tools.get("known").is_some());
        assert!(tools.get("mystery").is_none());
    }
}
