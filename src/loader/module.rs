//! Page modules and the loader collaborator.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::preset::source::page_key;
use crate::render::ComponentKey;

/// Errors that can occur while loading a page module.
///
/// Cloneable so every awaiter of a shared load gets the same failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// No module exists for the page reference.
    #[error("Page module not found: {page_ref}")]
    NotFound { page_ref: String },

    /// The module exists but could not be read.
    #[error("Failed to read page module {page_ref}: {message}")]
    Io { page_ref: String, message: String },

    /// The module is malformed.
    #[error("Invalid page module {page_ref}: {message}")]
    Invalid { page_ref: String, message: String },

    /// The loader rejected the request.
    #[error("Page module {page_ref} rejected: {reason}")]
    Rejected { page_ref: String, reason: String },
}

/// Default export of a page module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleDefault {
    /// A renderable component.
    Component(ComponentKey),
    /// A plain content object (schema renderer props).
    Content(Map<String, Value>),
}

/// What a page loader resolves to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageModule {
    pub default: Option<ModuleDefault>,
    pub schema: Option<Value>,
}

impl PageModule {
    pub fn component(key: impl Into<String>) -> Self {
        Self {
            default: Some(ModuleDefault::Component(ComponentKey::new(key))),
            schema: None,
        }
    }

    pub fn schema(schema: Value) -> Self {
        Self {
            default: None,
            schema: Some(schema),
        }
    }

    /// Pick the single render source this module provides.
    ///
    /// A component default export wins outright; otherwise the schema (if any)
    /// is attached to the content object under `schema`.
    pub fn into_source(self) -> PageSource {
        match self.default {
            Some(ModuleDefault::Component(key)) => PageSource::Component(key),
            Some(ModuleDefault::Content(mut content)) => {
                if let Some(schema) = self.schema {
                    content.insert("schema".to_string(), schema);
                }
                PageSource::Schema(SchemaProps { content })
            }
            None => {
                let mut content = Map::new();
                if let Some(schema) = self.schema {
                    content.insert("schema".to_string(), schema);
                }
                PageSource::Schema(SchemaProps { content })
            }
        }
    }
}

/// Props handed to the schema renderer: the content object with its `schema`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaProps {
    pub content: Map<String, Value>,
}

impl SchemaProps {
    pub fn schema(&self) -> Option<&Value> {
        self.content.get("schema")
    }

    pub fn schema_mut(&mut self) -> Option<&mut Value> {
        self.content.get_mut("schema")
    }
}

/// Render source resolved from a page module. Exactly one per module.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSource {
    Component(ComponentKey),
    Schema(SchemaProps),
}

/// Loader collaborator: fetches the module behind a page reference.
pub trait PageLoader: Send + Sync {
    fn load(&self, page_ref: &str) -> BoxFuture<'static, Result<PageModule, LoadError>>;
}

/// Loads `<pages>/<page>/index.json`.
///
/// `{"component": "<key>"}` declares a component page; any other object is
/// content, with its `schema` field split off.
#[derive(Debug, Clone)]
pub struct DirPageLoader {
    pages_dir: PathBuf,
}

impl DirPageLoader {
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
        }
    }
}

impl PageLoader for DirPageLoader {
    fn load(&self, page_ref: &str) -> BoxFuture<'static, Result<PageModule, LoadError>> {
        let page_ref = page_ref.to_string();
        let path = self.pages_dir.join(page_key(&page_ref)).join("index.json");

        Box::pin(async move {
            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LoadError::NotFound {
                        page_ref: page_ref.clone(),
                    }
                } else {
                    LoadError::Io {
                        page_ref: page_ref.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

            let value: Value = serde_json::from_str(&content).map_err(|e| LoadError::Invalid {
                page_ref: page_ref.clone(),
                message: e.to_string(),
            })?;

            parse_module(&page_ref, value)
        })
    }
}

fn parse_module(page_ref: &str, value: Value) -> Result<PageModule, LoadError> {
    let Value::Object(mut content) = value else {
        return Err(LoadError::Invalid {
            page_ref: page_ref.to_string(),
            message: "module must be a JSON object".to_string(),
        });
    };

    if let Some(Value::String(key)) = content.get("component") {
        return Ok(PageModule::component(key.clone()));
    }

    let schema = content.remove("schema");
    Ok(PageModule {
        default: Some(ModuleDefault::Content(content)),
        schema,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_export_wins() {
        let module = PageModule {
            default: Some(ModuleDefault::Component(ComponentKey::new("users"))),
            schema: Some(json!({ "type": "page" })),
        };
        assert_eq!(module.into_source(), PageSource::Component(ComponentKey::new("users")));
    }

    #[test]
    fn test_schema_attached_to_content() {
        let content = match json!({ "title": "Users" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let module = PageModule {
            default: Some(ModuleDefault::Content(content)),
            schema: Some(json!({ "type": "page" })),
        };
        let PageSource::Schema(props) = module.into_source() else {
            panic!("expected schema source");
        };
        assert_eq!(props.content["title"], json!("Users"));
        assert_eq!(props.schema(), Some(&json!({ "type": "page" })));

        let PageSource::Schema(bare) = PageModule::schema(json!({ "type": "crud" })).into_source() else {
            panic!("expected schema source");
        };
        assert_eq!(bare.schema(), Some(&json!({ "type": "crud" })));
    }

    #[tokio::test]
    async fn test_dir_loader() {
        let root = std::env::temp_dir().join(format!("preset-router-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("users")).unwrap();
        std::fs::create_dir_all(root.join("roles")).unwrap();
        std::fs::create_dir_all(root.join("bad")).unwrap();
        std::fs::write(root.join("users/index.json"), r#"{"component":"users-table"}"#).unwrap();
        std::fs::write(root.join("roles/index.json"), r#"{"title":"Roles","schema":{"type":"page"}}"#).unwrap();
        std::fs::write(root.join("bad/index.json"), "[1,2]").unwrap();

        let loader = DirPageLoader::new(&root);
        assert_eq!(loader.load("/users").await.unwrap(), PageModule::component("users-table"));

        let roles = loader.load("/roles/").await.unwrap();
        assert_eq!(roles.schema, Some(json!({ "type": "page" })));

        assert!(matches!(loader.load("/missing").await, Err(LoadError::NotFound { .. })));
        assert!(matches!(loader.load("/bad").await, Err(LoadError::Invalid { .. })));

        std::fs::remove_dir_all(&root).unwrap_or_default();
    }
}
