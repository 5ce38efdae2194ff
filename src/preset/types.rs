//! Preset value types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page mock data: api url → mock payload.
pub type MockSource = Map<String, Value>;

/// Identity triple of a matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetKey {
    pub path: String,
    pub path_to_component: Option<String>,
    pub node_path: Option<String>,
}

impl PresetKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Page module reference: `pathToComponent`, else `path`.
    pub fn page_ref(&self) -> &str {
        self.path_to_component.as_deref().unwrap_or(&self.path)
    }
}

/// One named api definition of a page preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDef {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_source: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiDef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Flagged for mocking but carrying no payload of its own.
    pub fn wants_mock(&self) -> bool {
        self.mock == Some(true) && self.mock_source.as_ref().map_or(true, Value::is_null)
    }
}

/// Per-route context injected into rendered output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    #[serde(default)]
    pub node_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_source: Option<MockSource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub apis: BTreeMap<String, ApiDef>,
    /// Other page-declared fields (actions, forms, ...), passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Preset {
    /// Preset holding only an identity.
    pub fn with_node_path(node_path: impl Into<String>) -> Self {
        Self {
            node_path: node_path.into(),
            ..Self::default()
        }
    }

    /// The preset as a JSON object, for merging into schemas.
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => Map::new(),
            Err(e) => {
                tracing::warn!(node_path = %self.node_path, error = %e, "Preset not serializable");
                Map::new()
            }
        }
    }
}
