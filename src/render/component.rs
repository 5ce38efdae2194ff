//! Components, the component registry, and the schema renderer seam.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::render::context::PresetContext;
use crate::render::view::View;
use crate::routing::matcher::RouteParams;

/// Name of a component registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Props every route render receives.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProps {
    /// Declared route path pattern.
    pub path: String,
    /// Current location.
    pub location: String,
    pub params: RouteParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_to_component: Option<String>,
}

/// A renderable component.
pub trait Component: Send + Sync {
    fn render(&self, props: &RouteProps, ctx: &PresetContext) -> View;
}

impl<F> Component for F
where
    F: Fn(&RouteProps, &PresetContext) -> View + Send + Sync,
{
    fn render(&self, props: &RouteProps, ctx: &PresetContext) -> View {
        self(props, ctx)
    }
}

/// Components known to the host, by key.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<ComponentKey, Arc<dyn Component>>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: impl Into<String>, component: impl Component + 'static) -> Self {
        self.components.insert(ComponentKey::new(key), Arc::new(component));
        self
    }

    pub fn get(&self, key: &ComponentKey) -> Option<&Arc<dyn Component>> {
        self.components.get(key)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// The external schema-driven rendering engine.
pub trait SchemaRenderer: Send + Sync {
    /// Render `props` (which carries `schema`, with the preset merged in).
    fn render(&self, props: &serde_json::Map<String, Value>, route: &RouteProps, ctx: &PresetContext) -> View;
}

/// Hands the schema back unchanged as a [`View::Schema`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSchemaRenderer;

impl SchemaRenderer for PassthroughSchemaRenderer {
    fn render(&self, props: &serde_json::Map<String, Value>, _route: &RouteProps, _ctx: &PresetContext) -> View {
        View::Schema {
            props: props.clone(),
        }
    }
}
