//! Render strategy selection.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::loader::{PageSource, SchemaProps};
use crate::preset::Preset;
use crate::render::component::{ComponentKey, ComponentRegistry, RouteProps, SchemaRenderer};
use crate::render::context::PresetContext;
use crate::render::view::View;

/// Key the preset is merged under inside a schema.
pub const PRESET_KEY: &str = "preset";

/// The one render source of a matched route.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSource {
    /// Override component from the route declaration.
    Override(ComponentKey),
    /// Component exported by the page module.
    LazyFile(ComponentKey),
    /// Schema exported by the page module.
    Schema(SchemaProps),
}

impl RenderSource {
    /// Pick by fixed priority: the declared override always dominates.
    pub fn select(route_component: Option<&ComponentKey>, page: Option<PageSource>) -> Option<Self> {
        if let Some(key) = route_component {
            return Some(RenderSource::Override(key.clone()));
        }
        match page? {
            PageSource::Component(key) => Some(RenderSource::LazyFile(key)),
            PageSource::Schema(props) => Some(RenderSource::Schema(props)),
        }
    }
}

/// Merge the computed preset into `schema.preset`.
///
/// Declared preset fields survive unless the computed preset has the same field.
/// Returns false if `schema` is not an object.
pub fn merge_schema_preset(schema: &mut Value, preset: &Preset) -> bool {
    let Value::Object(fields) = schema else {
        return false;
    };

    let mut merged = match fields.remove(PRESET_KEY) {
        Some(Value::Object(declared)) => declared,
        _ => Map::new(),
    };
    merged.extend(preset.to_fields());
    fields.insert(PRESET_KEY.to_string(), Value::Object(merged));
    true
}

/// Renders a route from its selected source.
#[derive(Clone)]
pub struct Dispatcher {
    components: ComponentRegistry,
    schema_renderer: Arc<dyn SchemaRenderer>,
}

impl Dispatcher {
    pub fn new(components: ComponentRegistry, schema_renderer: Arc<dyn SchemaRenderer>) -> Self {
        Self {
            components,
            schema_renderer,
        }
    }

    pub fn render(&self, source: Option<RenderSource>, props: &RouteProps, ctx: &PresetContext) -> View {
        match source {
            Some(RenderSource::Override(key)) | Some(RenderSource::LazyFile(key)) => {
                self.render_component(&key, props, ctx)
            }
            Some(RenderSource::Schema(schema_props)) => self.render_schema(schema_props, props, ctx),
            None => {
                tracing::warn!(path = %props.path, "No render source for route");
                View::not_configured()
            }
        }
    }

    fn render_component(&self, key: &ComponentKey, props: &RouteProps, ctx: &PresetContext) -> View {
        match self.components.get(key) {
            Some(component) => component.render(props, ctx),
            None => {
                tracing::warn!(path = %props.path, component = %key, "Component not registered");
                View::not_configured()
            }
        }
    }

    fn render_schema(&self, mut schema_props: SchemaProps, props: &RouteProps, ctx: &PresetContext) -> View {
        let merged = schema_props
            .schema_mut()
            .map(|schema| merge_schema_preset(schema, ctx.preset()))
            .unwrap_or(false);

        if !merged {
            tracing::warn!(path = %props.path, "Page module has no schema object");
            return View::not_configured();
        }
        self.schema_renderer.render(&schema_props.content, props, ctx)
    }
}
