//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Matched route + optional PageSource
//!     → dispatcher.rs: RenderSource::select (fixed priority)
//!         1. Override(component)  from the route declaration
//!         2. LazyFile(component)  from the page module
//!         3. Schema(props)        preset merged into schema.preset
//!     → component.rs (registered components / opaque SchemaRenderer)
//!     → view.rs: View
//!
//! Every branch receives context.rs: PresetContext (preset + checkLimit)
//! ```
//!
//! # Design Decisions
//! - One active render source per route, chosen by priority, never by shape
//! - Context is passed explicitly; there is no process-wide preset
//! - A route with no usable source renders a configuration placeholder

pub mod component;
pub mod context;
pub mod dispatcher;
pub mod view;

pub use component::{
    Component, ComponentKey, ComponentRegistry, PassthroughSchemaRenderer, RouteProps, SchemaRenderer,
};
pub use context::PresetContext;
pub use dispatcher::{merge_schema_preset, Dispatcher, RenderSource};
pub use view::{FaultScope, NavigationState, Redirect, RedirectState, View};
