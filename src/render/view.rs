//! Render output and navigation input types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::render::component::{ComponentKey, RouteProps};

/// Default loading view label.
pub const PAGE_LOADING: &str = "page_loading";

/// Message of the placeholder shown for unresolvable routes.
pub const NOT_CONFIGURED: &str = "Not Found: check route configuration";

/// State carried by a redirect, so the target can send the user back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectState {
    pub from: String,
}

/// A redirect decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RedirectState>,
}

/// Navigation input owned by the routing collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Current location pathname.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RedirectState>,
}

impl NavigationState {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            state: None,
        }
    }
}

/// How far a failure reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultScope {
    /// Only the route's subtree is replaced.
    Page,
    /// The whole routed area is replaced.
    App,
}

/// What the UI host should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Output of a registered component.
    Element {
        component: ComponentKey,
        props: RouteProps,
        #[serde(skip_serializing_if = "Value::is_null")]
        body: Value,
    },
    /// Schema hand-off to the schema renderer.
    Schema { props: Map<String, Value> },
    /// Waiting on a page module.
    Loading { fallback: String },
    /// A fault boundary caught a failure.
    Failure { scope: FaultScope, message: String },
    Redirect(Redirect),
    /// Built-in not-found page.
    NotFound { location: String },
    /// Configuration error: nothing renderable for the route.
    Placeholder { message: String },
}

impl View {
    pub fn not_configured() -> Self {
        View::Placeholder {
            message: NOT_CONFIGURED.to_string(),
        }
    }

    pub fn loading(fallback: Option<&str>) -> Self {
        View::Loading {
            fallback: fallback.unwrap_or(PAGE_LOADING).to_string(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, View::Redirect(_))
    }
}
