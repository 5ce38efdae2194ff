//! Shared fixtures for the navigation tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use tokio::sync::Notify;

use preset_router::config::{AppConfig, AppSettings};
use preset_router::loader::{LoadError, PageLoader, PageModule};
use preset_router::render::{ComponentKey, ComponentRegistry, PresetContext, RouteProps, View};
use preset_router::routing::{MenuMeta, RouteNode};
use preset_router::security::LimitOptions;

/// Page loader over an in-memory module map.
///
/// Gated pages park until [`MemoryLoader::release`] is called.
#[derive(Default)]
pub struct MemoryLoader {
    pages: HashMap<String, PageModule>,
    gates: HashMap<String, Arc<Gate>>,
    loads: Arc<AtomicUsize>,
}

#[derive(Default)]
pub struct Gate {
    started: Notify,
    release: Notify,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page_ref: &str, module: PageModule) -> Self {
        self.pages.insert(page_ref.trim_matches('/').to_string(), module);
        self
    }

    pub fn gated(mut self, page_ref: &str) -> Self {
        self.gates
            .insert(page_ref.trim_matches('/').to_string(), Arc::new(Gate::default()));
        self
    }

    pub fn loads(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }

    pub fn gate(&self, page_ref: &str) -> Arc<Gate> {
        self.gates[page_ref.trim_matches('/')].clone()
    }
}

impl Gate {
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl PageLoader for MemoryLoader {
    fn load(&self, page_ref: &str) -> BoxFuture<'static, Result<PageModule, LoadError>> {
        let key = page_ref.trim_matches('/').to_string();
        let module = self.pages.get(&key).cloned();
        let gate = self.gates.get(&key).cloned();
        self.loads.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            if let Some(gate) = gate {
                gate.started.notify_one();
                gate.release.notified().await;
            }
            module.ok_or(LoadError::NotFound { page_ref: key })
        })
    }
}

/// Component that echoes its props, node identity and one permission check.
pub fn echo(key: &'static str) -> impl Fn(&RouteProps, &PresetContext) -> View + Send + Sync {
    move |props: &RouteProps, ctx: &PresetContext| View::Element {
        component: ComponentKey::new(key),
        props: props.clone(),
        body: json!({
            "nodePath": ctx.node_path(),
            "canEdit": ctx.check_limit(&["edit"], LimitOptions::default()).unwrap_or(false),
        }),
    }
}

pub fn components() -> ComponentRegistry {
    ComponentRegistry::new()
        .register("home", echo("home"))
        .register("user-detail", echo("user-detail"))
}

pub fn with_menu(mut node: RouteNode, label: &str) -> RouteNode {
    node.menu = Some(MenuMeta {
        label: Some(label.to_string()),
        ..MenuMeta::default()
    });
    node
}

/// Typical admin tree: a home page, a permission-guarded system group and
/// a couple of order pages.
pub fn sample_routes() -> Vec<RouteNode> {
    let mut dashboard = with_menu(RouteNode::new("/dashboard"), "Dashboard");
    dashboard.fallback = Some("dashboard_loading".to_string());
    dashboard.with_suspense = Some(true);

    vec![
        RouteNode::new("/home").with_component("home"),
        dashboard,
        with_menu(RouteNode::new(""), "System")
            .with_permissions(["system"])
            .with_children(vec![
                with_menu(RouteNode::new("/system/users"), "Users")
                    .with_permissions(["users"])
                    .with_exact(true),
                RouteNode::new("/system/users/:id")
                    .with_component("user-detail")
                    .with_permissions(["users"]),
                with_menu(RouteNode::new("/system/roles"), "Roles").with_permissions(["roles"]),
            ]),
        RouteNode::new("/orders"),
        RouteNode::new("/orders/:id").with_exact(true),
        RouteNode::new("/slow"),
        RouteNode::new("/broken"),
    ]
}

pub fn sample_config(require_login: bool) -> AppConfig {
    AppConfig {
        app: AppSettings {
            require_login,
            ..AppSettings::default()
        },
        routes: sample_routes(),
        ..AppConfig::default()
    }
}

pub fn schema(body: Value) -> PageModule {
    PageModule::schema(body)
}
