//! Navigation pipeline.
//!
//! # Data Flow
//! ```text
//! NavigationState + Session
//!     → private_guard (login redirect)
//!     → published RouteTable (first match wins)
//!         no match → NotFoundPage (override, else built-in)
//!     → exact_guard (not-found redirect)
//!     → override component, or LazyPage inside the route's fault boundary
//!     → Dispatcher with the route's PresetContext
//!     → View
//! ```
//!
//! # Design Decisions
//! - Authorized tree and route table are published together through `ArcSwap`
//! - A failed permission recompute keeps the previous tree published
//! - A session's own permissions are published before matching, anonymous or not
//! - A fresh `LazyPage` per navigation; only the not-found override is reused
//! - `Outlet` applies a result only if its navigation is still the latest

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::schema::{AppConfig, AppSettings};
use crate::guard::{exact_guard, private_guard, NotFoundPage};
use crate::loader::{DirPageLoader, LazyPage, PageLoader};
use crate::observability::metrics;
use crate::preset::{DirPresetSource, PresetComputer, PresetKey, PresetSource};
use crate::render::component::{ComponentRegistry, PassthroughSchemaRenderer, RouteProps, SchemaRenderer};
use crate::render::context::PresetContext;
use crate::render::dispatcher::{Dispatcher, RenderSource};
use crate::render::view::{FaultScope, NavigationState, View};
use crate::routing::router::RouteTable;
use crate::routing::tree::{AuthorizedRouteTree, RouteNode};
use crate::security::auth::Session;
use crate::security::filter::filter_routes;
use crate::security::permissions::{KeySetChecker, LimitChecker, PermissionError, PermissionSet};

/// Everything derived from one PermissionSet.
#[derive(Debug)]
struct Authorized {
    permissions: PermissionSet,
    tree: Arc<AuthorizedRouteTree>,
    table: RouteTable,
}

/// Assembles an [`Engine`] from configuration and collaborators.
pub struct EngineBuilder {
    app: AppSettings,
    mock_enabled: bool,
    routes: Vec<RouteNode>,
    checker: Arc<dyn LimitChecker>,
    loader: Arc<dyn PageLoader>,
    presets: Arc<dyn PresetSource>,
    components: ComponentRegistry,
    schema_renderer: Arc<dyn SchemaRenderer>,
}

impl EngineBuilder {
    pub fn checker(mut self, checker: Arc<dyn LimitChecker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn loader(mut self, loader: Arc<dyn PageLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn presets(mut self, presets: Arc<dyn PresetSource>) -> Self {
        self.presets = presets;
        self
    }

    pub fn components(mut self, components: ComponentRegistry) -> Self {
        self.components = components;
        self
    }

    pub fn schema_renderer(mut self, renderer: Arc<dyn SchemaRenderer>) -> Self {
        self.schema_renderer = renderer;
        self
    }

    /// Replace the declared tree taken from the config.
    pub fn routes(mut self, routes: Vec<RouteNode>) -> Self {
        self.routes = routes;
        self
    }

    /// Build the engine with an empty PermissionSet published.
    pub fn build(self) -> Result<Engine, PermissionError> {
        let permissions = PermissionSet::default();
        let authorized = authorize(&self.routes, &permissions, self.checker.as_ref(), &self.app.base_route)?;

        tracing::info!(
            routes = self.routes.len(),
            components = self.components.len(),
            mock = self.mock_enabled,
            "Engine ready"
        );

        Ok(Engine {
            not_found: NotFoundPage::new(&self.app, self.loader.clone()),
            presets: ArcSwap::from_pointee(PresetComputer::new(self.presets, self.mock_enabled)),
            dispatcher: Dispatcher::new(self.components, self.schema_renderer),
            declared: Arc::new(self.routes),
            state: ArcSwap::from_pointee(authorized),
            app: self.app,
            mock_enabled: self.mock_enabled,
            checker: self.checker,
            loader: self.loader,
        })
    }
}

/// Route/preset/permission resolution engine.
pub struct Engine {
    app: AppSettings,
    mock_enabled: bool,
    declared: Arc<Vec<RouteNode>>,
    checker: Arc<dyn LimitChecker>,
    loader: Arc<dyn PageLoader>,
    presets: ArcSwap<PresetComputer>,
    dispatcher: Dispatcher,
    not_found: NotFoundPage,
    state: ArcSwap<Authorized>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("app", &self.app)
            .field("declared", &self.declared.len())
            .field("authorized_nodes", &self.state.load().tree.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Start from a config; collaborators default to the bundled directory
    /// loader and preset source rooted at `pages.dir`.
    pub fn builder(config: &AppConfig) -> EngineBuilder {
        EngineBuilder {
            app: config.app.clone(),
            mock_enabled: config.mock.enabled,
            routes: config.routes.clone(),
            checker: Arc::new(KeySetChecker),
            loader: Arc::new(DirPageLoader::new(&config.pages.dir)),
            presets: Arc::new(DirPresetSource::new(&config.pages.dir)),
            components: ComponentRegistry::new(),
            schema_renderer: Arc::new(PassthroughSchemaRenderer),
        }
    }

    /// Engine with every collaborator defaulted.
    pub fn new(config: &AppConfig) -> Result<Self, PermissionError> {
        Self::builder(config).build()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.app
    }

    pub fn declared(&self) -> &[RouteNode] {
        &self.declared
    }

    /// Recompute and publish the authorized tree for `permissions`.
    ///
    /// On a predicate failure the previously published tree stays in place.
    pub fn set_permissions(&self, permissions: PermissionSet) -> Result<(), PermissionError> {
        self.publish(permissions).map(|_| ())
    }

    fn publish(&self, permissions: PermissionSet) -> Result<Arc<Authorized>, PermissionError> {
        let authorized = authorize(&self.declared, &permissions, self.checker.as_ref(), &self.app.base_route)
            .inspect_err(|e| tracing::error!(error = %e, "Permission recompute failed, keeping current tree"))?;
        let authorized = Arc::new(authorized);
        self.state.store(authorized.clone());
        Ok(authorized)
    }

    pub fn permissions(&self) -> PermissionSet {
        self.state.load().permissions.clone()
    }

    /// The currently published authorized tree.
    pub fn authorized_tree(&self) -> Arc<AuthorizedRouteTree> {
        self.state.load().tree.clone()
    }

    /// Swap the preset source, dropping every memoized preset.
    pub fn replace_preset_source(&self, source: Arc<dyn PresetSource>) {
        self.presets.store(Arc::new(PresetComputer::new(source, self.mock_enabled)));
        tracing::debug!("Preset source replaced");
    }

    /// Loading view to show while `location` resolves, if it needs a page module.
    pub fn loading_view(&self, location: &str) -> Option<View> {
        let state = self.state.load();
        let (entry, _) = state.table.match_location(location)?;
        if entry.route.component.is_some() || !entry.route.suspends() {
            return None;
        }
        Some(View::loading(entry.route.fallback.as_deref()))
    }

    /// Resolve the view for a navigation.
    pub async fn navigate(&self, nav: &NavigationState, session: &Session) -> View {
        let (view, outcome) = self.resolve(nav, session).await;
        metrics::record_navigation(outcome);
        tracing::debug!(location = %nav.location, outcome, "Navigation resolved");
        view
    }

    async fn resolve(&self, nav: &NavigationState, session: &Session) -> (View, &'static str) {
        if let Some(redirect) = private_guard(session, nav, &self.app) {
            return (View::Redirect(redirect), "redirect");
        }

        // Anonymous sessions carry an empty set and are filtered like any other.
        let mut state = self.state.load_full();
        if session.permissions != state.permissions {
            state = match self.publish(session.permissions.clone()) {
                Ok(state) => state,
                Err(e) => {
                    return (
                        View::Failure {
                            scope: FaultScope::App,
                            message: e.to_string(),
                        },
                        "failure",
                    );
                }
            };
        }

        let Some((entry, params)) = state.table.match_location(&nav.location) else {
            let ctx = self.context(&self.not_found.preset_key(), &state.permissions);
            let view = self.not_found.render(&nav.location, &self.dispatcher, &ctx).await;
            return (view, "not_found");
        };

        if let Some(redirect) = exact_guard(&entry.route, &nav.location, &self.app) {
            return (View::Redirect(redirect), "redirect");
        }

        let route = &entry.route;
        let props = RouteProps {
            path: entry.full_path.clone(),
            location: nav.location.clone(),
            params,
            path_to_component: route.path_to_component.clone(),
        };
        let ctx = self.context(&route.preset_key(), &state.permissions);
        let view = self.render_route(route, &props, &ctx).await;
        let outcome = match view {
            View::Failure { .. } => "failure",
            View::Placeholder { .. } => "placeholder",
            _ => "rendered",
        };
        (view, outcome)
    }

    async fn render_route(&self, route: &RouteNode, props: &RouteProps, ctx: &PresetContext) -> View {
        if route.component.is_some() {
            return self
                .dispatcher
                .render(RenderSource::select(route.component.as_ref(), None), props, ctx);
        }

        let page = LazyPage::new(route.page_ref(), self.loader.clone());
        match page.resolve().await {
            Ok(source) => self.dispatcher.render(RenderSource::select(None, Some(source)), props, ctx),
            Err(e) => View::Failure {
                scope: if route.suspends() { FaultScope::Page } else { FaultScope::App },
                message: e.to_string(),
            },
        }
    }

    fn context(&self, key: &PresetKey, permissions: &PermissionSet) -> PresetContext {
        PresetContext::new(self.presets.load().compute(key), permissions.clone(), self.checker.clone())
    }
}

fn authorize(
    declared: &[RouteNode],
    permissions: &PermissionSet,
    checker: &dyn LimitChecker,
    base: &str,
) -> Result<Authorized, PermissionError> {
    let tree = filter_routes(declared, permissions, checker)?;
    let table = RouteTable::from_tree(&tree, base);
    Ok(Authorized {
        permissions: permissions.clone(),
        tree: Arc::new(tree),
        table,
    })
}

/// Identifies one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationId(Uuid);

impl NavigationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NavigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NavigationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What happened to a navigation's result.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Applied(View),
    /// A later navigation started first; the result was dropped.
    Stale,
}

/// The displayed view of the routed area.
#[derive(Debug)]
pub struct Outlet {
    engine: Arc<Engine>,
    latest: Mutex<NavigationId>,
    view: watch::Sender<View>,
}

impl Outlet {
    pub fn new(engine: Arc<Engine>) -> Self {
        let (view, _) = watch::channel(View::loading(None));
        Self {
            engine,
            latest: Mutex::new(NavigationId::new()),
            view,
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view.subscribe()
    }

    pub fn current_view(&self) -> View {
        self.view.borrow().clone()
    }

    /// Navigate; the result replaces the current view unless superseded.
    pub async fn navigate(&self, nav: &NavigationState, session: &Session) -> NavigationOutcome {
        let id = NavigationId::new();
        self.begin(id, self.engine.loading_view(&nav.location));

        let view = self.engine.navigate(nav, session).await;

        let outcome = self.finish(id, view);
        if outcome == NavigationOutcome::Stale {
            metrics::record_navigation("stale");
            tracing::debug!(navigation = %id, location = %nav.location, "Dropping stale navigation result");
        }
        outcome
    }

    /// Mark `id` as the latest navigation and show its loading view.
    fn begin(&self, id: NavigationId, loading: Option<View>) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = id;
        if let Some(loading) = loading {
            self.view.send_replace(loading);
        }
    }

    /// Apply `view` if `id` is still the latest navigation.
    fn finish(&self, id: NavigationId, view: View) -> NavigationOutcome {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if *latest != id {
            return NavigationOutcome::Stale;
        }
        self.view.send_replace(view.clone());
        NavigationOutcome::Applied(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadError, PageModule};
    use crate::security::permissions::LimitContext;
    use futures_util::future::BoxFuture;
    use serde_json::json;

    struct SchemaPages;

    impl PageLoader for SchemaPages {
        fn load(&self, page_ref: &str) -> BoxFuture<'static, Result<PageModule, LoadError>> {
            let page_ref = page_ref.to_string();
            Box::pin(async move {
                if page_ref.contains("broken") {
                    Err(LoadError::Rejected {
                        page_ref,
                        reason: "boom".to_string(),
                    })
                } else {
                    Ok(PageModule::schema(json!({ "type": "page", "title": page_ref })))
                }
            })
        }
    }

    fn engine(routes: Vec<RouteNode>) -> Engine {
        let config = AppConfig {
            app: AppSettings {
                require_login: false,
                ..AppSettings::default()
            },
            routes,
            ..AppConfig::default()
        };
        Engine::builder(&config)
            .loader(Arc::new(SchemaPages))
            .presets(Arc::new(crate::preset::StaticPresetSource::new()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_route_renders() {
        let engine = engine(vec![RouteNode::new("/dashboard")]);
        let view = engine
            .navigate(&NavigationState::new("/dashboard"), &Session::anonymous())
            .await;
        let View::Schema { props } = view else {
            panic!("expected schema view, got {view:?}");
        };
        assert_eq!(props["schema"]["preset"]["nodePath"], json!("dashboard"));
    }

    #[tokio::test]
    async fn test_load_failure_is_page_scoped() {
        let engine = engine(vec![RouteNode::new("/broken")]);
        let view = engine.navigate(&NavigationState::new("/broken"), &Session::anonymous()).await;
        assert!(matches!(view, View::Failure { scope: FaultScope::Page, .. }));
    }

    #[test]
    fn test_failed_recompute_keeps_tree() {
        let checker = |keys: &[String], ctx: &LimitContext<'_>| {
            if ctx.permissions.contains("flaky") {
                return Err(PermissionError::Predicate {
                    keys: keys.to_vec(),
                    reason: "offline".to_string(),
                });
            }
            KeySetChecker.check_limit_by_keys(keys, ctx)
        };
        let config = AppConfig {
            routes: vec![RouteNode::new("/a"), RouteNode::new("/b").with_permissions(["b"])],
            ..AppConfig::default()
        };
        let engine = Engine::builder(&config).checker(Arc::new(checker)).build().unwrap();
        assert_eq!(engine.authorized_tree().len(), 1);

        engine.set_permissions(PermissionSet::new(["b"])).unwrap();
        assert_eq!(engine.authorized_tree().len(), 2);

        assert!(engine.set_permissions(PermissionSet::new(["b", "flaky"])).is_err());
        assert_eq!(engine.authorized_tree().len(), 2);
        assert_eq!(engine.permissions(), PermissionSet::new(["b"]));
    }

    #[test]
    fn test_loading_view_only_for_page_modules() {
        let mut lazy = RouteNode::new("/lazy");
        lazy.fallback = Some("spinner".to_string());
        let engine = engine(vec![lazy, RouteNode::new("/fixed").with_component("fixed")]);
        assert_eq!(
            engine.loading_view("/lazy"),
            Some(View::Loading {
                fallback: "spinner".to_string()
            })
        );
        assert_eq!(engine.loading_view("/fixed"), None);
        assert_eq!(engine.loading_view("/missing"), None);
    }

    #[test]
    fn test_superseded_navigation_cannot_overwrite_newer_view() {
        let outlet = Outlet::new(Arc::new(engine(vec![])));
        let first = NavigationId::new();
        let second = NavigationId::new();
        let newer = View::NotFound {
            location: "/second".to_string(),
        };

        outlet.begin(first, Some(View::loading(Some("first"))));
        outlet.begin(second, None);
        assert_eq!(outlet.finish(second, newer.clone()), NavigationOutcome::Applied(newer.clone()));

        let older = View::NotFound {
            location: "/first".to_string(),
        };
        assert_eq!(outlet.finish(first, older), NavigationOutcome::Stale);
        assert_eq!(outlet.current_view(), newer);
    }

    #[tokio::test]
    async fn test_menu_route_failure_is_app_scoped() {
        let mut menu_page = RouteNode::new("/broken-menu");
        menu_page.menu = Some(crate::routing::tree::MenuMeta::default());
        let engine = engine(vec![menu_page, RouteNode::new("/broken")]);

        assert_eq!(engine.loading_view("/broken-menu"), None);
        let view = engine
            .navigate(&NavigationState::new("/broken-menu"), &Session::anonymous())
            .await;
        assert!(matches!(view, View::Failure { scope: FaultScope::App, .. }));

        assert!(engine.loading_view("/broken").is_some());
    }
}
