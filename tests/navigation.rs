//! End-to-end navigation through the engine and outlet.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use preset_router::engine::NavigationOutcome;
use preset_router::preset::{ApiDef, Preset, StaticPresetSource};
use preset_router::render::{FaultScope, NavigationState, Redirect, RedirectState, View};
use preset_router::routing::RouteNode;
use preset_router::security::{PermissionSet, Session};
use preset_router::{Engine, Outlet};

mod common;

fn admin(keys: &[&str]) -> Session {
    Session::authenticated("ada", PermissionSet::new(keys.iter().copied()))
}

fn engine_with(loader: common::MemoryLoader, presets: StaticPresetSource, mock: bool) -> Engine {
    let mut config = common::sample_config(true);
    config.mock.enabled = mock;
    Engine::builder(&config)
        .loader(Arc::new(loader))
        .presets(Arc::new(presets))
        .components(common::components())
        .build()
        .unwrap()
}

fn build_engine(loader: common::MemoryLoader) -> Engine {
    engine_with(loader, StaticPresetSource::new(), false)
}

async fn go(engine: &Engine, location: &str, session: &Session) -> View {
    engine.navigate(&NavigationState::new(location), session).await
}

#[tokio::test]
async fn test_anonymous_session_redirected_to_login() {
    let engine = build_engine(common::MemoryLoader::new());
    let view = go(&engine, "/system/users", &Session::anonymous()).await;
    assert_eq!(
        view,
        View::Redirect(Redirect {
            to: "/login".to_string(),
            state: Some(RedirectState {
                from: "/system/users".to_string()
            }),
        })
    );
}

#[tokio::test]
async fn test_exact_literal_route_redirects_but_param_route_renders() {
    let engine = build_engine(common::MemoryLoader::new());
    let session = admin(&["users", "system/users/edit"]);

    let view = go(&engine, "/system/users/5", &session).await;
    let View::Element { component, props, body } = view else {
        panic!("expected user detail, got {view:?}");
    };
    assert_eq!(component.as_str(), "user-detail");
    assert_eq!(props.params.get("id").map(String::as_str), Some("5"));
    assert_eq!(body["nodePath"], json!("system/users"));
    assert_eq!(body["canEdit"], json!(true));

    // `/orders` is declared first without `exact`, so it claims `/orders/7`
    // and the exact guard sends the user to the not-found route.
    let view = go(&engine, "/orders/7", &session).await;
    assert_eq!(
        view,
        View::Redirect(Redirect {
            to: "/404".to_string(),
            state: None,
        })
    );
}

#[tokio::test]
async fn test_override_component_skips_loader() {
    let loader = common::MemoryLoader::new();
    let loads = loader.loads();
    let engine = build_engine(loader);

    let view = go(&engine, "/home", &admin(&[])).await;
    assert!(matches!(view, View::Element { ref component, .. } if component.as_str() == "home"));
    assert_eq!(loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_not_found_prefers_site_page() {
    let engine = build_engine(common::MemoryLoader::new().page("404", common::schema(json!({ "title": "Lost" }))));
    let view = go(&engine, "/nowhere", &admin(&[])).await;
    let View::Schema { props } = view else {
        panic!("expected site not-found page, got {view:?}");
    };
    assert_eq!(props["schema"]["title"], json!("Lost"));
    assert_eq!(props["schema"]["preset"]["nodePath"], json!("404"));

    let engine = build_engine(common::MemoryLoader::new());
    assert_eq!(
        go(&engine, "/nowhere", &admin(&[])).await,
        View::NotFound {
            location: "/nowhere".to_string()
        }
    );
}

#[tokio::test]
async fn test_load_failure_is_page_scoped() {
    let engine = build_engine(common::MemoryLoader::new().page("dashboard", common::schema(json!({ "type": "page" }))));
    let session = admin(&[]);

    let view = go(&engine, "/broken", &session).await;
    assert!(matches!(view, View::Failure { scope: FaultScope::Page, .. }));

    let view = go(&engine, "/dashboard", &session).await;
    assert!(matches!(view, View::Schema { .. }));
}

#[tokio::test]
async fn test_schema_preset_merge() {
    let page = common::schema(json!({
        "type": "page",
        "preset": { "nodePath": "declared", "actions": { "add": { "type": "button" } } }
    }));
    let mut preset = Preset::default();
    preset.apis.insert("list".to_string(), ApiDef::new("/api/list"));
    let presets = StaticPresetSource::new().with_preset("dashboard", preset);

    let engine = engine_with(common::MemoryLoader::new().page("dashboard", page), presets, false);
    let View::Schema { props } = go(&engine, "/dashboard", &admin(&[])).await else {
        panic!("expected schema view");
    };

    let merged = &props["schema"]["preset"];
    assert_eq!(merged["nodePath"], json!("dashboard"));
    assert_eq!(merged["actions"]["add"]["type"], json!("button"));
    assert_eq!(merged["apis"]["list"]["url"], json!("/api/list"));
}

#[tokio::test]
async fn test_mock_back_fill() {
    let mut preset = Preset::default();
    let mut list = ApiDef::new("/api/list");
    list.mock = Some(true);
    let mut stats = ApiDef::new("/api/stats");
    stats.mock = Some(true);
    preset.apis.insert("list".to_string(), list);
    preset.apis.insert("stats".to_string(), stats);

    let mut mocks = Map::new();
    mocks.insert("/api/list".to_string(), json!([1, 2]));
    let presets = StaticPresetSource::new()
        .with_preset("dashboard", preset)
        .with_mock("dashboard", mocks.clone());

    let page = common::schema(json!({ "type": "page" }));
    let engine = engine_with(common::MemoryLoader::new().page("dashboard", page), presets, true);
    let View::Schema { props } = go(&engine, "/dashboard", &admin(&[])).await else {
        panic!("expected schema view");
    };

    let apis = &props["schema"]["preset"]["apis"];
    assert_eq!(apis["list"]["mockSource"], json!([1, 2]));
    assert_eq!(apis["stats"]["mockSource"], Value::Object(mocks));
}

#[tokio::test]
async fn test_permission_change_recomputes_tree() {
    let engine = build_engine(common::MemoryLoader::new().page("system/users", common::schema(json!({}))));

    let view = go(&engine, "/system/users", &admin(&["users"])).await;
    assert!(matches!(view, View::Schema { .. }));
    let visible = engine.authorized_tree().len();

    let view = go(&engine, "/system/users", &admin(&["roles"])).await;
    assert_eq!(
        view,
        View::NotFound {
            location: "/system/users".to_string()
        }
    );
    assert_eq!(engine.permissions(), PermissionSet::new(["roles"]));
    assert_eq!(engine.authorized_tree().len(), visible - 1);
}

#[tokio::test]
async fn test_stale_navigation_is_dropped() {
    let loader = common::MemoryLoader::new()
        .page("slow", common::schema(json!({ "title": "slow" })))
        .gated("slow");
    let gate = loader.gate("slow");
    let outlet = Arc::new(Outlet::new(Arc::new(build_engine(loader))));
    let session = admin(&[]);

    let slow = {
        let outlet = outlet.clone();
        let session = session.clone();
        tokio::spawn(async move { outlet.navigate(&NavigationState::new("/slow"), &session).await })
    };
    gate.wait_started().await;
    assert_eq!(
        outlet.current_view(),
        View::Loading {
            fallback: "page_loading".to_string()
        }
    );

    let fast = outlet.navigate(&NavigationState::new("/home"), &session).await;
    assert!(matches!(fast, NavigationOutcome::Applied(View::Element { .. })));

    gate.release();
    assert_eq!(slow.await.unwrap(), NavigationOutcome::Stale);
    assert!(matches!(outlet.current_view(), View::Element { ref component, .. } if component.as_str() == "home"));
}

#[tokio::test]
async fn test_outlet_shows_route_fallback_while_loading() {
    let loader = common::MemoryLoader::new()
        .page("dashboard", common::schema(json!({})))
        .gated("dashboard");
    let gate = loader.gate("dashboard");
    let outlet = Arc::new(Outlet::new(Arc::new(build_engine(loader))));
    let mut views = outlet.subscribe();

    let nav = {
        let outlet = outlet.clone();
        tokio::spawn(async move { outlet.navigate(&NavigationState::new("/dashboard"), &admin(&[])).await })
    };
    gate.wait_started().await;
    assert_eq!(
        *views.borrow_and_update(),
        View::Loading {
            fallback: "dashboard_loading".to_string()
        }
    );

    gate.release();
    assert!(matches!(nav.await.unwrap(), NavigationOutcome::Applied(View::Schema { .. })));
    assert!(matches!(*views.borrow(), View::Schema { .. }));
}

#[tokio::test]
async fn test_anonymous_session_does_not_inherit_previous_permissions() {
    let loader = common::MemoryLoader::new().page("system/roles", common::schema(json!({ "title": "Roles" })));
    let engine = Engine::builder(&common::sample_config(false))
        .loader(Arc::new(loader))
        .presets(Arc::new(StaticPresetSource::new()))
        .build()
        .unwrap();

    let view = go(&engine, "/system/roles", &admin(&["roles"])).await;
    assert!(matches!(view, View::Schema { .. }));

    let view = go(&engine, "/system/roles", &Session::anonymous()).await;
    assert_eq!(
        view,
        View::NotFound {
            location: "/system/roles".to_string()
        }
    );
    assert_eq!(engine.permissions(), PermissionSet::default());
}

#[tokio::test]
async fn test_ancestor_kept_for_child_is_not_navigable() {
    let loader = common::MemoryLoader::new()
        .page("audit", common::schema(json!({ "title": "Audit" })))
        .page("audit/log", common::schema(json!({ "title": "Log" })));
    let engine = Engine::builder(&common::sample_config(true))
        .loader(Arc::new(loader))
        .presets(Arc::new(StaticPresetSource::new()))
        .routes(vec![RouteNode::new("/audit")
            .with_permissions(["audit:view"])
            .with_exact(true)
            .with_children(vec![RouteNode::new("/audit/log").with_permissions(["audit:log"])])])
        .build()
        .unwrap();
    let session = admin(&["audit:log"]);

    assert_eq!(
        go(&engine, "/audit", &session).await,
        View::NotFound {
            location: "/audit".to_string()
        }
    );
    let View::Schema { props } = go(&engine, "/audit/log", &session).await else {
        panic!("expected the log page");
    };
    assert_eq!(props["schema"]["title"], json!("Log"));
    // Still part of the tree for menu grouping.
    assert_eq!(engine.authorized_tree().len(), 2);
}

#[tokio::test]
async fn test_menu_route_without_suspense_has_no_loading_view() {
    let engine = build_engine(common::MemoryLoader::new());
    let session = admin(&["roles"]);

    let view = go(&engine, "/system/roles", &session).await;
    assert!(matches!(view, View::Failure { scope: FaultScope::App, .. }));
    assert_eq!(engine.loading_view("/system/roles"), None);
    assert!(engine.loading_view("/dashboard").is_some());
}
