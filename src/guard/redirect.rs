//! Redirect decisions.

use crate::config::schema::AppSettings;
use crate::render::view::{NavigationState, Redirect, RedirectState};
use crate::routing::matcher::has_param;
use crate::routing::path::route_path;
use crate::routing::tree::RouteNode;
use crate::security::auth::Session;

/// Send anonymous sessions to the login route, remembering where they were going.
pub fn private_guard(session: &Session, nav: &NavigationState, app: &AppSettings) -> Option<Redirect> {
    if !app.require_login || session.is_login() {
        return None;
    }

    let to = route_path(&app.base_route, &app.login_route);
    if nav.location == to {
        return None;
    }

    tracing::debug!(location = %nav.location, to = %to, "Login required");
    Some(Redirect {
        to,
        state: Some(RedirectState {
            from: nav.location.clone(),
        }),
    })
}

/// Redirect to the not-found route when an exact, literal route does not equal
/// the location.
pub fn exact_guard(route: &RouteNode, location: &str, app: &AppSettings) -> Option<Redirect> {
    let full_path = route_path(&app.base_route, &route.path);
    if !route.is_exact() || has_param(&full_path) || full_path == location {
        return None;
    }

    tracing::debug!(route = %full_path, location = %location, "Exact route mismatch");
    Some(Redirect {
        to: route_path(&app.base_route, &app.not_found_route),
        state: None,
    })
}
