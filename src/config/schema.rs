//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::tree::RouteNode;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Route constants and guard settings.
    pub app: AppSettings,

    /// Mock data settings.
    pub mock: MockConfig,

    /// Page module locations.
    pub pages: PagesConfig,

    /// Declared route/menu tree.
    pub routes: Vec<RouteNode>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Route constants and guard settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppSettings {
    /// Prefix applied to every route path (e.g., "/admin/").
    pub base_route: String,

    /// Route anonymous sessions are sent to.
    pub login_route: String,

    /// Route unmatched exact locations are sent to.
    pub not_found_route: String,

    /// Page module of the site's not-found page (default: "404").
    pub not_found_page_path: Option<String>,

    /// Require a logged-in session for every menu route.
    pub require_login: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_route: "/".to_string(),
            login_route: "/login".to_string(),
            not_found_route: "/404".to_string(),
            not_found_page_path: None,
            require_login: true,
        }
    }
}

/// Mock data configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MockConfig {
    /// Resolve page mock sources into presets.
    pub enabled: bool,
}

/// Page module locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Directory holding one sub-directory per page.
    pub dir: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            dir: "pages".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
