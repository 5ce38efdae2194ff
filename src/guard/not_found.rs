//! Not-found page resolution.

use std::sync::Arc;

use crate::config::schema::AppSettings;
use crate::loader::{LazyPage, PageLoader};
use crate::preset::PresetKey;
use crate::render::component::RouteProps;
use crate::render::context::PresetContext;
use crate::render::dispatcher::{Dispatcher, RenderSource};
use crate::render::view::View;

/// Page module reference used when no not-found page path is configured.
pub const DEFAULT_NOT_FOUND_PAGE: &str = "404";

/// The page shown for locations no route matches.
///
/// Prefers the site's override module; falls back to the built-in view when the
/// override cannot be loaded. The override is loaded once per engine.
#[derive(Debug)]
pub struct NotFoundPage {
    page: LazyPage,
}

impl NotFoundPage {
    pub fn new(app: &AppSettings, loader: Arc<dyn PageLoader>) -> Self {
        let page_ref = app
            .not_found_page_path
            .as_deref()
            .filter(|p| !p.trim_matches('/').is_empty())
            .unwrap_or(DEFAULT_NOT_FOUND_PAGE);
        Self {
            page: LazyPage::new(page_ref, loader),
        }
    }

    pub fn page_ref(&self) -> &str {
        self.page.page_ref()
    }

    /// Preset identity of the override page.
    pub fn preset_key(&self) -> PresetKey {
        PresetKey::new(self.page.page_ref())
    }

    pub async fn render(&self, location: &str, dispatcher: &Dispatcher, ctx: &PresetContext) -> View {
        match self.page.resolve().await {
            Ok(source) => {
                let props = RouteProps {
                    path: "*".to_string(),
                    location: location.to_string(),
                    ..RouteProps::default()
                };
                dispatcher.render(RenderSource::select(None, Some(source)), &props, ctx)
            }
            Err(e) => {
                tracing::debug!(page_ref = %self.page.page_ref(), error = %e, "Using built-in not-found page");
                View::NotFound {
                    location: location.to_string(),
                }
            }
        }
    }
}
