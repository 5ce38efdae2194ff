//! Load-once page resolver.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::loader::module::{LoadError, PageLoader, PageSource};
use crate::observability::metrics;

/// Where a LazyPage stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// Resolves one page module, at most once.
///
/// Create one per route instance (navigation); every caller of [`resolve`]
/// shares the same single load and sees the same outcome.
///
/// [`resolve`]: LazyPage::resolve
pub struct LazyPage {
    page_ref: String,
    loader: Arc<dyn PageLoader>,
    cell: OnceCell<Result<PageSource, LoadError>>,
}

impl fmt::Debug for LazyPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPage")
            .field("page_ref", &self.page_ref)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl LazyPage {
    pub fn new(page_ref: impl Into<String>, loader: Arc<dyn PageLoader>) -> Self {
        Self {
            page_ref: page_ref.into(),
            loader,
            cell: OnceCell::new(),
        }
    }

    pub fn page_ref(&self) -> &str {
        &self.page_ref
    }

    /// Suspend until the module settles.
    pub async fn resolve(&self) -> Result<PageSource, LoadError> {
        self.cell
            .get_or_init(|| async {
                tracing::debug!(page_ref = %self.page_ref, "Loading page module");
                match self.loader.load(&self.page_ref).await {
                    Ok(module) => {
                        metrics::record_page_load("ok");
                        Ok(module.into_source())
                    }
                    Err(e) => {
                        metrics::record_page_load("error");
                        tracing::error!(page_ref = %self.page_ref, error = %e, "Page module failed to load");
                        Err(e)
                    }
                }
            })
            .await
            .clone()
    }

    pub fn state(&self) -> LoadState {
        match self.cell.get() {
            None => LoadState::Pending,
            Some(Ok(_)) => LoadState::Ready,
            Some(Err(_)) => LoadState::Failed,
        }
    }
}
