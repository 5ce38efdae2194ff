//! Lazy page module loading.
//!
//! # Data Flow
//! ```text
//! Matched route without an override component
//!     → lazy.rs: LazyPage::new(page_ref, loader)   (one per navigation)
//!     → PageLoader::load(page_ref)                  (suspension point)
//!     → module.rs: PageModule → PageSource
//!         default export is a component → PageSource::Component
//!         otherwise                     → PageSource::Schema (content + schema)
//!     → render dispatcher
//!
//! On failure:
//!     LoadError → page-scoped fault boundary (View::Failure)
//! ```
//!
//! # Design Decisions
//! - A LazyPage loads at most once; concurrent awaiters share that load
//! - Never reused across navigations, so stale modules cannot leak
//! - No timeout and no retry: a load settles or stays pending

pub mod lazy;
pub mod module;

pub use lazy::{LazyPage, LoadState};
pub use module::{DirPageLoader, LoadError, ModuleDefault, PageLoader, PageModule, PageSource, SchemaProps};
