//! Route / preset / permission resolution engine for admin applications.
//!
//! A declared route tree is filtered by the principal's permissions, matched
//! against the current location, guarded, and rendered through one of three
//! strategies (override component, lazily loaded page module, or schema hand-off)
//! with a per-route preset injected into the rendered subtree.

pub mod config;
pub mod engine;
pub mod error;
pub mod guard;
pub mod loader;
pub mod menu;
pub mod observability;
pub mod preset;
pub mod render;
pub mod routing;
pub mod security;

pub use config::schema::AppConfig;
pub use engine::{Engine, Outlet};
pub use error::Error;
