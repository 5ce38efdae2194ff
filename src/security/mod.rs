//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Declared route tree + PermissionSet:
//!     → permissions.rs (LimitChecker predicate per node)
//!     → filter.rs (prune, keep ancestors of accessible nodes)
//!     → AuthorizedRouteTree
//!
//! Navigation:
//!     → auth.rs (Session: is the principal logged in?)
//!     → guard subsystem decides redirects
//! ```
//!
//! # Design Decisions
//! - Fail fast: a failing predicate aborts the whole filtering pass
//! - No permission inheritance; ancestors are structural scaffolding only
//! - Permission sets are immutable values; changes produce a new tree

pub mod auth;
pub mod filter;
pub mod permissions;

pub use auth::Session;
pub use filter::filter_routes;
pub use permissions::{
    KeySetChecker, LimitChecker, LimitContext, LimitOptions, MatchMode, PermissionError, PermissionSet,
};
