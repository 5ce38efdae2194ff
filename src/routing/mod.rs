//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Declared RouteNode tree (from config)
//!     → security::filter (prune by permissions)
//!     → AuthorizedRouteTree
//!     → router.rs (flatten navigable nodes, compile matchers)
//!     → RouteTable (immutable, swapped as a whole)
//!
//! Navigation (location):
//!     → router.rs (first match wins, declaration order)
//!     → matcher.rs (literal or `:param` pattern)
//!     → Return: matched RouteEntry + params, or no match
//! ```
//!
//! # Design Decisions
//! - Route tables compiled from the authorized tree, never patched in place
//! - Declaration order is registration order; siblings are never reordered
//! - Matching is segment based and tolerant of trailing slashes
//! - Path strings are canonicalized by path.rs before comparison

pub mod matcher;
pub mod path;
pub mod router;
pub mod tree;

pub use router::{RouteEntry, RouteTable};
pub use tree::{AuthorizedNode, AuthorizedRouteTree, MenuMeta, RouteNode};
