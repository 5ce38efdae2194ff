//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Flatten the authorized tree into navigable entries
//! - Leave scaffold nodes (kept only for a permitted descendant) unregistered
//! - Look up the matching entry for a location
//! - Return matched entry or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declaration order (acceptable for admin menus)
//! - First match wins, like a switch over registered routes
//! - Explicit None rather than silent default

use std::fmt;

use crate::routing::matcher::{self, Matcher, RouteParams};
use crate::routing::path::route_path;
use crate::routing::tree::{each_tree, AuthorizedRouteTree, RouteNode};

/// A navigable route registered in the table.
pub struct RouteEntry {
    /// The declared node (without children).
    pub route: RouteNode,
    /// Route path with the base prefix applied.
    pub full_path: String,
    matcher: Box<dyn Matcher>,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("full_path", &self.full_path)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Compiled, ordered route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Register every navigable node of the tree, in pre-order.
    pub fn from_tree(tree: &AuthorizedRouteTree, base: &str) -> Self {
        let mut entries = Vec::new();
        each_tree(&tree.roots, &mut |node, _| {
            if node.scaffold || !node.route.is_navigable() {
                return;
            }
            let full_path = route_path(base, &node.route.path);
            let matcher = matcher::compile(&full_path, node.route.matches_exact());
            entries.push(RouteEntry {
                route: node.route.clone(),
                full_path,
                matcher,
            });
        });

        tracing::debug!(routes = entries.len(), "Route table compiled");
        Self { entries }
    }

    /// First entry matching the location, with captured params.
    pub fn match_location(&self, location: &str) -> Option<(&RouteEntry, RouteParams)> {
        self.entries
            .iter()
            .find_map(|entry| entry.matcher.captures(location).map(|params| (entry, params)))
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
