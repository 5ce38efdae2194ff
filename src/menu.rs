//! Navigation menu derived from the authorized tree.
//!
//! Nodes without menu metadata are not listed; their labelled descendants are
//! lifted to the node's level. `limitOnly` nodes never appear.

use serde::Serialize;

use crate::routing::path::route_path;
use crate::routing::tree::{AuthorizedNode, AuthorizedRouteTree};

/// Badge class used when a node sets a badge but no class.
pub const DEFAULT_BADGE_CLASS: &str = "bg-info";

/// One entry of the aside navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub badge_class: String,
    /// Prefixed route path; `None` for grouping entries.
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn is_active(&self, location: &str) -> bool {
        self.link.as_deref() == Some(location)
    }

    /// True if this item or any child is active.
    pub fn contains_active(&self, location: &str) -> bool {
        self.is_active(location) || self.children.iter().any(|c| c.contains_active(location))
    }
}

/// Build the menu, in declaration order.
pub fn build_menu(tree: &AuthorizedRouteTree, base: &str) -> Vec<MenuItem> {
    let mut items = Vec::new();
    for node in &tree.roots {
        collect(node, base, &mut items);
    }
    items
}

fn collect(node: &AuthorizedNode, base: &str, out: &mut Vec<MenuItem>) {
    if node.route.limit_only {
        return;
    }

    let mut children = Vec::new();
    for child in &node.children {
        collect(child, base, &mut children);
    }

    let Some(meta) = &node.route.menu else {
        out.extend(children);
        return;
    };

    out.push(MenuItem {
        label: meta.label.clone(),
        icon: meta.icon.clone(),
        badge: meta.badge.clone(),
        badge_class: meta
            .badge_class_name
            .clone()
            .unwrap_or_else(|| DEFAULT_BADGE_CLASS.to_string()),
        link: (!node.route.path.is_empty()).then(|| route_path(base, &node.route.path)),
        children,
    });
}
