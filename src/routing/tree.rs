//! Route tree model.
//!
//! # Responsibilities
//! - Declared route nodes as read from configuration
//! - The authorized (permission filtered) view of that tree
//! - Allocation-free depth-first traversal shared by both
//!
//! # Design Decisions
//! - Children are strictly owned; no shared nodes, no cycles
//! - The authorized tree is a separate value, never a mutated declared tree
//! - `exact` is tri-state: unset means "guard as exact, match as prefix"

use serde::{Deserialize, Serialize};

use crate::preset::PresetKey;
use crate::render::ComponentKey;

/// Navigation-only metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_class_name: Option<String>,
}

/// One entry in the declared route tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteNode {
    /// Path pattern, may hold `:param` placeholders. Empty for grouping nodes.
    pub path: String,

    /// Exact matching. Unset is guarded as exact but matched as a prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,

    /// Explicit override component, rendered verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentKey>,

    /// Page module reference. Defaults to `path` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_to_component: Option<String>,

    /// Explicit preset identity override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_path: Option<String>,

    /// Permission keys required to view this node.
    #[serde(alias = "limits", skip_serializing_if = "Vec::is_empty")]
    pub permission_keys: Vec<String>,

    /// Participates in permission computation, never registered as a route.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub limit_only: bool,

    /// Wrap the page in its own loading/fault boundary. Unset means true for
    /// standalone routes and false for menu routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_suspense: Option<bool>,

    /// Loading view label shown while the page module resolves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuMeta>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Create a node for `path` with every other field unset.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_permissions<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permission_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_component(mut self, key: impl Into<String>) -> Self {
        self.component = Some(ComponentKey::new(key));
        self
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = Some(exact);
        self
    }

    pub fn limit_only(mut self) -> Self {
        self.limit_only = true;
        self
    }

    /// Whether the exact-location guard applies.
    pub fn is_exact(&self) -> bool {
        self.exact.unwrap_or(true)
    }

    /// Whether the route table matches this node exactly.
    pub fn matches_exact(&self) -> bool {
        self.exact.unwrap_or(false)
    }

    /// Whether the page gets its own loading view and page-scoped failures.
    pub fn suspends(&self) -> bool {
        self.with_suspense.unwrap_or(self.menu.is_none())
    }

    /// Module reference used by the page loader.
    pub fn page_ref(&self) -> &str {
        self.path_to_component.as_deref().unwrap_or(&self.path)
    }

    /// Whether this node is registered as a navigable route.
    pub fn is_navigable(&self) -> bool {
        !self.path.is_empty() && !self.limit_only
    }

    /// Identity triple for preset computation.
    pub fn preset_key(&self) -> PresetKey {
        PresetKey {
            path: self.path.clone(),
            path_to_component: self.path_to_component.clone(),
            node_path: self.node_path.clone(),
        }
    }

    /// Copy of this node without its children.
    pub fn shallow(&self) -> RouteNode {
        RouteNode {
            children: Vec::new(),
            ..self.clone()
        }
    }
}

/// A node of the authorized tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizedNode {
    /// The declared node, without its children.
    pub route: RouteNode,
    /// Kept only because a descendant is accessible.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub scaffold: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AuthorizedNode>,
}

/// Subset of the declared tree visible to the current principal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AuthorizedRouteTree {
    pub roots: Vec<AuthorizedNode>,
}

impl AuthorizedRouteTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        let mut count = 0;
        each_tree(&self.roots, &mut |_, _| count += 1);
        count
    }

    /// Rebuild a declared tree from this one.
    pub fn to_declared(&self) -> Vec<RouteNode> {
        fn rebuild(node: &AuthorizedNode) -> RouteNode {
            RouteNode {
                children: node.children.iter().map(rebuild).collect(),
                ..node.route.clone()
            }
        }
        self.roots.iter().map(rebuild).collect()
    }
}

/// Anything with ordered owned children.
pub trait TreeNode: Sized {
    fn children(&self) -> &[Self];
}

impl TreeNode for RouteNode {
    fn children(&self) -> &[Self] {
        &self.children
    }
}

impl TreeNode for AuthorizedNode {
    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Depth-first, pre-order visit of every node with its depth.
pub fn each_tree<N: TreeNode>(nodes: &[N], visit: &mut impl FnMut(&N, usize)) {
    fn walk<N: TreeNode>(nodes: &[N], depth: usize, visit: &mut impl FnMut(&N, usize)) {
        for node in nodes {
            visit(node, depth);
            walk(node.children(), depth + 1, visit);
        }
    }
    walk(nodes, 0, visit);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_tree_preorder() {
        let tree = vec![
            RouteNode::new("/a").with_children(vec![RouteNode::new("/a/1"), RouteNode::new("/a/2")]),
            RouteNode::new("/b"),
        ];
        let mut seen = Vec::new();
        each_tree(&tree, &mut |node: &RouteNode, depth| seen.push((node.path.clone(), depth)));
        assert_eq!(
            seen,
            vec![
                ("/a".to_string(), 0),
                ("/a/1".to_string(), 1),
                ("/a/2".to_string(), 1),
                ("/b".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let node = RouteNode::new("/users");
        assert!(node.is_exact());
        assert!(!node.matches_exact());
        assert_eq!(node.page_ref(), "/users");
        assert!(node.is_navigable());
        assert!(!RouteNode::new("").is_navigable());
        assert!(!RouteNode::new("/x").limit_only().is_navigable());
    }

    #[test]
    fn test_suspense_defaults_by_menu() {
        let mut node = RouteNode::new("/users");
        assert!(node.suspends());

        node.menu = Some(MenuMeta::default());
        assert!(!node.suspends());

        node.with_suspense = Some(true);
        assert!(node.suspends());
    }

    #[test]
    fn test_deserialize_limits_alias() {
        let node: RouteNode = serde_json::from_str(
            r#"{"path":"/users","limits":["users:view"],"pathToComponent":"system/users","menu":{"label":"Users"}}"#,
        )
        .unwrap();
        assert_eq!(node.permission_keys, vec!["users:view"]);
        assert_eq!(node.page_ref(), "system/users");
        assert_eq!(node.menu.unwrap().label.as_deref(), Some("Users"));
    }
}
