//! Permission filtering of the declared route tree.
//!
//! # Responsibilities
//! - Evaluate each node's own permission keys against the predicate
//! - Keep a node if it or any descendant is accessible
//! - Produce a new AuthorizedRouteTree, leaving the declared tree untouched
//!
//! # Design Decisions
//! - Depth-first, declaration order preserved (menu order = route order)
//! - Nodes with no keys are always accessible
//! - The first predicate error aborts the pass; no partial tree is returned

use crate::observability::metrics;
use crate::routing::tree::{AuthorizedNode, AuthorizedRouteTree, RouteNode};
use crate::security::permissions::{LimitChecker, LimitContext, PermissionError, PermissionSet};

/// Prune `declared` down to what `permissions` can see.
pub fn filter_routes(
    declared: &[RouteNode],
    permissions: &PermissionSet,
    checker: &dyn LimitChecker,
) -> Result<AuthorizedRouteTree, PermissionError> {
    let ctx = LimitContext::new(permissions);
    let roots = filter_level(declared, checker, &ctx)?;
    let tree = AuthorizedRouteTree { roots };

    metrics::record_filter_run(tree.len());
    tracing::debug!(
        permissions = permissions.len(),
        authorized_nodes = tree.len(),
        "Route tree filtered"
    );
    Ok(tree)
}

fn filter_level(
    nodes: &[RouteNode],
    checker: &dyn LimitChecker,
    ctx: &LimitContext<'_>,
) -> Result<Vec<AuthorizedNode>, PermissionError> {
    let mut kept = Vec::new();
    for node in nodes {
        if let Some(authorized) = filter_node(node, checker, ctx)? {
            kept.push(authorized);
        }
    }
    Ok(kept)
}

fn filter_node(
    node: &RouteNode,
    checker: &dyn LimitChecker,
    ctx: &LimitContext<'_>,
) -> Result<Option<AuthorizedNode>, PermissionError> {
    let permitted = node.permission_keys.is_empty()
        || checker.check_limit_by_keys(&node.permission_keys, ctx)?;
    let children = filter_level(&node.children, checker, ctx)?;

    if !permitted && children.is_empty() {
        return Ok(None);
    }

    Ok(Some(AuthorizedNode {
        route: node.shallow(),
        scaffold: !permitted,
        children,
    }))
}
