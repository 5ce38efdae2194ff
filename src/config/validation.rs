//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Detect literal routes that collide on the same preset identity
//! - Reject nodes that declare both an override and a page module
//! - Check `:param` segments and the guard routes are well formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::preset::get_node_path;
use crate::routing::matcher::has_param;
use crate::routing::tree::{each_tree, RouteNode};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("routes '{first}' and '{second}' share preset identity '{node_path}'")]
    DuplicateIdentity {
        node_path: String,
        first: String,
        second: String,
    },

    #[error("route '{path}' sets both component and pathToComponent")]
    ConflictingSource { path: String },

    #[error("route '{path}' has malformed parameter segment '{segment}'")]
    MalformedParam { path: String, segment: String },

    #[error("{field} '{value}' must start with '/'")]
    RelativeRoute { field: &'static str, value: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("login_route", &config.app.login_route),
        ("not_found_route", &config.app.not_found_route),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativeRoute {
                field,
                value: value.clone(),
            });
        }
    }

    let mut identities: HashMap<String, String> = HashMap::new();
    each_tree(&config.routes, &mut |node: &RouteNode, _| {
        if node.component.is_some() && node.path_to_component.is_some() {
            errors.push(ValidationError::ConflictingSource {
                path: node.path.clone(),
            });
        }

        for segment in node.path.split('/').filter(|s| s.contains(':')) {
            let name = segment.strip_prefix(':').unwrap_or("");
            if name.is_empty() || name.contains(':') {
                errors.push(ValidationError::MalformedParam {
                    path: node.path.clone(),
                    segment: segment.to_string(),
                });
            }
        }

        // Param routes legitimately share their parent's identity.
        if !node.is_navigable() || has_param(&node.path) {
            return;
        }
        let node_path = get_node_path(&node.preset_key());
        match identities.get(&node_path) {
            Some(first) if *first != node.path => {
                errors.push(ValidationError::DuplicateIdentity {
                    node_path,
                    first: first.clone(),
                    second: node.path.clone(),
                });
            }
            Some(_) => {}
            None => {
                identities.insert(node_path, node.path.clone());
            }
        }
    });

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
