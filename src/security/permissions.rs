//! Permission keys and the permission predicate.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key granting every permission.
pub const SUPER_KEY: &str = "*";

/// Raised by a permission predicate that cannot decide.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// The predicate failed while checking `keys`.
    #[error("Permission check failed for keys {keys:?}: {reason}")]
    Predicate { keys: Vec<String>, reason: String },
}

/// Set of permission keys held by the current principal.
///
/// Cheap to clone; read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    keys: Arc<BTreeSet<String>>,
}

impl PermissionSet {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Arc::new(keys.into_iter().map(Into::into).collect()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// True if the set holds the super key.
    pub fn is_super(&self) -> bool {
        self.contains(SUPER_KEY)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// How multiple keys combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every key must be granted.
    #[default]
    All,
    /// At least one key must be granted.
    Any,
}

/// Caller supplied options for a permission check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitOptions {
    /// Scope the check to a node identity.
    pub node_path: Option<String>,
    pub mode: MatchMode,
}

/// Everything a predicate sees for one check.
#[derive(Debug, Clone, Copy)]
pub struct LimitContext<'a> {
    pub permissions: &'a PermissionSet,
    pub node_path: Option<&'a str>,
    pub mode: MatchMode,
}

impl<'a> LimitContext<'a> {
    pub fn new(permissions: &'a PermissionSet) -> Self {
        Self {
            permissions,
            node_path: None,
            mode: MatchMode::All,
        }
    }

    pub fn with_options(permissions: &'a PermissionSet, options: &'a LimitOptions) -> Self {
        Self {
            permissions,
            node_path: options.node_path.as_deref(),
            mode: options.mode,
        }
    }
}

/// The permission predicate supplied by the authorization collaborator.
///
/// Must be synchronous. An `Err` is never treated as "denied": callers abort.
pub trait LimitChecker: Send + Sync {
    fn check_limit_by_keys(&self, keys: &[String], ctx: &LimitContext<'_>) -> Result<bool, PermissionError>;
}

impl<F> LimitChecker for F
where
    F: Fn(&[String], &LimitContext<'_>) -> Result<bool, PermissionError> + Send + Sync,
{
    fn check_limit_by_keys(&self, keys: &[String], ctx: &LimitContext<'_>) -> Result<bool, PermissionError> {
        self(keys, ctx)
    }
}

/// Grants a key if it is in the permission set, either bare or scoped to the
/// node identity as `<nodePath>/<key>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySetChecker;

impl KeySetChecker {
    fn granted(key: &str, ctx: &LimitContext<'_>) -> bool {
        if ctx.permissions.contains(key) {
            return true;
        }
        match ctx.node_path {
            Some(node_path) => ctx.permissions.contains(&format!("{node_path}/{key}")),
            None => false,
        }
    }
}

impl LimitChecker for KeySetChecker {
    fn check_limit_by_keys(&self, keys: &[String], ctx: &LimitContext<'_>) -> Result<bool, PermissionError> {
        if keys.is_empty() || ctx.permissions.is_super() {
            return Ok(true);
        }
        let allowed = match ctx.mode {
            MatchMode::All => keys.iter().all(|k| Self::granted(k, ctx)),
            MatchMode::Any => keys.iter().any(|k| Self::granted(k, ctx)),
        };
        Ok(allowed)
    }
}
