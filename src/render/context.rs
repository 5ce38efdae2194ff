//! Preset context handed to everything rendered under a route.

use std::fmt;
use std::sync::Arc;

use crate::preset::Preset;
use crate::security::permissions::{LimitChecker, LimitContext, LimitOptions, PermissionError, PermissionSet};

/// The preset of the rendered route plus a permission check scoped to it.
///
/// This is the only channel descendants use to read routing identity or ask
/// permission questions.
#[derive(Clone)]
pub struct PresetContext {
    preset: Arc<Preset>,
    permissions: PermissionSet,
    checker: Arc<dyn LimitChecker>,
}

impl fmt::Debug for PresetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetContext")
            .field("preset", &self.preset)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

impl PresetContext {
    pub fn new(preset: Arc<Preset>, permissions: PermissionSet, checker: Arc<dyn LimitChecker>) -> Self {
        Self {
            preset,
            permissions,
            checker,
        }
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn node_path(&self) -> &str {
        &self.preset.node_path
    }

    /// Check `keys` for the current principal.
    ///
    /// The check is scoped to this route's `nodePath` unless `options` names
    /// another one.
    pub fn check_limit<K: AsRef<str>>(&self, keys: &[K], options: LimitOptions) -> Result<bool, PermissionError> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        let options = LimitOptions {
            node_path: options.node_path.or_else(|| Some(self.preset.node_path.clone())),
            mode: options.mode,
        };
        let ctx = LimitContext::with_options(&self.permissions, &options);
        self.checker.check_limit_by_keys(&keys, &ctx)
    }
}
