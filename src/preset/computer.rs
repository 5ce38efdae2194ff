//! Preset derivation and memoization.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::preset::source::PresetSource;
use crate::preset::types::{Preset, PresetKey};

/// Identity of a route: explicit `nodePath`, else `pathToComponent`, else `path`,
/// with empty and `:param` segments dropped. The root is `index`.
pub fn get_node_path(key: &PresetKey) -> String {
    let raw = key
        .node_path
        .as_deref()
        .or(key.path_to_component.as_deref())
        .unwrap_or(&key.path);

    let identity = raw
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with(':'))
        .collect::<Vec<_>>()
        .join("/");

    if identity.is_empty() {
        "index".to_string()
    } else {
        identity
    }
}

/// Compute the preset of one route. Pure given the key and the source.
pub fn derive_preset(source: &dyn PresetSource, key: &PresetKey, mock_enabled: bool) -> Preset {
    let mock_source = if mock_enabled {
        source.page_mock_source(key)
    } else {
        None
    };
    let mut preset = source.page_preset(key).unwrap_or_default();
    preset.node_path = get_node_path(key);

    if let Some(mocks) = &mock_source {
        for (name, api) in preset.apis.iter_mut() {
            if !api.wants_mock() {
                continue;
            }
            let payload = match mocks.get(&api.url) {
                Some(entry) if !entry.is_null() => entry.clone(),
                _ => Value::Object(mocks.clone()),
            };
            tracing::trace!(api = %name, url = %api.url, "Mock source injected");
            api.mock_source = Some(payload);
        }
    }
    preset.mock_source = mock_source;
    preset
}

/// Memoizing preset computer.
pub struct PresetComputer {
    source: Arc<dyn PresetSource>,
    mock_enabled: bool,
    cache: DashMap<PresetKey, Arc<Preset>>,
}

impl PresetComputer {
    pub fn new(source: Arc<dyn PresetSource>, mock_enabled: bool) -> Self {
        Self {
            source,
            mock_enabled,
            cache: DashMap::new(),
        }
    }

    /// Preset for `key`, derived on first use and cached afterwards.
    pub fn compute(&self, key: &PresetKey) -> Arc<Preset> {
        if let Some(hit) = self.cache.get(key) {
            return hit.value().clone();
        }
        let preset = Arc::new(derive_preset(self.source.as_ref(), key, self.mock_enabled));
        self.cache
            .entry(key.clone())
            .or_insert(preset)
            .value()
            .clone()
    }

    /// Drop every cached preset.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::source::StaticPresetSource;
    use crate::preset::types::{ApiDef, MockSource};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mocks() -> MockSource {
        match json!({ "/api/users": { "items": [1, 2] }, "/api/roles": null }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn preset_with_apis() -> Preset {
        let mut preset = Preset::default();
        preset.apis.insert("list".into(), ApiDef { mock: Some(true), ..ApiDef::new("/api/users") });
        preset.apis.insert("roles".into(), ApiDef { mock: Some(true), ..ApiDef::new("/api/roles") });
        preset.apis.insert("plain".into(), ApiDef::new("/api/users"));
        preset.apis.insert(
            "own".into(),
            ApiDef {
                mock: Some(true),
                mock_source: Some(json!("mine")),
                ..ApiDef::new("/api/users")
            },
        );
        preset
    }

    #[test]
    fn test_node_path_derivation() {
        assert_eq!(get_node_path(&PresetKey::new("/system/users/:id")), "system/users");
        assert_eq!(get_node_path(&PresetKey::new("/")), "index");
        let key = PresetKey {
            path: "/a".into(),
            path_to_component: Some("pages/b".into()),
            node_path: None,
        };
        assert_eq!(get_node_path(&key), "pages/b");
        let key = PresetKey {
            node_path: Some("explicit".into()),
            ..key
        };
        assert_eq!(get_node_path(&key), "explicit");
    }

    #[test]
    fn test_missing_preset_yields_identity_only() {
        let preset = derive_preset(&StaticPresetSource::new(), &PresetKey::new("/users"), true);
        assert_eq!(preset, Preset::with_node_path("users"));
    }

    #[test]
    fn test_mock_backfill() {
        let source = StaticPresetSource::new()
            .with_preset("/users", preset_with_apis())
            .with_mock("/users", mocks());
        let preset = derive_preset(&source, &PresetKey::new("/users"), true);

        assert_eq!(preset.apis["list"].mock_source, Some(json!({ "items": [1, 2] })));
        // null entry falls back to the whole mock source
        assert_eq!(preset.apis["roles"].mock_source, Some(Value::Object(mocks())));
        assert_eq!(preset.apis["plain"].mock_source, None);
        assert_eq!(preset.apis["own"].mock_source, Some(json!("mine")));
        assert_eq!(preset.mock_source, Some(mocks()));
    }

    #[test]
    fn test_mock_disabled_skips_mock_source() {
        let source = StaticPresetSource::new()
            .with_preset("/users", preset_with_apis())
            .with_mock("/users", mocks());
        let preset = derive_preset(&source, &PresetKey::new("/users"), false);
        assert_eq!(preset.apis["list"].mock_source, None);
        assert_eq!(preset.mock_source, None);
    }

    struct CountingSource(AtomicUsize);

    impl PresetSource for CountingSource {
        fn page_mock_source(&self, _key: &PresetKey) -> Option<MockSource> {
            None
        }

        fn page_preset(&self, _key: &PresetKey) -> Option<Preset> {
            self.0.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    #[test]
    fn test_compute_is_memoized_per_key() {
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));
        let computer = PresetComputer::new(source.clone(), false);

        let a1 = computer.compute(&PresetKey::new("/a"));
        let a2 = computer.compute(&PresetKey::new("/a"));
        let _b = computer.compute(&PresetKey::new("/b"));

        assert!(Arc::ptr_eq(&a1, &a2));
        assert_eq!(source.0.load(Ordering::SeqCst), 2);
        assert_eq!(computer.cached(), 2);

        computer.clear();
        let _ = computer.compute(&PresetKey::new("/a"));
        assert_eq!(source.0.load(Ordering::SeqCst), 3);
    }
}
