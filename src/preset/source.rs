//! Page preset and mock data lookup.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::preset::types::{MockSource, Preset, PresetKey};

/// Lookup collaborator for page presets and page mock data.
pub trait PresetSource: Send + Sync {
    /// Mock data declared by the page, if any.
    fn page_mock_source(&self, key: &PresetKey) -> Option<MockSource>;

    /// Preset declared by the page, if any.
    fn page_preset(&self, key: &PresetKey) -> Option<Preset>;
}

/// In-memory presets keyed by page reference.
#[derive(Debug, Clone, Default)]
pub struct StaticPresetSource {
    presets: HashMap<String, Preset>,
    mocks: HashMap<String, MockSource>,
}

impl StaticPresetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preset(mut self, page_ref: impl Into<String>, preset: Preset) -> Self {
        self.presets.insert(page_key(&page_ref.into()), preset);
        self
    }

    pub fn with_mock(mut self, page_ref: impl Into<String>, mock: MockSource) -> Self {
        self.mocks.insert(page_key(&page_ref.into()), mock);
        self
    }
}

impl PresetSource for StaticPresetSource {
    fn page_mock_source(&self, key: &PresetKey) -> Option<MockSource> {
        self.mocks.get(&page_key(key.page_ref())).cloned()
    }

    fn page_preset(&self, key: &PresetKey) -> Option<Preset> {
        self.presets.get(&page_key(key.page_ref())).cloned()
    }
}

/// Reads `<pages>/<page>/preset.json` and `<pages>/<page>/mock.json`.
///
/// Missing files mean "no preset". Unreadable or malformed files are logged and
/// treated the same way.
#[derive(Debug, Clone)]
pub struct DirPresetSource {
    pages_dir: PathBuf,
}

impl DirPresetSource {
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        Self {
            pages_dir: pages_dir.into(),
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &PresetKey, file: &str) -> Option<T> {
        let path = self.pages_dir.join(page_key(key.page_ref())).join(file);
        read_optional_json(&path)
    }
}

impl PresetSource for DirPresetSource {
    fn page_mock_source(&self, key: &PresetKey) -> Option<MockSource> {
        self.read_json(key, "mock.json")
    }

    fn page_preset(&self, key: &PresetKey) -> Option<Preset> {
        self.read_json(key, "preset.json")
    }
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read page file");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse page file");
            None
        }
    }
}

/// Page directory for a page reference: `/system/users/` → `system/users`.
pub(crate) fn page_key(page_ref: &str) -> String {
    let trimmed = page_ref.trim_matches('/');
    if trimmed.is_empty() {
        "index".to_string()
    } else {
        trimmed.to_string()
    }
}
