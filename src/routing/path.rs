//! Path canonicalization and module location lookup.
//!
//! # Responsibilities
//! - Join url/path segments into one canonical string
//! - Prefix route paths with the configured base route
//! - Locate installed library directories from an ordered candidate list
//!
//! # Design Decisions
//! - No regex: every rewrite is a single scan over the string
//! - Loosely typed input (JSON) is checked up front, before any joining
//! - Module lookup reports every candidate it tried on failure

use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Errors from path normalization and module lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    /// A segment of loosely typed input was not a string.
    #[error("Url must be a string. Received {kind} at segment {index}")]
    NotAString { index: usize, kind: &'static str },

    /// No segments were given.
    #[error("At least one url segment is required")]
    Empty,

    /// A required module was not found in any candidate location.
    #[error("Can not find path: {lib}.\nSearched paths:\n{}", join_paths(.searched))]
    ModuleNotFound { lib: String, searched: Vec<PathBuf> },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join segments into one canonical url or path.
///
/// A bare protocol first segment (`http://`) is merged with the next one, empty
/// segments are skipped, separators between segments collapse to one, only the
/// last segment keeps a trailing `/`, and every query block is merged into a
/// single `?`-prefixed, `&`-joined one.
///
/// ```
/// use preset_router::routing::path::normalize_url;
///
/// let url = normalize_url(&["http://", "a/", "/b/", "?x=1", "?y=2"]).unwrap();
/// assert_eq!(url, "http://a/b?x=1&y=2");
/// ```
pub fn normalize_url<S: AsRef<str>>(segments: &[S]) -> Result<String, PathError> {
    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    let urls = segments.iter().map(|s| s.as_ref().to_string()).collect();
    Ok(join_segments(urls))
}

/// Same as [`normalize_url`] for segments coming from JSON (config files, CLI).
///
/// Every segment is checked before joining; the first non-string one fails.
pub fn normalize_value_segments(segments: &[Value]) -> Result<String, PathError> {
    let urls = segments
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(s) => Ok(s.as_str()),
            other => Err(PathError::NotAString {
                index,
                kind: json_kind(other),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    normalize_url(&urls)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Prefix a route path with the app's base route.
///
/// `route_path("/admin/", "/users")` is `/admin/users`; an empty path yields the
/// base route itself.
pub fn route_path(base: &str, path: &str) -> String {
    join_segments(vec!["/".to_string(), base.to_string(), path.to_string()])
}

fn join_segments(mut urls: Vec<String>) -> String {
    if urls.len() > 1 && is_bare_protocol(&urls[0]) {
        let first = urls.remove(0);
        urls[0] = format!("{first}{}", urls[0]);
    }
    urls[0] = fix_scheme_slashes(&urls[0]);

    let last = urls.len() - 1;
    let mut parts: Vec<String> = Vec::with_capacity(urls.len());
    for (i, raw) in urls.iter().enumerate() {
        if raw.is_empty() {
            continue;
        }
        let component = if i > 0 {
            raw.trim_start_matches('/')
        } else {
            raw.as_str()
        };
        let trimmed = component.trim_end_matches('/');
        if i == last && trimmed.len() != component.len() {
            parts.push(format!("{trimmed}/"));
        } else {
            parts.push(trimmed.to_string());
        }
    }

    let joined = strip_slash_before_query(&parts.join("/"));

    let mut pieces = joined.split('?');
    let mut out = pieces.next().unwrap_or_default().to_string();
    let params: Vec<&str> = pieces.collect();
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }

    if out.starts_with('/') {
        format!("/{}", out.trim_start_matches('/'))
    } else {
        out
    }
}

/// `scheme:` optionally followed by slashes and nothing else.
fn is_bare_protocol(segment: &str) -> bool {
    match segment.find(':') {
        Some(idx) if idx > 0 => {
            !segment[..idx].contains('/') && segment[idx + 1..].chars().all(|c| c == '/')
        }
        _ => false,
    }
}

/// `file:` urls get three slashes when they already had three, others get two.
fn fix_scheme_slashes(segment: &str) -> String {
    let Some(idx) = segment.find(':') else {
        return segment.to_string();
    };
    let scheme = &segment[..idx];
    if scheme.is_empty() || scheme.contains('/') {
        return segment.to_string();
    }
    let rest = segment[idx + 1..].trim_start_matches('/');
    let slashes = if segment.starts_with("file:///") { ":///" } else { "://" };
    format!("{scheme}{slashes}{rest}")
}

fn strip_slash_before_query(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '/' {
            match chars.get(i + 1) {
                Some('?') | Some('&') => {
                    i += 1;
                    continue;
                }
                Some('#') => {
                    if let Some(&next) = chars.get(i + 2) {
                        if next != '!' {
                            out.push('#');
                            out.push(next);
                            i += 3;
                            continue;
                        }
                    }
                }
                _ => {}
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Where to look for installed libraries.
#[derive(Debug, Clone)]
pub struct LocateOptions {
    /// Package scope used for `lib/<name>` references (`@<scope>/<name>`).
    pub scope: String,
    /// Root of a development checkout, searched after the site locations.
    pub dev_root: Option<PathBuf>,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            scope: "preset-router".to_string(),
            dev_root: None,
        }
    }
}

/// Ordered list of candidate locations for `lib`, relative to `site_dir`.
pub fn module_candidates(site_dir: &Path, lib: &str, options: &LocateOptions) -> Vec<PathBuf> {
    let lib_name = lib.strip_prefix("lib/");
    let prod_path = match lib_name {
        Some(name) => format!("node_modules/@{}/{}", options.scope, name),
        None => format!("node_modules/{lib}"),
    };

    let mut candidates = vec![
        site_dir.join(&prod_path),
        lexical_resolve(&site_dir.join("../..").join(&prod_path)),
        lexical_resolve(&site_dir.join("../../../..").join(&prod_path)),
    ];

    if let Some(dev_root) = &options.dev_root {
        candidates.push(dev_root.join(&prod_path));
        if let Some(name) = lib_name {
            candidates.push(dev_root.join("packages").join(name));
        }
    }

    candidates
}

/// Return the first existing candidate location for `lib`.
///
/// With `required`, a miss is an error listing every searched path; otherwise
/// it is `Ok(None)`.
pub fn locate_module(
    site_dir: &Path,
    lib: &str,
    required: bool,
    options: &LocateOptions,
) -> Result<Option<PathBuf>, PathError> {
    let candidates = module_candidates(site_dir, lib, options);

    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        tracing::debug!(lib = %lib, path = %found.display(), "Module located");
        return Ok(Some(found.clone()));
    }

    if required {
        return Err(PathError::ModuleNotFound {
            lib: lib.to_string(),
            searched: candidates,
        });
    }
    Ok(None)
}

/// Resolve `..` and `.` without touching the filesystem.
fn lexical_resolve(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
