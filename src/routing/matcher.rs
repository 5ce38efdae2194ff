//! Location matching logic.
//!
//! # Responsibilities
//! - Match a location against a literal route path
//! - Match a location against a `:param` pattern and capture params
//! - Support exact (full length) and prefix (leading segments) matching
//!
//! # Design Decisions
//! - Matching is case-sensitive and segment based
//! - Empty segments are ignored, so `/users/` matches `/users`
//! - A `:param` segment matches exactly one non-empty location segment
//! - No regex to guarantee O(n) matching

use std::collections::BTreeMap;

/// Params captured from `:name` pattern segments.
pub type RouteParams = BTreeMap<String, String>;

/// Trait for matching locations against a compiled route path.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured params if the location matches.
    fn captures(&self, location: &str) -> Option<RouteParams>;

    /// Returns true if the location matches this route path.
    fn matches(&self, location: &str) -> bool {
        self.captures(location).is_some()
    }
}

/// True if the pattern holds a parameter placeholder.
pub fn has_param(pattern: &str) -> bool {
    pattern.contains(':')
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Matches a route path with no placeholders.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    segments: Vec<String>,
    exact: bool,
}

impl LiteralMatcher {
    /// Create a new literal matcher.
    pub fn new(path: &str, exact: bool) -> Self {
        Self {
            segments: segments(path).map(str::to_string).collect(),
            exact,
        }
    }
}

impl Matcher for LiteralMatcher {
    fn captures(&self, location: &str) -> Option<RouteParams> {
        let actual: Vec<&str> = segments(location).collect();
        if actual.len() < self.segments.len() || (self.exact && actual.len() != self.segments.len()) {
            return None;
        }
        self.segments
            .iter()
            .zip(actual)
            .all(|(expected, got)| expected == got)
            .then(RouteParams::new)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PatternSegment {
    Literal(String),
    Param(String),
}

/// Matches a route path holding `:name` placeholders.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    segments: Vec<PatternSegment>,
    exact: bool,
}

impl PatternMatcher {
    /// Create a new pattern matcher.
    pub fn new(pattern: &str, exact: bool) -> Self {
        let segments = segments(pattern)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => PatternSegment::Param(name.to_string()),
                None => PatternSegment::Literal(s.to_string()),
            })
            .collect();
        Self { segments, exact }
    }
}

impl Matcher for PatternMatcher {
    fn captures(&self, location: &str) -> Option<RouteParams> {
        let actual: Vec<&str> = segments(location).collect();
        if actual.len() < self.segments.len() || (self.exact && actual.len() != self.segments.len()) {
            return None;
        }

        let mut params = RouteParams::new();
        for (expected, got) in self.segments.iter().zip(actual) {
            match expected {
                PatternSegment::Literal(lit) if lit != got => return None,
                PatternSegment::Literal(_) => {}
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), got.to_string());
                }
            }
        }
        Some(params)
    }
}

/// Compile the cheapest matcher for a route path.
pub fn compile(path: &str, exact: bool) -> Box<dyn Matcher> {
    if has_param(path) {
        Box::new(PatternMatcher::new(path, exact))
    } else {
        Box::new(LiteralMatcher::new(path, exact))
    }
}
