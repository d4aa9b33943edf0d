//! Request matching logic.
//!
//! # Responsibilities
//! - Match the path's file extension against a fixed set
//! - Match the request method
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Extension matching is exact and case-sensitive
//! - The query string never takes part in matching
//! - No regex to guarantee O(n) matching

use axum::body::Body;
use axum::http::{Method, Request};

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches paths ending in `.<ext>` for any configured extension.
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    suffixes: Vec<String>,
}

impl ExtensionMatcher {
    /// Extensions are given without the leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: extensions
                .into_iter()
                .map(|ext| format!(".{}", ext.as_ref()))
                .collect(),
        }
    }

    pub fn matches_path(&self, path: &str) -> bool {
        self.suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
    }
}

impl Matcher for ExtensionMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matches_path(req.uri().path())
    }
}

/// Matches a single request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.method() == self.method
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().all(|m| m.matches(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::default())
            .unwrap()
    }

    #[test]
    fn test_extension_matcher() {
        let matcher = ExtensionMatcher::new(["m3u8", "mpd"]);

        assert!(matcher.matches(&request(Method::GET, "/out/v1/abc/index.m3u8")));
        assert!(matcher.matches(&request(Method::GET, "/live/manifest.mpd")));
        assert!(matcher.matches(&request(Method::GET, "/master.m3u8?_DASH_pathway=cdn-a")));
        assert!(!matcher.matches(&request(Method::GET, "/segment_001.ts")));
        assert!(!matcher.matches(&request(Method::GET, "/m3u8")));
        assert!(!matcher.matches(&request(Method::GET, "/index.M3U8")));
        assert!(!matcher.matches(&request(Method::GET, "/index.m3u8.bak")));
    }

    #[test]
    fn test_and_matcher() {
        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new(Method::GET)),
            Box::new(ExtensionMatcher::new(["m3u8"])),
        ]);

        assert!(matcher.matches(&request(Method::GET, "/index.m3u8")));
        assert!(!matcher.matches(&request(Method::POST, "/index.m3u8")));
        assert!(!matcher.matches(&request(Method::GET, "/index.ts")));
    }
}
