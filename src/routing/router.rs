//! Request classification.
//!
//! Auxiliary endpoints are matched by the axum router before this runs;
//! everything reaching the classifier is either a manifest to rewrite or
//! traffic to pass through untouched.

use axum::body::Body;
use axum::http::{Method, Request};

use crate::routing::matcher::{AndMatcher, ExtensionMatcher, Matcher, MethodMatcher};

/// Recognized manifest file extensions.
pub const MANIFEST_EXTENSIONS: [&str; 2] = ["m3u8", "mpd"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Fetch fully, rewrite, respond.
    Manifest,
    /// Forward byte-for-byte.
    Passthrough,
}

impl RouteKind {
    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Manifest => "manifest",
            RouteKind::Passthrough => "passthrough",
        }
    }
}

/// Classifies proxied requests by method and path suffix.
#[derive(Debug)]
pub struct Router {
    manifest: AndMatcher,
}

impl Router {
    pub fn new() -> Self {
        Self {
            manifest: AndMatcher::new(vec![
                Box::new(MethodMatcher::new(Method::GET)),
                Box::new(ExtensionMatcher::new(MANIFEST_EXTENSIONS)),
            ]),
        }
    }

    pub fn classify(&self, req: &Request<Body>) -> RouteKind {
        if self.manifest.matches(req) {
            RouteKind::Manifest
        } else {
            RouteKind::Passthrough
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
