//! Origin HTTP client.
//!
//! # Responsibilities
//! - Hold the single origin base URL read at startup
//! - Map request paths onto origin URLs
//! - Share one connection pool between manifest fetches, passthrough and probes
//!
//! # Design Decisions
//! - Redirects are never followed: the client sees what the origin sent
//! - No request timeout on manifest/passthrough fetches; only probes time out

use reqwest::redirect::Policy;
use url::Url;

#[derive(Debug, Clone)]
pub struct OriginClient {
    base_url: Url,
    client: reqwest::Client,
}

impl OriginClient {
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Origin URL for a request path (and optional query), by concatenation
    /// onto the base so a base path prefix is kept.
    pub fn url_for(&self, path_and_query: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path_and_query.starts_with('/') {
            format!("{base}{path_and_query}")
        } else {
            format!("{base}/{path_and_query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(base: &str) -> OriginClient {
        OriginClient::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_url_for_joins_paths() {
        let origin = origin("https://origin.example");
        assert_eq!(
            origin.url_for("/out/v1/abc/index.m3u8"),
            "https://origin.example/out/v1/abc/index.m3u8"
        );
        assert_eq!(origin.url_for("seg.ts?x=1"), "https://origin.example/seg.ts?x=1");
    }

    #[test]
    fn test_url_for_keeps_base_prefix() {
        let origin = origin("https://origin.example/out/v1/");
        assert_eq!(
            origin.url_for("/index.m3u8"),
            "https://origin.example/out/v1/index.m3u8"
        );
    }
}
