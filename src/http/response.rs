//! Response handling and transformation.
//!
//! # Responsibilities
//! - Rebuild origin responses for the client
//! - Strip hop-by-hop headers in both directions
//! - Recompute `content-length` after a manifest rewrite
//!
//! # Design Decisions
//! - Passthrough bodies stream; only manifests are buffered
//! - Every other origin header is forwarded unchanged

use axum::body::Body;
use axum::http::header::{CONNECTION, CONTENT_LENGTH};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Assemble a response from origin parts and a (possibly streaming) body.
pub fn from_origin(status: StatusCode, mut headers: HeaderMap, body: Body) -> Response {
    strip_hop_by_hop(&mut headers);
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Response for a rewritten manifest. `content-length` always describes
/// the rewritten bytes.
pub fn rewritten_manifest(status: StatusCode, mut headers: HeaderMap, body: Bytes) -> Response {
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    from_origin(status, headers, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hop_by_hop_and_connection_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("close, x-trace-hop"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("cache-control", HeaderValue::from_static("max-age=2"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 1);
        assert_eq!(headers["cache-control"], "max-age=2");
    }

    #[test]
    fn test_rewritten_manifest_overwrites_length() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("10"));
        headers.insert("content-type", HeaderValue::from_static("application/vnd.apple.mpegurl"));

        let response = rewritten_manifest(StatusCode::OK, headers, Bytes::from_static(b"#EXTM3U\nabc\n"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "12");
        assert_eq!(response.headers()["content-type"], "application/vnd.apple.mpegurl");
    }
}
