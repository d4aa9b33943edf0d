//! Fallback handler: manifest rewrite or transparent passthrough.
//!
//! # Data Flow
//! ```text
//! Request → routing::Router::classify
//!     Manifest    → GET origin path → read whole body → ManifestRewriter → client
//!     Passthrough → same method/path/query/headers/body → origin → streamed back
//! ```

use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;
use crate::http::request::{forwarded_headers, request_id};
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteKind;

pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let kind = state.router.classify(&request);
    let request_id = request_id(request.headers()).to_owned();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        kind = kind.as_str(),
        "Proxying request"
    );

    let result = match kind {
        RouteKind::Manifest => serve_manifest(&state, &path).await,
        RouteKind::Passthrough => forward(&state, request).await,
    };

    let response = result.unwrap_or_else(|err| {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            kind = kind.as_str(),
            error = %err,
            "Request to origin failed"
        );
        err.into_response()
    });

    metrics::record_request(kind.as_str(), response.status().as_u16(), start);
    response
}

/// Fetch a manifest by path (query dropped), rewrite it, keep the origin status.
async fn serve_manifest(state: &AppState, path: &str) -> Result<Response, ProxyError> {
    let url = state.origin.url_for(path);
    let upstream = state
        .origin
        .client()
        .get(&url)
        .send()
        .await
        .map_err(ProxyError::Transport)?;

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let raw = upstream.bytes().await.map_err(ProxyError::Transport)?;

    let rewritten = match state.rewriter.rewrite(&raw) {
        Ok(body) => {
            metrics::record_manifest_rewrite("rewritten");
            body
        }
        Err(e) => {
            metrics::record_manifest_rewrite("invalid");
            return Err(e.into());
        }
    };

    tracing::info!(
        path = %path,
        status = %status,
        fetched_len = raw.len(),
        rewritten_len = rewritten.len(),
        "Manifest rewritten"
    );
    Ok(response::rewritten_manifest(status, headers, rewritten))
}

/// Forward a request unchanged and stream the origin response back.
async fn forward(state: &AppState, request: Request<Body>) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = state.origin.url_for(path_and_query);

    let body = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|e| ProxyError::request_body(e, state.max_body_size))?;

    let mut upstream = state
        .origin
        .client()
        .request(parts.method, url)
        .headers(forwarded_headers(parts.headers));
    if !body.is_empty() {
        upstream = upstream.body(body);
    }

    let upstream = upstream.send().await.map_err(ProxyError::Passthrough)?;
    let status = upstream.status();
    let headers = upstream.headers().clone();

    Ok(response::from_origin(
        status,
        headers,
        Body::from_stream(upstream.bytes_stream()),
    ))
}
