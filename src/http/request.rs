//! Request handling and transformation.
//!
//! # Responsibilities
//! - Assign a request ID (UUID v4) as early as possible
//! - Capture DASH steering parameters into the request's extensions
//! - Prepare the forwarded copy of a passthrough request

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, HOST};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response::strip_hop_by_hop;
use crate::steering::DashParams;

pub const X_REQUEST_ID: &str = "x-request-id";

pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// The request ID assigned by the set-request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Middleware: store DASH parameters on the request when both are present.
///
/// The values live only as long as this request.
pub async fn capture_dash_params(mut request: Request<Body>, next: Next) -> Response {
    if let Ok(params) = DashParams::from_query(request.uri().query()) {
        tracing::debug!(
            request_id = %request_id(request.headers()),
            pathway = %params.pathway,
            throughput = params.throughput,
            "Captured DASH parameters"
        );
        request.extensions_mut().insert(params);
    }
    next.run(request).await
}

/// Headers for the origin copy of a client request.
///
/// Hop-by-hop headers are dropped, `host` is left for the client to derive
/// from the origin URL, and `content-length` is recomputed from the body.
pub fn forwarded_headers(mut headers: HeaderMap) -> HeaderMap {
    strip_hop_by_hop(&mut headers);
    headers.remove(HOST);
    headers.remove(CONTENT_LENGTH);
    headers
}
