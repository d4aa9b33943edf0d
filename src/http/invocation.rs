//! Serving inside short-lived invocation hosts.
//!
//! The host hands each request to the same router the standalone server
//! uses. A handler that fails outside the normal error mapping answers with
//! a 500 JSON body instead of failing the whole invocation.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower_http::catch_panic::CatchPanicLayer;

pub const INTERNAL_ERROR: &str = "Internal Server Error";

pub type HandlerFailureFn = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Layer turning handler failures into [`handler_failure`] responses.
pub fn catch_handler_failures() -> CatchPanicLayer<HandlerFailureFn> {
    CatchPanicLayer::custom(handler_failure as HandlerFailureFn)
}

/// `500 {"error": "Internal Server Error", "message": <cause>}`.
pub fn handler_failure(failure: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = failure.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = failure.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown failure".to_string()
    };

    tracing::error!(error = %message, "Handler failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": INTERNAL_ERROR,
            "message": message,
        })),
    )
        .into_response()
}
