//! Handler-level error taxonomy.
//!
//! Every failure a request handler can hit is one variant here, and each
//! variant maps to exactly one response shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use thiserror::Error;

use crate::manifest::ManifestError;
use crate::steering::{DashParamsError, TokenError};
use crate::steering::dash::REQUIRED_PARAMS;

/// Body returned for manifests that fail validation.
pub const INVALID_MANIFEST_BODY: &str = "Invalid m3u8 response";

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Manifest fetch could not reach the origin.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Passthrough forwarding could not reach the origin.
    #[error("Upstream request failed: {0}")]
    Passthrough(#[source] reqwest::Error),

    /// Passthrough request body exceeded `listener.max_body_size`.
    #[error("Request body exceeds {limit} bytes")]
    RequestBodyTooLarge { limit: usize },

    /// Passthrough request body could not be read, e.g. the client went away.
    #[error("Failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),

    #[error("invalid manifest: {0}")]
    InvalidManifest(#[from] ManifestError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Missing required DASH parameters")]
    MissingParameter { required: &'static [&'static str] },

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Transport(_) | ProxyError::InvalidManifest(_) | ProxyError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Passthrough(_) => StatusCode::BAD_GATEWAY,
            ProxyError::RequestBodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::RequestBody(_)
            | ProxyError::MissingParameter { .. }
            | ProxyError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Classify a failure from buffering a request body capped at `limit`.
    pub fn request_body(err: axum::Error, limit: usize) -> Self {
        let over_limit = std::iter::successors(
            Some(&err as &(dyn std::error::Error + 'static)),
            |e| e.source(),
        )
        .any(|e| e.is::<LengthLimitError>());

        if over_limit {
            ProxyError::RequestBodyTooLarge { limit }
        } else {
            ProxyError::RequestBody(err)
        }
    }
}

impl From<DashParamsError> for ProxyError {
    fn from(err: DashParamsError) -> Self {
        match err {
            DashParamsError::Missing => ProxyError::MissingParameter {
                required: &REQUIRED_PARAMS,
            },
            DashParamsError::InvalidThroughput(value) => ProxyError::InvalidParameter {
                name: crate::steering::dash::THROUGHPUT_PARAM,
                value,
            },
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ProxyError::Transport(_)
            | ProxyError::Passthrough(_)
            | ProxyError::RequestBodyTooLarge { .. }
            | ProxyError::RequestBody(_) => {
                (status, self.to_string()).into_response()
            }
            ProxyError::InvalidManifest(_) => (status, INVALID_MANIFEST_BODY).into_response(),
            ProxyError::Token(err) => {
                (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
            }
            ProxyError::MissingParameter { required } => (
                status,
                Json(serde_json::json!({
                    "error": self.to_string(),
                    "required": required,
                })),
            )
                .into_response(),
            ProxyError::InvalidParameter { name, value } => (
                status,
                Json(serde_json::json!({
                    "error": self.to_string(),
                    "parameter": name,
                    "value": value,
                })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_parameter_lists_required() {
        let response = ProxyError::from(DashParamsError::Missing).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(
            body["required"],
            serde_json::json!(["_DASH_pathway", "_DASH_throughput"])
        );
    }

    #[tokio::test]
    async fn test_invalid_manifest_fixed_body() {
        let response = ProxyError::from(ManifestError::MissingHeader).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], INVALID_MANIFEST_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_token_error_json_envelope() {
        let err = crate::steering::token::decode_segment("%%%").unwrap_err();
        let response = ProxyError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("base64url"));
    }

    #[tokio::test]
    async fn test_body_over_limit_is_payload_too_large() {
        let err = axum::body::to_bytes(axum::body::Body::from(vec![0u8; 32]), 8)
            .await
            .unwrap_err();

        let err = ProxyError::request_body(err, 8);
        assert!(matches!(err, ProxyError::RequestBodyTooLarge { limit: 8 }));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_body_read_failure_is_bad_request() {
        let err = axum::Error::new(std::io::Error::other("connection reset by peer"));

        let err = ProxyError::request_body(err, 1024);
        assert!(matches!(err, ProxyError::RequestBody(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_parameter_is_bad_request() {
        let err = ProxyError::from(DashParamsError::InvalidThroughput("x".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid value for _DASH_throughput: x");
    }
}
