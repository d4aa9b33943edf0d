//! Auxiliary endpoints: origin health and steering tokens.
//!
//! These are matched before request classification and never reach the
//! origin.

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::{Extension, Json};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;
use crate::http::server::AppState;
use crate::steering::payload::{build_claims, overrides_from_query};
use crate::steering::token;
use crate::steering::{Claims, DashParams, SteeringPayload};

/// Query key carrying the signing secret for `/jwt/generate`.
const SECRET_PARAM: &str = "secret";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub target: String,
    pub last_check: Option<DateTime<Utc>>,
    pub response_time: Option<u64>,
    pub error: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let snapshot = state.health.snapshot();
    Json(HealthReport {
        status: if snapshot.is_healthy { "healthy" } else { "unhealthy" },
        target: state.target.to_string(),
        last_check: snapshot.last_check,
        response_time: snapshot.response_time,
        error: snapshot.last_error.clone(),
    })
}

#[derive(Debug, Serialize)]
pub struct EncodeResponse {
    pub encoded: String,
    pub payload: Claims,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub token: String,
    pub payload: Claims,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub payload: Option<Claims>,
    pub secret: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashParamsResponse {
    pub dash_params: Option<DashParams>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashJwtResponse {
    pub dash_params: DashParams,
    pub jwt: String,
    pub encoded_payload: String,
    pub payload: Claims,
}

pub async fn jwt_encode_query(
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<EncodeResponse>, ProxyError> {
    encode(overrides_from_query(pairs))
}

pub async fn jwt_encode_body(body: Bytes) -> Result<Json<EncodeResponse>, ProxyError> {
    encode(json_body::<Claims>(&body)?)
}

fn encode(overrides: Claims) -> Result<Json<EncodeResponse>, ProxyError> {
    let encoded = token::encode_steering_params(overrides)?;
    let payload = token::decode_segment(&encoded)?;
    Ok(Json(EncodeResponse { encoded, payload }))
}

pub async fn jwt_generate_query(
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<GenerateResponse>, ProxyError> {
    let mut secret = None;
    let mut claims = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        if key == SECRET_PARAM {
            secret = Some(value);
        } else {
            claims.push((key, value));
        }
    }
    generate(overrides_from_query(claims), secret.as_deref())
}

pub async fn jwt_generate_body(body: Bytes) -> Result<Json<GenerateResponse>, ProxyError> {
    let request = json_body::<GenerateRequest>(&body)?;
    generate(request.payload.unwrap_or_default(), request.secret.as_deref())
}

fn generate(overrides: Claims, secret: Option<&str>) -> Result<Json<GenerateResponse>, ProxyError> {
    let token = token::generate_token(overrides, secret)?;
    let payload = token::decode(&token)?;
    Ok(Json(GenerateResponse { token, payload }))
}

pub async fn dash_params(params: Option<Extension<DashParams>>) -> Json<DashParamsResponse> {
    Json(DashParamsResponse {
        dash_params: params.map(|Extension(p)| p),
    })
}

pub async fn dash_jwt(
    params: Option<Extension<DashParams>>,
    uri: Uri,
) -> Result<Json<DashJwtResponse>, ProxyError> {
    let dash_params = match params {
        Some(Extension(p)) => p,
        // The capture middleware only stores valid pairs; re-parse to
        // report what is wrong.
        None => DashParams::from_query(uri.query())?,
    };

    let now = Utc::now();
    let overrides = dash_params.steering_overrides(&SteeringPayload::default_at(now));
    let jwt = token::issue(&build_claims(overrides, now), None)?;
    let encoded_payload = token::payload_segment(&jwt)?.to_owned();
    let payload = token::decode_segment(&encoded_payload)?;

    Ok(Json(DashJwtResponse {
        dash_params,
        jwt,
        encoded_payload,
        payload,
    }))
}

/// An absent body is an empty object.
fn json_body<T>(body: &[u8]) -> Result<T, ProxyError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ProxyError::InvalidParameter {
        name: "body",
        value: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_empty_body_is_default() {
        let claims: Claims = json_body(b"").unwrap();
        assert!(claims.is_empty());

        let request: GenerateRequest = json_body(b"  \n").unwrap();
        assert!(request.payload.is_none());
    }

    #[test]
    fn test_generate_request_shape() {
        let request: GenerateRequest =
            json_body(br#"{"payload":{"minBitrate":1},"secret":"s3cr3t"}"#).unwrap();
        assert_eq!(request.payload.unwrap()["minBitrate"], Value::from(1));
        assert_eq!(request.secret.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let err = json_body::<Claims>(b"{not json").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
