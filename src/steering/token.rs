//! Compact steering token codec.
//!
//! Tokens use the three-segment compact JWS layout
//! `base64url(header).base64url(claims).signature`. The middle segment on its
//! own is the "steering token" embedded in steering server URIs.
//!
//! Unsigned tokens carry `"alg":"none"` and an empty signature segment, so the
//! token always ends in `.`. Signed tokens use HMAC-SHA256.
//!
//! Decoding never verifies a signature. It exists to echo back claims this
//! process just produced and must not be used to authenticate third-party
//! tokens.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;

use crate::steering::payload::{build_claims, Claims};

/// base64url without padding on encode; padding tolerated on decode.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors produced while issuing or reading tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token payload must be a JSON object")]
    NotAnObject,

    #[error("token must have 3 segments, found {0}")]
    Segments(usize),

    #[error("invalid signing key: {0}")]
    Key(#[from] hmac::digest::InvalidLength),
}

/// Signing algorithm recorded in the token header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Unsecured token; the signature segment is empty.
    Unsigned,
    /// HMAC-SHA256 over `header.payload`.
    Hs256,
}

impl Algorithm {
    fn header(self) -> &'static str {
        match self {
            Algorithm::Unsigned => r#"{"alg":"none","typ":"JWT"}"#,
            Algorithm::Hs256 => r#"{"alg":"HS256","typ":"JWT"}"#,
        }
    }
}

/// Serialize claims into a full three-segment token.
///
/// An empty or absent key produces an unsigned token.
pub fn issue(claims: &Claims, signing_key: Option<&[u8]>) -> Result<String, TokenError> {
    let signing_key = signing_key.filter(|key| !key.is_empty());
    let algorithm = if signing_key.is_some() {
        Algorithm::Hs256
    } else {
        Algorithm::Unsigned
    };

    let header = SEGMENT_ENGINE.encode(algorithm.header());
    let payload = SEGMENT_ENGINE.encode(serde_json::to_vec(claims)?);
    let signing_input = format!("{header}.{payload}");

    let signature = match signing_key {
        Some(key) => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key)?;
            mac.update(signing_input.as_bytes());
            SEGMENT_ENGINE.encode(mac.finalize().into_bytes())
        }
        None => String::new(),
    };

    Ok(format!("{signing_input}.{signature}"))
}

/// Return the claims segment of a three-segment token.
pub fn payload_segment(token: &str) -> Result<&str, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    match segments.as_slice() {
        [_, payload, _] => Ok(*payload),
        other => Err(TokenError::Segments(other.len())),
    }
}

/// Decode a claims segment back into structured claims.
pub fn decode_segment(segment: &str) -> Result<Claims, TokenError> {
    let bytes = SEGMENT_ENGINE.decode(segment.trim())?;
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(claims) => Ok(claims),
        _ => Err(TokenError::NotAnObject),
    }
}

/// Decode the claims of a full token without verifying its signature.
pub fn decode(token: &str) -> Result<Claims, TokenError> {
    decode_segment(payload_segment(token)?)
}

/// Encode steering parameters and return only the claims segment.
pub fn encode_steering_params(overrides: Claims) -> Result<String, TokenError> {
    encode_steering_params_at(overrides, Utc::now())
}

pub fn encode_steering_params_at(
    overrides: Claims,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let token = issue(&build_claims(overrides, now), None)?;
    payload_segment(&token).map(str::to_owned)
}

/// Produce a full token, signed when a non-empty secret is given.
pub fn generate_token(overrides: Claims, secret: Option<&str>) -> Result<String, TokenError> {
    let claims = build_claims(overrides, Utc::now());
    issue(&claims, secret.map(str::as_bytes))
}
