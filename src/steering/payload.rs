//! Steering payload model and override merging.
//!
//! # Design Decisions
//! - Claims are an ordered JSON object so caller overrides may introduce
//!   keys the typed payload does not know about
//! - Merging is shallow: an override replaces the whole value under its key
//! - Default key order is `minBitrate`, `cdnOrder`, `pathways`, `timestamp`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token claims: an insertion-ordered JSON object.
pub type Claims = Map<String, Value>;

/// Minimum bitrate (bits/sec) advertised when the caller does not override it.
pub const DEFAULT_MIN_BITRATE: u64 = 914_878;

/// Issued-at claim stamped on every token unless the caller supplies one.
pub const ISSUED_AT_CLAIM: &str = "iat";

/// A named CDN route with its advertised throughput capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathway {
    pub id: String,
    pub throughput: u64,
}

impl Pathway {
    pub fn new(id: impl Into<String>, throughput: u64) -> Self {
        Self {
            id: id.into(),
            throughput,
        }
    }
}

/// Logical content of a steering token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteeringPayload {
    /// Bitrate below which steering away from low-capacity pathways is expected.
    pub min_bitrate: u64,
    /// Pathway ids, most preferred first.
    pub cdn_order: Vec<String>,
    /// Advertised per-pathway throughput.
    pub pathways: Vec<Pathway>,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
}

impl SteeringPayload {
    /// The canonical payload stamped with the given creation time.
    pub fn default_at(created: DateTime<Utc>) -> Self {
        Self {
            min_bitrate: DEFAULT_MIN_BITRATE,
            cdn_order: vec!["cdn-c".into(), "cdn-a".into(), "cdn-b".into()],
            pathways: vec![
                Pathway::new("cdn-a", 9_000_000),
                Pathway::new("cdn-b", 8_000_000),
                Pathway::new("cdn-c", 1_000),
            ],
            timestamp: created.timestamp_millis(),
        }
    }

    /// Render as claims in canonical key order.
    pub fn to_claims(&self) -> Claims {
        let mut claims = Claims::new();
        claims.insert("minBitrate".into(), Value::from(self.min_bitrate));
        claims.insert("cdnOrder".into(), Value::from(self.cdn_order.clone()));
        claims.insert("pathways".into(), pathways_value(&self.pathways));
        claims.insert("timestamp".into(), Value::from(self.timestamp));
        claims
    }
}

pub(crate) fn pathways_value(pathways: &[Pathway]) -> Value {
    Value::Array(
        pathways
            .iter()
            .map(|p| serde_json::json!({ "id": p.id, "throughput": p.throughput }))
            .collect(),
    )
}

/// Overlay `overrides` onto `base`. Caller keys win; existing keys keep
/// their position, new keys are appended.
pub fn merge_overrides(mut base: Claims, overrides: Claims) -> Claims {
    for (key, value) in overrides {
        base.insert(key, value);
    }
    base
}

/// Build the full claim set for a token: defaults, then overrides, then
/// `iat` if the caller did not provide one.
pub fn build_claims(overrides: Claims, now: DateTime<Utc>) -> Claims {
    let mut claims = merge_overrides(SteeringPayload::default_at(now).to_claims(), overrides);
    claims
        .entry(ISSUED_AT_CLAIM)
        .or_insert_with(|| Value::from(now.timestamp()));
    claims
}

/// Interpret query-string pairs as overrides.
///
/// A value that parses as JSON is taken as that JSON value, anything else
/// stays a string. Later duplicates win.
pub fn overrides_from_query<I>(pairs: I) -> Claims
where
    I: IntoIterator<Item = (String, String)>,
{
    pairs
        .into_iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| Value::String(raw));
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_760_730_010_622).unwrap()
    }

    #[test]
    fn test_default_claim_order() {
        let claims = SteeringPayload::default_at(fixed_now()).to_claims();
        let keys: Vec<&str> = claims.keys().map(String::as_str).collect();
        assert_eq!(keys, ["minBitrate", "cdnOrder", "pathways", "timestamp"]);
        assert_eq!(claims["minBitrate"], 914_878);
        assert_eq!(claims["timestamp"], 1_760_730_010_622i64);
    }

    #[test]
    fn test_override_replaces_whole_sequence() {
        let mut overrides = Claims::new();
        overrides.insert(
            "pathways".into(),
            serde_json::json!([{ "id": "cdn-z", "throughput": 5 }]),
        );
        let claims = build_claims(overrides, fixed_now());

        assert_eq!(claims["pathways"], serde_json::json!([{ "id": "cdn-z", "throughput": 5 }]));
        assert_eq!(claims["cdnOrder"], serde_json::json!(["cdn-c", "cdn-a", "cdn-b"]));
    }

    #[test]
    fn test_iat_stamped_unless_supplied() {
        let claims = build_claims(Claims::new(), fixed_now());
        assert_eq!(claims[ISSUED_AT_CLAIM], 1_760_730_010i64);

        let mut overrides = Claims::new();
        overrides.insert("iat".into(), Value::from(42));
        let claims = build_claims(overrides, fixed_now());
        assert_eq!(claims[ISSUED_AT_CLAIM], 42);
    }

    #[test]
    fn test_query_values_parsed_as_json_when_possible() {
        let claims = overrides_from_query(vec![
            ("minBitrate".to_string(), "500000".to_string()),
            ("cdnOrder".to_string(), r#"["cdn-a"]"#.to_string()),
            ("label".to_string(), "cdn-a".to_string()),
        ]);

        assert_eq!(claims["minBitrate"], 500_000);
        assert_eq!(claims["cdnOrder"], serde_json::json!(["cdn-a"]));
        assert_eq!(claims["label"], "cdn-a");
    }

    #[test]
    fn test_new_keys_appended_after_defaults() {
        let mut overrides = Claims::new();
        overrides.insert("region".into(), Value::from("eu-west-1"));
        overrides.insert("minBitrate".into(), Value::from(1));
        let claims = build_claims(overrides, fixed_now());

        let keys: Vec<&str> = claims.keys().map(String::as_str).collect();
        assert_eq!(keys, ["minBitrate", "cdnOrder", "pathways", "timestamp", "region", "iat"]);
        assert_eq!(claims["minBitrate"], 1);
    }
}
