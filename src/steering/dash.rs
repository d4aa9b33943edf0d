//! DASH content-steering query parameters.
//!
//! Players report their current pathway and measured throughput with
//! `_DASH_pathway` and `_DASH_throughput`. The values live in the request's
//! extensions for that request only.

use serde::Serialize;

use crate::steering::payload::{pathways_value, Claims, Pathway, SteeringPayload};

pub const PATHWAY_PARAM: &str = "_DASH_pathway";
pub const THROUGHPUT_PARAM: &str = "_DASH_throughput";

/// Parameters a `/dash-jwt` request must carry.
pub const REQUIRED_PARAMS: [&str; 2] = [PATHWAY_PARAM, THROUGHPUT_PARAM];

/// Client-reported steering state for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashParams {
    pub pathway: String,
    pub throughput: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashParamsError {
    /// One or both parameters are absent or empty.
    Missing,
    /// Throughput present but not a non-negative number.
    InvalidThroughput(String),
}

impl DashParams {
    /// Extract the parameters from a raw query string.
    pub fn from_query(query: Option<&str>) -> Result<Self, DashParamsError> {
        let mut pathway = None;
        let mut throughput = None;

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                PATHWAY_PARAM => pathway = Some(value.into_owned()),
                THROUGHPUT_PARAM => throughput = Some(value.into_owned()),
                _ => {}
            }
        }

        let (pathway, raw) = match (pathway, throughput) {
            (Some(p), Some(t)) if !p.is_empty() && !t.is_empty() => (p, t),
            _ => return Err(DashParamsError::Missing),
        };

        let throughput = parse_throughput(&raw).ok_or(DashParamsError::InvalidThroughput(raw))?;
        Ok(Self { pathway, throughput })
    }

    /// Overrides for a one-off token: the reported pathway's throughput
    /// replaces the advertised one, or the pathway is appended if unknown.
    pub fn steering_overrides(&self, base: &SteeringPayload) -> Claims {
        let mut pathways = base.pathways.clone();
        match pathways.iter_mut().find(|p| p.id == self.pathway) {
            Some(existing) => existing.throughput = self.throughput,
            None => pathways.push(Pathway::new(self.pathway.clone(), self.throughput)),
        }

        let mut overrides = Claims::new();
        overrides.insert("pathways".into(), pathways_value(&pathways));
        overrides
    }
}

fn parse_throughput(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    // Some players report fractional measurements.
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64)
}
