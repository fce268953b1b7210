//! Wire types of the OpenSky REST API and the projections the frontend consumes.
//!
//! A state vector arrives as a positional JSON array, e.g.
//! `["3c6444", "DLH9LF  ", "Germany", 1700000000, 1700000000, 6.27, 50.03, ...]`.
//! Only the indices below are read.

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::errors::UpstreamError;
use crate::models::flight::{FlightDetail, FlightSummary, NOT_AVAILABLE};

const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_TRUE_TRACK: usize = 10;

/// Body of a successful client-credentials grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Token lifetime in seconds. Some providers send it as a float.
    pub expires_in: f64,
}

/// Body of `GET /states/all`. `states` is `null` when nothing is airborne.
///
/// Entries stay untyped: only the first `MAX_MAP_FLIGHTS` are ever looked at,
/// so whatever follows them cannot break the reply.
#[derive(Debug, Default, Deserialize)]
pub struct StatesResponse {
    #[serde(default)]
    pub states: Option<Vec<Value>>,
}

/// One element of `GET /flights/aircraft`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    #[serde(default)]
    pub est_departure_airport: Option<String>,
    #[serde(default)]
    pub est_arrival_airport: Option<String>,
}

impl FlightRecord {
    /// Null and empty airport codes both fall back to the placeholders.
    pub fn to_detail(&self) -> FlightDetail {
        FlightDetail::new(
            non_empty(self.est_departure_airport.as_deref()).unwrap_or("Unknown"),
            non_empty(self.est_arrival_airport.as_deref()).unwrap_or("In Flight"),
        )
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Identity fields are copied as sent: `null` stays `null`, other scalars keep
/// their JSON text.
fn identity(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Project one entry of the `states` array into a `FlightSummary`.
///
/// Only an entry that is not an array, or too short to reach the heading, is
/// malformed. Non-numeric coordinates become `null`; a missing or zero heading
/// becomes the integer 0, any other heading is passed through unchanged.
pub fn summarize_state(entry: &Value) -> Result<FlightSummary, UpstreamError> {
    let state = entry
        .as_array()
        .ok_or_else(|| UpstreamError::Malformed("state vector is not an array".into()))?;

    if state.len() <= IDX_TRUE_TRACK {
        return Err(UpstreamError::Malformed(format!(
            "state vector has {} fields, expected at least {}",
            state.len(),
            IDX_TRUE_TRACK + 1
        )));
    }

    let callsign = state[IDX_CALLSIGN]
        .as_str()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    let heading = match &state[IDX_TRUE_TRACK] {
        Value::Number(n) if n.as_f64() != Some(0.0) => n.clone(),
        _ => Number::from(0),
    };

    Ok(FlightSummary {
        icao24: identity(&state[IDX_ICAO24]),
        callsign,
        origin_country: identity(&state[IDX_ORIGIN_COUNTRY]),
        longitude: state[IDX_LONGITUDE].as_f64(),
        latitude: state[IDX_LATITUDE].as_f64(),
        heading,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(callsign: Value, heading: Value) -> Value {
        json!([
            "3c6444", callsign, "Germany", 1700000000, 1700000001, 6.27, 50.03, 10972.8, false,
            231.4, heading, 0.0, null, 11277.6, "1000", false, 0
        ])
    }

    #[test]
    fn test_projects_documented_indices() {
        let summary = summarize_state(&state(json!("DLH9LF  "), json!(87.5))).unwrap();
        assert_eq!(summary.icao24.as_deref(), Some("3c6444"));
        assert_eq!(summary.callsign, "DLH9LF");
        assert_eq!(summary.origin_country.as_deref(), Some("Germany"));
        assert_eq!(summary.longitude, Some(6.27));
        assert_eq!(summary.latitude, Some(50.03));
        assert_eq!(summary.heading.as_f64(), Some(87.5));
    }

    #[test]
    fn test_blank_or_missing_callsign_is_na() {
        for callsign in [json!(""), json!("    "), json!(null)] {
            let summary = summarize_state(&state(callsign.clone(), json!(12.0))).unwrap();
            assert_eq!(summary.callsign, "N/A", "callsign {:?}", callsign);
        }
    }

    #[test]
    fn test_zero_or_null_heading_is_integer_zero() {
        for heading in [json!(0), json!(0.0), json!(null)] {
            let summary = summarize_state(&state(json!("AFR123"), heading.clone())).unwrap();
            assert_eq!(
                serde_json::to_value(&summary).unwrap()["heading"],
                json!(0),
                "heading {:?}",
                heading
            );
            assert_eq!(serde_json::to_string(&summary.heading).unwrap(), "0");
        }
    }

    #[test]
    fn test_integral_heading_keeps_its_shape() {
        let summary = summarize_state(&state(json!("AFR123"), json!(90))).unwrap();
        assert_eq!(serde_json::to_string(&summary.heading).unwrap(), "90");
    }

    #[test]
    fn test_null_position_passes_through() {
        let mut s = state(json!("AFR123"), json!(12.0));
        s[IDX_LONGITUDE] = Value::Null;
        s[IDX_LATITUDE] = Value::Null;
        let summary = summarize_state(&s).unwrap();
        assert_eq!(summary.longitude, None);
        assert_eq!(summary.latitude, None);
    }

    #[test]
    fn test_null_origin_country_passes_through() {
        let mut s = state(json!("AFR123"), json!(12.0));
        s[IDX_ORIGIN_COUNTRY] = Value::Null;
        let summary = summarize_state(&s).unwrap();
        assert_eq!(summary.origin_country, None);
        assert!(serde_json::to_value(&summary).unwrap()["origin_country"].is_null());
    }

    #[test]
    fn test_non_string_icao24_is_copied_as_text() {
        let mut s = state(json!("AFR123"), json!(12.0));
        s[IDX_ICAO24] = json!(42);
        let summary = summarize_state(&s).unwrap();
        assert_eq!(summary.icao24.as_deref(), Some("42"));
    }

    #[test]
    fn test_short_state_vector_is_malformed() {
        let short = json!(["3c6444", "DLH9LF", "Germany"]);
        assert!(matches!(summarize_state(&short), Err(UpstreamError::Malformed(_))));
    }

    #[test]
    fn test_non_array_entry_is_malformed() {
        assert!(matches!(summarize_state(&Value::Null), Err(UpstreamError::Malformed(_))));
    }

    #[test]
    fn test_states_null_and_absent_deserialize_to_none() {
        let with_null: StatesResponse =
            serde_json::from_str(r#"{"time": 1700000000, "states": null}"#).unwrap();
        assert!(with_null.states.is_none());

        let absent: StatesResponse = serde_json::from_str(r#"{"time": 1700000000}"#).unwrap();
        assert!(absent.states.is_none());
    }

    #[test]
    fn test_states_accept_non_array_entries() {
        let payload: StatesResponse =
            serde_json::from_str(r#"{"states": [["3c6444"], null, 7]}"#).unwrap();
        assert_eq!(payload.states.unwrap().len(), 3);
    }

    #[test]
    fn test_float_token_lifetime_is_accepted() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "t", "expires_in": 1800.0}"#).unwrap();
        assert_eq!(token.expires_in, 1800.0);
    }

    #[test]
    fn test_flight_record_placeholders() {
        let record: FlightRecord = serde_json::from_str(
            r#"{"icao24":"a1b2c3","firstSeen":"odd","estDepartureAirport":"KJFK","estArrivalAirport":null}"#,
        )
        .unwrap();
        assert_eq!(record.to_detail(), FlightDetail::new("KJFK", "In Flight"));

        let blank: FlightRecord =
            serde_json::from_str(r#"{"estDepartureAirport":"","estArrivalAirport":"EGLL"}"#)
                .unwrap();
        assert_eq!(blank.to_detail(), FlightDetail::new("Unknown", "EGLL"));
    }
}
