use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const NOT_AVAILABLE: &str = "N/A";

/// Outcome reported to the frontend by `GET /api/flights`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Success,
    AuthError,
    Limited,
    Error,
    Empty,
}

impl FlightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Success => "success",
            FlightStatus::AuthError => "auth_error",
            FlightStatus::Limited => "limited",
            FlightStatus::Error => "error",
            FlightStatus::Empty => "empty",
        }
    }
}

/// One aircraft on the map, projected from an OpenSky state vector.
///
/// Identity fields are `null` when upstream sends `null`. `heading` keeps the
/// number exactly as OpenSky sent it, so `0` stays an integer on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub icao24: Option<String>,
    pub callsign: String,
    pub origin_country: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub heading: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightsResponse {
    pub status: FlightStatus,
    pub data: Vec<FlightSummary>,
}

impl FlightsResponse {
    pub fn success(data: Vec<FlightSummary>) -> Self {
        Self {
            status: FlightStatus::Success,
            data,
        }
    }

    /// A reply carrying no flights, only a status.
    pub fn status_only(status: FlightStatus) -> Self {
        Self {
            status,
            data: Vec::new(),
        }
    }
}

/// Most recent departure/arrival airports of one aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDetail {
    pub departure: String,
    pub arrival: String,
}

impl FlightDetail {
    pub fn new(departure: impl Into<String>, arrival: impl Into<String>) -> Self {
        Self {
            departure: departure.into(),
            arrival: arrival.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(NOT_AVAILABLE, NOT_AVAILABLE)
    }

    pub fn failed() -> Self {
        Self::new("Error", "Error")
    }
}
