//! Typed schedule records supplied by the schedule-data collaborator.
//!
//! Parsing raw feed tables is not done here; callers hand over already
//! typed rows. Rows may still be malformed (missing coordinates, dangling
//! references); the graph builder skips those and records why.

use crate::geo::GeoPoint;

/// Seconds since midnight of the service day. Values of 86 400 and above
/// denote service after midnight (e.g. `25:10:00` = 90 600).
pub type Timestamp = u32;

/// A stop row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopRecord {
    pub stop_id: String,
    pub name: Option<String>,
    pub location: GeoPoint,
    pub zone_id: Option<String>,
    /// Operator prefix, e.g. `METRO` or `STCP`. Drives the node id and the
    /// default transit mode of the stop.
    pub operator: String,
}

impl StopRecord {
    pub fn new(stop_id: &str, operator: &str, lat: f64, lon: f64) -> Self {
        Self {
            stop_id: stop_id.to_string(),
            name: None,
            location: GeoPoint::new(lat, lon),
            zone_id: None,
            operator: operator.to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_zone(mut self, zone_id: &str) -> Self {
        self.zone_id = Some(zone_id.to_string());
        self
    }
}

/// A route row. Route ids are only unique within one operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRecord {
    pub route_id: String,
    pub operator: String,
    pub short_name: Option<String>,
    /// GTFS `route_type` (0 tram, 1 subway, 3 bus, ...).
    pub route_type: Option<u16>,
}

impl RouteRecord {
    pub fn new(route_id: &str, operator: &str, route_type: u16) -> Self {
        Self {
            route_id: route_id.to_string(),
            operator: operator.to_string(),
            short_name: None,
            route_type: Some(route_type),
        }
    }

    pub fn with_short_name(mut self, short_name: &str) -> Self {
        self.short_name = Some(short_name.to_string());
        self
    }
}

/// A trip row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRecord {
    pub trip_id: String,
    pub route_id: String,
    /// Operator of the trip, its route and its stops. Trip, route and stop
    /// ids are resolved within this operator.
    pub operator: String,
}

impl TripRecord {
    pub fn new(trip_id: &str, route_id: &str, operator: &str) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            route_id: route_id.to_string(),
            operator: operator.to_string(),
        }
    }
}

/// A stop-time row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopTimeRecord {
    pub operator: String,
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_time: Option<Timestamp>,
    pub departure_time: Option<Timestamp>,
}

impl StopTimeRecord {
    pub fn new(
        operator: &str,
        trip_id: &str,
        stop_id: &str,
        stop_sequence: u32,
        arrival_time: Option<Timestamp>,
        departure_time: Option<Timestamp>,
    ) -> Self {
        Self {
            operator: operator.to_string(),
            trip_id: trip_id.to_string(),
            stop_id: stop_id.to_string(),
            stop_sequence,
            arrival_time,
            departure_time,
        }
    }
}

/// A transfer row between two stops of the same operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferRecord {
    pub operator: String,
    pub from_stop_id: String,
    pub to_stop_id: String,
    /// GTFS `transfer_type`; `3` means the transfer is not possible.
    pub transfer_type: Option<u8>,
    pub min_transfer_time: Option<f64>,
}

/// A frequency row (headway-based service).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrequencyRecord {
    pub operator: String,
    pub trip_id: String,
    pub headway_secs: f64,
}

impl FrequencyRecord {
    pub fn new(operator: &str, trip_id: &str, headway_secs: f64) -> Self {
        Self {
            operator: operator.to_string(),
            trip_id: trip_id.to_string(),
            headway_secs,
        }
    }
}

/// A fare attribute row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FareAttribute {
    pub fare_id: String,
    pub price: f64,
    pub currency: String,
}

/// A fare rule row. Every `None` field is unrestricted.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FareRule {
    pub fare_id: String,
    pub route_id: Option<String>,
    pub origin_id: Option<String>,
    pub destination_id: Option<String>,
    pub contains_id: Option<String>,
}

/// One schedule snapshot, possibly spanning several operators.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleData {
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    pub transfers: Vec<TransferRecord>,
    pub frequencies: Vec<FrequencyRecord>,
    pub fare_attributes: Vec<FareAttribute>,
    pub fare_rules: Vec<FareRule>,
}
