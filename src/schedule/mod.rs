//! Schedule records at the crate boundary.
//!
//! # Key Types
//!
//! - [`ScheduleData`]: one snapshot of stops, trips, stop times, transfers,
//!   frequencies and fare tables
//! - [`Timestamp`]: seconds since midnight, overnight values allowed

mod time;
mod types;

pub use time::{format_time, running_time, SECONDS_PER_DAY};
pub use types::{
    FareAttribute, FareRule, FrequencyRecord, RouteRecord, ScheduleData, StopRecord,
    StopTimeRecord, Timestamp, TransferRecord, TripRecord,
};
