//! Build diagnostics.

use super::bridges::BridgeDecision;

/// A schedule row that was skipped during graph construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleIssue {
    #[error("stop '{stop_id}' ({operator}) has invalid coordinates")]
    InvalidCoordinates { operator: String, stop_id: String },

    #[error("duplicate stop '{stop_id}' ({operator})")]
    DuplicateStop { operator: String, stop_id: String },

    #[error("row references unknown trip '{trip_id}' ({operator})")]
    UnknownTrip { operator: String, trip_id: String },

    #[error("trip '{trip_id}' ({operator}) references unknown stop '{stop_id}'")]
    UnknownStop {
        operator: String,
        trip_id: String,
        stop_id: String,
    },

    #[error("transfer {from_stop_id} -> {to_stop_id} ({operator}) references unknown stop")]
    UnknownTransferStop {
        operator: String,
        from_stop_id: String,
        to_stop_id: String,
    },

    #[error("transfer {from_stop_id} -> {to_stop_id} has invalid min_transfer_time")]
    InvalidTransferTime {
        from_stop_id: String,
        to_stop_id: String,
    },

    #[error("frequency of trip '{trip_id}' ({operator}) has invalid headway")]
    InvalidHeadway { operator: String, trip_id: String },

    #[error("fare '{fare_id}' has invalid price")]
    InvalidFarePrice { fare_id: String },
}

/// Summary of one graph build.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildReport {
    pub issues: Vec<ScheduleIssue>,
    pub bridge_decisions: Vec<BridgeDecision>,
    pub transit_edges: usize,
    pub walk_edges: usize,
    pub transfer_edges: usize,
}

impl BuildReport {
    /// Number of river-crossing walk links that were dropped.
    ///
    /// Each dropped link counts once even though it would have produced a
    /// pair of directed edges.
    pub fn blocked_walk_links(&self) -> usize {
        self.bridge_decisions.iter().filter(|d| !d.kept).count()
    }

    pub(crate) fn skip(&mut self, issue: ScheduleIssue) {
        log::warn!("skipping schedule row: {issue}");
        self.issues.push(issue);
    }
}
