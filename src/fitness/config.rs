//! Objective and constraint configuration.

use crate::error::{Result, RoutingError};

/// Orientation of the optional walking objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkPolicy {
    /// More walking is better: the objective is `-walk_m`.
    #[default]
    Reward,
    /// Less walking is better: the objective is `+walk_m`.
    Penalize,
}

/// Which objectives are optimized and which hard limits apply.
///
/// Time and emissions are always the first two objectives, followed by
/// the walking objective when a [`WalkPolicy`] is set and the fare when
/// `include_fare` is true.
///
/// # Examples
///
/// ```
/// use u_multimodal::fitness::{ObjectiveConfig, WalkPolicy};
///
/// let config = ObjectiveConfig::default()
///     .with_walk_policy(WalkPolicy::Penalize)
///     .with_fare(true)
///     .with_max_transfers(2);
/// assert_eq!(config.objective_count(), 4);
/// assert_eq!(config.objective_names(), vec!["time_s", "emissions_g", "walk_m", "fare"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveConfig {
    /// Adds a signed walking-distance objective.
    pub walk_policy: Option<WalkPolicy>,

    /// Adds the fare as an objective.
    pub include_fare: bool,

    /// Upper bound on total walking time. `Some(0.0)` forbids walking.
    pub max_walk_time_s: Option<f64>,

    /// Upper bound on the number of transfers.
    pub max_transfers: Option<usize>,
}

impl ObjectiveConfig {
    /// Enables the walking objective.
    pub fn with_walk_policy(mut self, policy: WalkPolicy) -> Self {
        self.walk_policy = Some(policy);
        self
    }

    /// Enables or disables the fare objective.
    pub fn with_fare(mut self, include: bool) -> Self {
        self.include_fare = include;
        self
    }

    /// Sets the walking time limit.
    pub fn with_max_walk_time_s(mut self, seconds: f64) -> Self {
        self.max_walk_time_s = Some(seconds.max(0.0));
        self
    }

    /// Sets the transfer limit.
    pub fn with_max_transfers(mut self, transfers: usize) -> Self {
        self.max_transfers = Some(transfers);
        self
    }

    /// Length of the objective vector.
    pub fn objective_count(&self) -> usize {
        2 + usize::from(self.walk_policy.is_some()) + usize::from(self.include_fare)
    }

    /// Objective labels in vector order.
    pub fn objective_names(&self) -> Vec<&'static str> {
        let mut names = vec!["time_s", "emissions_g"];
        if self.walk_policy.is_some() {
            names.push("walk_m");
        }
        if self.include_fare {
            names.push("fare");
        }
        names
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_walk_time_s.is_some_and(|w| !(w >= 0.0)) {
            return Err(RoutingError::InvalidConfig(
                "max_walk_time_s must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
