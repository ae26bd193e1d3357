//! Graph construction parameters.
//!
//! [`GraphConfig`] holds every constant that changes the built graph. The
//! [`GraphCache`](super::GraphCache) keys on it, so two graphs built from
//! the same snapshot with equal configs are interchangeable.

use super::types::{Mode, TransitMode};
use crate::error::{Result, RoutingError};

/// Grams of CO₂ per passenger-km for each transit mode.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmissionFactors {
    pub metro_g_per_km: f64,
    pub bus_g_per_km: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            metro_g_per_km: 1.0,
            bus_g_per_km: 20.0,
        }
    }
}

impl EmissionFactors {
    /// Factor for a segment mode. Walking, transfers and waits emit nothing.
    pub fn factor(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Metro => self.metro_g_per_km,
            Mode::Bus => self.bus_g_per_km,
            Mode::Walk | Mode::Transfer | Mode::Wait => 0.0,
        }
    }
}

/// Configuration for building a multimodal graph.
///
/// # Defaults
///
/// ```
/// use u_multimodal::graph::GraphConfig;
///
/// let config = GraphConfig::default();
/// assert_eq!(config.walk_radius_m, 400.0);
/// assert_eq!(config.metro_speed_kmh, 40.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Maximum straight-line distance for stop-to-stop walk edges.
    pub walk_radius_m: f64,

    /// Walking speed in metres per second.
    pub walk_speed_m_s: f64,

    /// Fallback cruise speed for metro edges with unusable times.
    pub metro_speed_kmh: f64,

    /// Fallback cruise speed for bus edges with unusable times.
    pub bus_speed_kmh: f64,

    /// Search radius used when anchoring a virtual point.
    pub access_radius_m: f64,

    /// Number of stops a virtual point is linked to.
    pub access_neighbors: usize,

    /// Emission factors applied to transit edges.
    pub emissions: EmissionFactors,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            walk_radius_m: 400.0,
            walk_speed_m_s: 1.4,
            metro_speed_kmh: 40.0,
            bus_speed_kmh: 30.0,
            access_radius_m: 600.0,
            access_neighbors: 8,
            emissions: EmissionFactors::default(),
        }
    }
}

impl GraphConfig {
    /// Sets the walk radius.
    pub fn with_walk_radius_m(mut self, radius: f64) -> Self {
        self.walk_radius_m = radius;
        self
    }

    /// Sets the walking speed.
    pub fn with_walk_speed_m_s(mut self, speed: f64) -> Self {
        self.walk_speed_m_s = speed;
        self
    }

    /// Sets both fallback cruise speeds.
    pub fn with_fallback_speeds_kmh(mut self, metro: f64, bus: f64) -> Self {
        self.metro_speed_kmh = metro;
        self.bus_speed_kmh = bus;
        self
    }

    /// Sets the virtual point access radius and neighbor count.
    pub fn with_access(mut self, radius_m: f64, neighbors: usize) -> Self {
        self.access_radius_m = radius_m;
        self.access_neighbors = neighbors;
        self
    }

    /// Sets the emission factors.
    pub fn with_emissions(mut self, emissions: EmissionFactors) -> Self {
        self.emissions = emissions;
        self
    }

    /// Fallback speed in metres per second.
    pub fn fallback_speed_m_s(&self, mode: TransitMode) -> f64 {
        let kmh = match mode {
            TransitMode::Metro => self.metro_speed_kmh,
            TransitMode::Bus => self.bus_speed_kmh,
        };
        kmh * 1000.0 / 3600.0
    }

    /// Walking time for a distance.
    pub fn walk_time_s(&self, distance_m: f64) -> f64 {
        distance_m / self.walk_speed_m_s
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.walk_radius_m >= 0.0) {
            return Err(RoutingError::InvalidConfig(
                "walk_radius_m must be non-negative".into(),
            ));
        }
        if !(self.walk_speed_m_s > 0.0) {
            return Err(RoutingError::InvalidConfig(
                "walk_speed_m_s must be positive".into(),
            ));
        }
        if !(self.metro_speed_kmh > 0.0) || !(self.bus_speed_kmh > 0.0) {
            return Err(RoutingError::InvalidConfig(
                "fallback speeds must be positive".into(),
            ));
        }
        if self.access_neighbors == 0 {
            return Err(RoutingError::InvalidConfig(
                "access_neighbors must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Bit pattern of every numeric field, used as a cache key.
    pub(crate) fn key_bits(&self) -> [u64; 8] {
        [
            self.walk_radius_m.to_bits(),
            self.walk_speed_m_s.to_bits(),
            self.metro_speed_kmh.to_bits(),
            self.bus_speed_kmh.to_bits(),
            self.access_radius_m.to_bits(),
            self.access_neighbors as u64,
            self.emissions.metro_g_per_km.to_bits(),
            self.emissions.bus_g_per_km.to_bits(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.walk_radius_m, 400.0);
        assert!((config.walk_speed_m_s - 1.4).abs() < 1e-12);
        assert_eq!(config.access_neighbors, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_metro_faster_than_bus() {
        let config = GraphConfig::default();
        assert!(
            config.fallback_speed_m_s(TransitMode::Metro)
                > config.fallback_speed_m_s(TransitMode::Bus)
        );
    }

    #[test]
    fn test_validate_rejects_zero_speed() {
        let config = GraphConfig::default().with_walk_speed_m_s(0.0);
        assert!(config.validate().is_err());
        let config = GraphConfig::default().with_fallback_speeds_kmh(0.0, 30.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_radius() {
        let config = GraphConfig::default().with_walk_radius_m(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_emission_factor_walk_is_zero() {
        let f = EmissionFactors::default();
        assert_eq!(f.factor(Mode::Walk), 0.0);
        assert_eq!(f.factor(Mode::Wait), 0.0);
        assert_eq!(f.factor(Mode::Bus), 20.0);
    }

    #[test]
    fn test_key_bits_differ_by_radius() {
        let a = GraphConfig::default();
        let b = GraphConfig::default().with_walk_radius_m(500.0);
        assert_ne!(a.key_bits(), b.key_bits());
    }
}
