//! Weighted-sum sweep configuration.

use crate::error::{Result, RoutingError};

/// Configuration of the λ sweep.
///
/// # Defaults
///
/// ```
/// use u_multimodal::baseline::BaselineConfig;
///
/// let lambdas = BaselineConfig::default().lambdas();
/// assert_eq!(lambdas.len(), 21);
/// assert_eq!(lambdas[0], 0.0);
/// assert_eq!(lambdas[20], 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaselineConfig {
    /// Spacing between successive λ values in `[0, 1]`.
    pub lambda_step: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self { lambda_step: 0.05 }
    }
}

impl BaselineConfig {
    /// Sets the λ step, clamped to `[0.001, 1]`.
    pub fn with_lambda_step(mut self, step: f64) -> Self {
        self.lambda_step = step.clamp(0.001, 1.0);
        self
    }

    /// The λ values of the sweep, ascending from 0 to 1 inclusive.
    ///
    /// When the step divides 1 evenly the values are `i / n`, so 0.05
    /// yields exactly 0.0, 0.05, ..., 1.0. Otherwise 1.0 is appended after
    /// the last whole step.
    pub fn lambdas(&self) -> Vec<f64> {
        let step = self.lambda_step;
        let n = (1.0 / step).round();
        if n >= 1.0 && (n * step - 1.0).abs() < 1e-9 {
            let n = n as usize;
            return (0..=n).map(|i| i as f64 / n as f64).collect();
        }

        let mut lambdas: Vec<f64> = (0..)
            .map(|i| i as f64 * step)
            .take_while(|&l| l < 1.0)
            .collect();
        lambdas.push(1.0);
        lambdas
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.lambda_step > 0.0 && self.lambda_step <= 1.0) {
            return Err(RoutingError::InvalidConfig(
                "lambda_step must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}
