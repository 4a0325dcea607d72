// Tuning parameters of the PID controller and their validation
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::time::Duration;

use num_traits::float::FloatCore;

/// Reasons a [`TuningConfig`] may be rejected by [`TuningConfig::validate`] or
/// [`TuningConfigBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum TuningError {
    /// One of kp, ki or kd is NaN or infinite.
    #[cfg_attr(feature = "std", error("PID gains must be finite"))]
    InvalidGain,

    /// The control-cycle duration is zero, negative or not finite.
    #[cfg_attr(
        feature = "std",
        error("Control-cycle duration must be positive and finite")
    )]
    InvalidSampleTime,

    /// A bound is NaN, or the effective lower bound exceeds the upper bound.
    #[cfg_attr(
        feature = "std",
        error("Output limits must not be NaN and the lower limit must not exceed the upper limit")
    )]
    InvalidOutputLimits,

    /// The maximum rate of change of the output is zero, negative or not finite.
    #[cfg_attr(feature = "std", error("Slew-rate limit must be positive and finite"))]
    InvalidSlewRate,

    /// The overshoot integral adaptation gain is NaN or infinite.
    #[cfg_attr(
        feature = "std",
        error("Overshoot integral adaptation gain must be finite")
    )]
    InvalidOvershootAdaptation,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for TuningError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            TuningError::InvalidGain => "PID gains must be finite",
            TuningError::InvalidSampleTime => "Control-cycle duration must be positive and finite",
            TuningError::InvalidOutputLimits => {
                "Output limits must not be NaN and the lower limit must not exceed the upper limit"
            }
            TuningError::InvalidSlewRate => "Slew-rate limit must be positive and finite",
            TuningError::InvalidOvershootAdaptation => {
                "Overshoot integral adaptation gain must be finite"
            }
        };
        f.write_str(msg)
    }
}

/// Tuning parameters consumed by every controller update.
///
/// The fields are plain data and may be changed freely between calls. Optional features are
/// disabled by leaving the corresponding field as `None`. Nothing here is checked when the
/// controller runs: a zero `dt` simply turns the output into NaN. Call [`TuningConfig::validate`]
/// or go through [`TuningConfigBuilder`] to catch such mistakes up front.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TuningConfig<F> {
    /// Proportional gain.
    pub kp: F,

    /// Integral gain.
    pub ki: F,

    /// Derivative gain.
    pub kd: F,

    /// Duration of one control cycle. Must be positive.
    pub dt: F,

    /// Upper output bound. When `min` is unset the lower bound mirrors it as `-max`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max: Option<F>,

    /// Lower output bound.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min: Option<F>,

    /// Maximum change of the output per unit time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_dv: Option<F>,

    /// Extra integral gain applied while the error grows and the output pushes the wrong way.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overshoot_integral_adaptation: Option<F>,
}

impl<F: FloatCore> Default for TuningConfig<F> {
    fn default() -> Self {
        Self::pass_through()
    }
}

impl<F: FloatCore> TuningConfig<F> {
    /// A proportional-only controller with unit gain and unit cycle time that forwards the error
    /// unchanged. All limits and the overshoot adaptation are disabled.
    pub fn pass_through() -> Self {
        TuningConfig {
            kp: F::one(),
            ki: F::zero(),
            kd: F::zero(),
            dt: F::one(),
            max: None,
            min: None,
            max_dv: None,
            overshoot_integral_adaptation: None,
        }
    }

    /// Convenience method that returns the proportional, integral, and derivative gains together as a tuple.
    pub fn gains(&self) -> (F, F, F) {
        (self.kp, self.ki, self.kd)
    }

    /// Returns the effective lower output bound: `min` if set, otherwise `-max` if `max` is set.
    pub fn lower_bound(&self) -> Option<F> {
        match (self.min, self.max) {
            (Some(min), _) => Some(min),
            (None, Some(max)) => Some(-max),
            (None, None) => None,
        }
    }

    /// Checks the configuration for values that would make the controller misbehave.
    ///
    /// # Returns
    /// - `Ok(())` if the configuration is usable.
    /// - `Err(TuningError)` describing the first problem found otherwise.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(TuningError::InvalidGain);
        }

        if !self.dt.is_finite() || self.dt <= F::zero() {
            return Err(TuningError::InvalidSampleTime);
        }

        if self.max.map_or(false, F::is_nan) || self.min.map_or(false, F::is_nan) {
            return Err(TuningError::InvalidOutputLimits);
        }
        if let (Some(lower), Some(upper)) = (self.lower_bound(), self.max) {
            if lower > upper {
                return Err(TuningError::InvalidOutputLimits);
            }
        }

        if let Some(max_dv) = self.max_dv {
            if !max_dv.is_finite() || max_dv <= F::zero() {
                return Err(TuningError::InvalidSlewRate);
            }
        }

        if let Some(adaptation) = self.overshoot_integral_adaptation {
            if !adaptation.is_finite() {
                return Err(TuningError::InvalidOvershootAdaptation);
            }
        }

        Ok(())
    }
}

/// Builder for [`TuningConfig`]. Starts from [`TuningConfig::pass_through`] and validates the
/// result in [`TuningConfigBuilder::build`].
#[derive(Debug, Clone, Copy)]
pub struct TuningConfigBuilder<F> {
    config: TuningConfig<F>,
}

impl<F: FloatCore> Default for TuningConfigBuilder<F> {
    fn default() -> Self {
        Self {
            config: TuningConfig::pass_through(),
        }
    }
}

impl<F: FloatCore> TuningConfigBuilder<F> {
    /// Sets the proportional gain.
    pub fn kp(mut self, kp: F) -> Self {
        self.config.kp = kp;
        self
    }

    /// Sets the integral gain.
    pub fn ki(mut self, ki: F) -> Self {
        self.config.ki = ki;
        self
    }

    /// Sets the derivative gain.
    pub fn kd(mut self, kd: F) -> Self {
        self.config.kd = kd;
        self
    }

    /// Sets the control-cycle duration in the caller's time unit.
    pub fn dt(mut self, dt: F) -> Self {
        self.config.dt = dt;
        self
    }

    /// Sets the control-cycle duration from a [`Duration`], in seconds.
    ///
    /// A duration that cannot be represented by `F` is stored as NaN and rejected by `build`.
    pub fn sample_time(mut self, sample_time: Duration) -> Self {
        self.config.dt = num_traits::cast(sample_time.as_secs_f64()).unwrap_or_else(F::nan);
        self
    }

    /// Sets the upper output bound.
    pub fn max(mut self, max: F) -> Self {
        self.config.max = Some(max);
        self
    }

    /// Sets the lower output bound.
    pub fn min(mut self, min: F) -> Self {
        self.config.min = Some(min);
        self
    }

    /// Sets both output bounds at once.
    pub fn output_limits(self, min: F, max: F) -> Self {
        self.min(min).max(max)
    }

    /// Sets the maximum output change per unit time.
    pub fn max_dv(mut self, max_dv: F) -> Self {
        self.config.max_dv = Some(max_dv);
        self
    }

    /// Enables overshoot-adaptive integral offloading with the given gain.
    pub fn overshoot_integral_adaptation(mut self, adaptation: F) -> Self {
        self.config.overshoot_integral_adaptation = Some(adaptation);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<TuningConfig<F>, TuningError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pass_through() {
        let config = TuningConfig::<f64>::default();
        assert_eq!(config.gains(), (1.0, 0.0, 0.0));
        assert_eq!(config.dt, 1.0);
        assert_eq!(config.max, None);
        assert_eq!(config.min, None);
        assert_eq!(config.max_dv, None);
        assert_eq!(config.overshoot_integral_adaptation, None);
        assert_eq!(config, TuningConfig::pass_through());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lower_bound_mirrors_max() {
        let mut config = TuningConfig::<f64>::default();
        assert_eq!(config.lower_bound(), None);

        config.max = Some(100.0);
        assert_eq!(config.lower_bound(), Some(-100.0));

        config.min = Some(-20.0);
        assert_eq!(config.lower_bound(), Some(-20.0));

        // A lone lower bound is honoured as well
        config.max = None;
        assert_eq!(config.lower_bound(), Some(-20.0));
    }

    #[test]
    fn test_validate_sample_time() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let config = TuningConfig { dt, ..TuningConfig::default() };
            assert_eq!(config.validate(), Err(TuningError::InvalidSampleTime));
        }
    }

    #[test]
    fn test_validate_limits() {
        let inverted = TuningConfig {
            max: Some(1.0),
            min: Some(2.0),
            ..TuningConfig::<f64>::default()
        };
        assert_eq!(inverted.validate(), Err(TuningError::InvalidOutputLimits));

        // Negative max with mirrored lower bound yields lower > upper
        let negative_max = TuningConfig {
            max: Some(-1.0),
            ..TuningConfig::<f64>::default()
        };
        assert_eq!(
            negative_max.validate(),
            Err(TuningError::InvalidOutputLimits)
        );

        let nan_min = TuningConfig {
            min: Some(f64::NAN),
            ..TuningConfig::<f64>::default()
        };
        assert_eq!(nan_min.validate(), Err(TuningError::InvalidOutputLimits));
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert_eq!(
            TuningConfigBuilder::<f64>::default()
                .kd(f64::INFINITY)
                .build()
                .map(|_| ()),
            Err(TuningError::InvalidGain)
        );
        assert_eq!(
            TuningConfigBuilder::<f64>::default()
                .max_dv(0.0)
                .build()
                .map(|_| ()),
            Err(TuningError::InvalidSlewRate)
        );
        assert_eq!(
            TuningConfigBuilder::<f64>::default()
                .overshoot_integral_adaptation(f64::NAN)
                .build()
                .map(|_| ()),
            Err(TuningError::InvalidOvershootAdaptation)
        );
    }

    #[test]
    fn test_builder_sample_time() {
        let config = TuningConfigBuilder::<f64>::default()
            .sample_time(Duration::from_millis(100))
            .build()
            .unwrap();
        assert_eq!(config.dt, 0.1);

        assert_eq!(
            TuningConfigBuilder::<f64>::default()
                .sample_time(Duration::ZERO)
                .build()
                .map(|_| ()),
            Err(TuningError::InvalidSampleTime)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_with_unset_fields() {
        let config: TuningConfig<f64> =
            serde_json::from_str(r#"{"kp": 0.1, "ki": 0.5, "kd": 0.01, "dt": 0.1, "max": 100.0}"#)
                .unwrap();
        assert_eq!(config.gains(), (0.1, 0.5, 0.01));
        assert_eq!(config.max, Some(100.0));
        assert_eq!(config.lower_bound(), Some(-100.0));
        assert_eq!(config.max_dv, None);
        assert_eq!(config.overshoot_integral_adaptation, None);
    }
}
