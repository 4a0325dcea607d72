// Discrete PID control law with slew-rate limiting, anti-windup and overshoot adaptation
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

use num_traits::float::FloatCore;
use num_traits::Zero;

use crate::config::TuningConfig;

/// Three-way sign of `value`: `1` if positive, `-1` if negative and `0` otherwise.
///
/// Values that compare neither greater nor less than zero, such as NaN, yield `0`.
pub fn sign<T: PartialOrd + Zero>(value: T) -> i8 {
    let zero = T::zero();
    (zero < value) as i8 - (value < zero) as i8
}

/// How hard the controller was overshooting when the integral offload kicked in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Overshoot {
    /// The error grew while the output opposed the error's rate of change.
    Mild,
    /// As `Mild`, with the derivative of the error exceeding the adaptation gain in magnitude.
    Strong,
}

/// Breakdown of one controller update.
///
/// Produced alongside every output; reading it never influences the controller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlOutput<F> {
    /// Setpoint minus measurement.
    pub error: F,
    /// Contribution of the P term.
    pub p: F,
    /// Contribution of the I term, after any overshoot offload.
    pub i: F,
    /// Contribution of the D term.
    pub d: F,
    /// Rate of change of the error.
    pub derivative: F,
    /// The bounded output returned to the caller.
    pub output: F,
    /// Whether slew-rate or range clamping altered the output.
    pub limited: bool,
    /// Set if the overshoot-adaptive integral offload fired this cycle.
    pub overshoot: Option<Overshoot>,
}

/// Running state carried between controller updates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidState<F> {
    previous_output: F,
    previous_error: F,
    integral: F,
}

impl<F: FloatCore> Default for PidState<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FloatCore> PidState<F> {
    /// Zeroed state, as for a controller that has never run.
    pub fn new() -> Self {
        Self::with_output(F::zero())
    }

    /// Zeroed state except for the previous output, so that slew-rate limiting ramps from
    /// `output` rather than from zero.
    pub fn with_output(output: F) -> Self {
        Self {
            previous_output: output,
            previous_error: F::zero(),
            integral: F::zero(),
        }
    }

    /// The output returned by the last update.
    pub fn previous_output(&self) -> F {
        self.previous_output
    }

    /// The error seen by the last update.
    pub fn previous_error(&self) -> F {
        self.previous_error
    }

    /// Accumulated error over time. This is not yet scaled by the integral gain.
    pub fn integral(&self) -> F {
        self.integral
    }

    /// Clears the accumulated integral, leaving the other state untouched.
    pub fn reset_integral(&mut self) {
        self.integral = F::zero();
    }
}

/// Computes one control cycle.
///
/// This function is pure: it takes the state by value and returns the next state together with
/// the output breakdown. [`PidController`] wraps it for callers who prefer the controller to own
/// its state.
///
/// The configuration is not validated. A zero or NaN `dt` produces a NaN output and the NaN is
/// carried into the returned state.
pub fn compute<F: FloatCore>(
    mut state: PidState<F>,
    setpoint: F,
    measurement: F,
    config: &TuningConfig<F>,
) -> (ControlOutput<F>, PidState<F>) {
    let dt = config.dt;
    let error = setpoint - measurement;

    let p = config.kp * error;

    let previous_integral = state.integral;
    state.integral = state.integral + error * dt;
    let mut i = config.ki * state.integral;

    let derivative = (error - state.previous_error) / dt;
    let d = config.kd * derivative;

    let mut output = p + i + d;

    // Offload the integral when the error grows while the output opposes its rate of change
    let mut overshoot = None;
    if let Some(adaptation) = config.overshoot_integral_adaptation {
        if error.abs() > state.previous_error.abs() && sign(derivative) != sign(output) {
            state.integral = state.integral + error * adaptation;
            i = config.ki * state.integral;
            output = p + i + d;
            overshoot = Some(if derivative.abs() > adaptation {
                Overshoot::Strong
            } else {
                Overshoot::Mild
            });
        }
    }

    let mut limited = false;

    if let Some(max_dv) = config.max_dv {
        let delta_v = (output - state.previous_output) / dt;
        if delta_v > max_dv {
            output = state.previous_output + max_dv * dt;
            limited = true;
        } else if delta_v < -max_dv {
            output = state.previous_output - max_dv * dt;
            limited = true;
        }
    }

    // Range clamping runs last and may override the slew-rate clamp
    match (config.max, config.lower_bound()) {
        (Some(max), _) if output > max => {
            output = max;
            limited = true;
        }
        (_, Some(min)) if output < min => {
            output = min;
            limited = true;
        }
        _ => {}
    }

    // Undo integral growth that contributed to saturation; shrinkage is kept
    if limited && previous_integral.abs() < state.integral.abs() {
        state.integral = previous_integral;
    }

    state.previous_error = error;
    state.previous_output = output;

    let report = ControlOutput {
        error,
        p,
        i,
        d,
        derivative,
        output,
        limited,
        overshoot,
    };

    #[cfg(feature = "tracing")]
    trace_cycle(&report);

    (report, state)
}

#[cfg(feature = "tracing")]
fn trace_cycle<F: FloatCore>(report: &ControlOutput<F>) {
    let f = |x: F| x.to_f64().unwrap_or(f64::NAN);
    tracing::trace!(
        error = f(report.error),
        p = f(report.p),
        i = f(report.i),
        d = f(report.d),
        output = f(report.output),
        limited = report.limited,
        overshoot = ?report.overshoot,
        "pid update"
    );
}

/// A stateful PID controller.
///
/// Holds the running state for exactly one control loop; the tuning is supplied on every call
/// and may change between calls. Concurrent use of one instance must be serialized by the caller.
#[derive(Copy, Clone, Debug)]
pub struct PidController<F> {
    state: PidState<F>,
}

impl<F: FloatCore> Default for PidController<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FloatCore> PidController<F> {
    /// Creates a controller with zeroed state.
    pub fn new() -> Self {
        Self::from_state(PidState::new())
    }

    /// Creates a controller that resumes from `state`.
    pub fn from_state(state: PidState<F>) -> Self {
        Self { state }
    }

    /// Runs one control cycle and returns the bounded output.
    pub fn update(&mut self, setpoint: F, measurement: F, config: &TuningConfig<F>) -> F {
        self.update_detailed(setpoint, measurement, config).output
    }

    /// Runs one control cycle and returns the full breakdown of the computation.
    pub fn update_detailed(
        &mut self,
        setpoint: F,
        measurement: F,
        config: &TuningConfig<F>,
    ) -> ControlOutput<F> {
        let (report, state) = compute(self.state, setpoint, measurement, config);
        self.state = state;
        report
    }

    /// Returns the running state.
    pub fn state(&self) -> &PidState<F> {
        &self.state
    }

    /// The output returned by the last update.
    pub fn previous_output(&self) -> F {
        self.state.previous_output
    }

    /// The error seen by the last update.
    pub fn previous_error(&self) -> F {
        self.state.previous_error
    }

    /// Accumulated error over time.
    pub fn integral(&self) -> F {
        self.state.integral
    }

    /// Clears the accumulated integral.
    pub fn reset_integral(&mut self) {
        self.state.reset_integral();
    }

    /// Returns the controller to its freshly constructed state.
    pub fn reset(&mut self) {
        self.state = PidState::new();
    }
}
