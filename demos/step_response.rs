//! Runs the bare closed loop `measurement += output` and then the step response of a
//! mass-spring-damper system under PID control, printing one line per cycle.
//! This example requires the `--features simulation` flag to be enabled.
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

#[cfg(feature = "simulation")]
pub fn main() {
    use nalgebra as na;

    use adaptive_pid::{config::TuningConfigBuilder, pid::PidController, sim};

    let cfg = TuningConfigBuilder::default()
        .kp(0.1)
        .ki(0.5)
        .kd(0.01)
        .dt(0.1)
        .output_limits(-100.0, 100.0)
        .build()
        .unwrap();
    let mut pid = PidController::new();
    let mut plant = sim::Accumulator { value: 20.0 };

    for _ in 0..100 {
        let val = plant.value;
        let inc = pid.update(0.0, val, &cfg);
        println!("val:{val:8.3} inc:{inc:8.3}");
        plant.step(inc);
    }

    const FIXED_STEP_SIZE_S: f64 = 0.01;

    let cfg = TuningConfigBuilder::default()
        .kp(1.0)
        .ki(0.5)
        .kd(0.2)
        .dt(FIXED_STEP_SIZE_S)
        .max(10.0)
        .max_dv(50.0)
        .overshoot_integral_adaptation(0.05)
        .build()
        .unwrap();
    let mut pid = PidController::new();

    let mdl = sim::MassSpringDamper {
        natural_frequency: 0.5 * std::f64::consts::PI,
        damping_ratio: 0.2,
    };

    let mut state = na::Vector2::<f64>::zeros();
    let mut output: f64 = 0.0;

    for i in 0..2000usize {
        let setpoint = if (i / 1000) % 2 == 0 { 1.0 } else { 0.0 };
        let report = pid.update_detailed(setpoint, output, &cfg);
        state = sim::rk4_step(|x| mdl.f(x, report.output), state, FIXED_STEP_SIZE_S);
        output = mdl.h(state);

        let t = i as f64 * FIXED_STEP_SIZE_S;
        println!(
            "t:{t:6.2} setpoint:{setpoint:5.2} output:{output:8.4} p:{:8.4} i:{:8.4} d:{:8.4} limited:{} overshoot:{:?}",
            report.p, report.i, report.d, report.limited, report.overshoot
        );
    }
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
