//! Damped spring integrator for the focus scale value.
//!
//! The spring is advanced with the closed-form solution of
//! `m·x'' + c·x' + k·x = 0` over each step, so frame timing does not affect
//! stability. Retargeting keeps the current value and velocity, which makes an
//! interrupted transition continue smoothly toward the new target.

use std::time::Duration;

use crate::config::AnimationConfig;

#[derive(Debug, Clone, Copy)]
pub struct Spring {
    params: AnimationConfig,
    value: f32,
    velocity: f32,
    target: f32,
    settled: bool,
}

impl Spring {
    /// A spring resting at `value`.
    pub fn at_rest(value: f32, params: AnimationConfig) -> Self {
        Self {
            params,
            value,
            velocity: 0.0,
            target: value,
            settled: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Point the spring at a new target, continuing from the in-flight value and velocity.
    pub fn retarget(&mut self, target: f32) {
        self.target = target;
        self.settled = self.at_rest_near_target();
        if self.settled {
            self.snap();
        }
    }

    /// Restart from an explicit state, e.g. a frame reported by a cancelled animation.
    pub fn resume_from(&mut self, value: f32, velocity: f32) {
        self.value = value;
        self.velocity = velocity;
        self.settled = self.at_rest_near_target();
        if self.settled {
            self.snap();
        }
    }

    /// Advance by `dt`. Returns true once the spring is at rest on its target.
    pub fn step(&mut self, dt: Duration) -> bool {
        if self.settled {
            return true;
        }
        let t = dt.as_secs_f64();
        let x0 = f64::from(self.value - self.target);
        let v0 = f64::from(self.velocity);
        let (x, v) = solve(
            f64::from(self.params.stiffness),
            f64::from(self.params.damping),
            f64::from(self.params.mass),
            x0,
            v0,
            t,
        );

        // Crossing the target flips the sign of the displacement.
        if self.params.overshoot_clamping && x0 != 0.0 && x.signum() != x0.signum() {
            self.snap();
            return true;
        }

        self.value = self.target + x as f32;
        self.velocity = v as f32;
        if self.at_rest_near_target() {
            self.snap();
        }
        self.settled
    }

    fn at_rest_near_target(&self) -> bool {
        (self.value - self.target).abs() <= self.params.rest_displacement
            && self.velocity.abs() <= self.params.rest_speed
    }

    fn snap(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
        self.settled = true;
    }
}

/// Displacement and velocity after `t` seconds, starting from `x0`/`v0`.
fn solve(k: f64, c: f64, m: f64, x0: f64, v0: f64, t: f64) -> (f64, f64) {
    let omega = (k / m).sqrt();
    let zeta = c / (2.0 * (k * m).sqrt());

    if zeta < 1.0 - 1e-6 {
        let a = zeta * omega;
        let wd = omega * (1.0 - zeta * zeta).sqrt();
        let b = (v0 + a * x0) / wd;
        let decay = (-a * t).exp();
        let (s, co) = (wd * t).sin_cos();
        let x = decay * (x0 * co + b * s);
        let v = decay * (v0 * co - (x0 * wd + a * b) * s);
        (x, v)
    } else if (zeta - 1.0).abs() < 1e-6 {
        let decay = (-omega * t).exp();
        let b = v0 + omega * x0;
        let x = decay * (x0 + b * t);
        let v = decay * (v0 - omega * b * t);
        (x, v)
    } else {
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        let c1 = (v0 - r2 * x0) / (r1 - r2);
        let c2 = x0 - c1;
        let e1 = (r1 * t).exp();
        let e2 = (r2 * t).exp();
        (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
    }
}
