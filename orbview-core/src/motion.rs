/// Per-frame motion policies for tracked bodies
use nalgebra::Vector3;
use std::f64::consts::TAU;

/// Mutable per-body state a motion rule carries between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    /// Current revolution angle in radians, kept in `[0, 2π)`.
    pub angle: f64,
}

impl MotionState {
    pub fn with_angle(angle: f64) -> Self {
        Self {
            angle: wrap_angle(angle),
        }
    }
}

/// Wrap into `[0, 2π)`. `rem_euclid` rounds tiny negative inputs up to `TAU`.
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// How a body moves each tick.
///
/// `dt` is measured in frames: 1.0 is one nominal 60 Hz frame, so a
/// revolution `speed` is radians per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionRule {
    /// Circles the Z axis at a fixed radius, keeping the body's z.
    AngularRevolution { speed: f64, radius: f64 },
    /// Walks x towards zero by `step` per tick, halting once x equals `target`.
    LinearOscillation { step: f64, target: f64 },
    Stationary,
}

impl MotionRule {
    pub fn advance(&self, position: &mut Vector3<f64>, state: &mut MotionState, dt: f64) {
        match *self {
            MotionRule::AngularRevolution { speed, radius } => {
                state.angle = wrap_angle(state.angle + speed * dt);
                let (sin, cos) = state.angle.sin_cos();
                position.x = radius * cos;
                position.y = radius * sin;
            }
            MotionRule::LinearOscillation { step, target } => {
                let x = position.x;
                if x < 0.0 {
                    position.x = x + step;
                } else if x > 0.0 && x != target {
                    position.x = x - step;
                }
            }
            MotionRule::Stationary => {}
        }
    }
}
