//! Circle gesture → scroll ticks.
//!
//! The sensor reports a circle's progress as cumulative revolutions since the
//! gesture started.  A tick is one whole revolution boundary crossed between
//! the previous frame and this one, for the same gesture id.

use crate::config::ScrollConfig;
use crate::frame::{Frame, Gesture, Vector};

/// Rotation sense of a circle, judged from the circle's own vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Clockwise iff the pointing direction is within 90° of the normal.
    pub fn classify(pointable_direction: &Vector, normal: &Vector) -> Self {
        if pointable_direction.within_right_angle(normal) {
            Rotation::Clockwise
        } else {
            Rotation::CounterClockwise
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rotation::Clockwise        => "clockwise",
            Rotation::CounterClockwise => "counterclockwise",
        }
    }
}

/// Progress of the same circle in the previous frame, 0 when it was not
/// there (or was not a circle).
pub fn previous_progress(id: i32, previous: &Frame) -> f32 {
    previous
        .gesture(id)
        .and_then(Gesture::circle_progress)
        .unwrap_or(0.0)
}

/// Whole revolutions completed since the previous frame.  Jitter that makes
/// the difference negative yields 0.
pub fn tick_count(current_progress: f32, previous_progress: f32) -> u32 {
    let delta = current_progress.floor() - previous_progress.floor();
    if delta > 0.0 { delta as u32 } else { 0 }
}

/// Scroll repetitions per tick for a circle of `radius`.
///
/// The counter-clockwise bias differs from the clockwise one by default, so
/// small counter-clockwise circles do not scroll at all.
pub fn repetitions_per_tick(radius: f32, rotation: Rotation, cfg: &ScrollConfig) -> u32 {
    let bias = match rotation {
        Rotation::Clockwise        => cfg.clockwise_radius_bias,
        Rotation::CounterClockwise => cfg.counter_clockwise_radius_bias,
    };
    let reps = ((radius - bias) / cfg.radius_divisor).floor();
    if reps > 0.0 { reps as u32 } else { 0 }
}
