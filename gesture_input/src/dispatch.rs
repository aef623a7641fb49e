//! Gesture → input event dispatch.
//!
//! | Gesture | Fires | Output |
//! |---|---|---|
//! | Circle | every frame a revolution boundary is crossed | wheel clicks, down if clockwise, up otherwise |
//! | Swipe | once per gesture id, on its `Start` frame | the chord bound to (finger, direction) |
//! | Key tap / screen tap | never | diagnostic line only |
//!
//! Every gesture, acted on or not, gets one diagnostic line at `info`.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use crate::chord::{SwipeBindings, SwipeDirection};
use crate::circle::{self, Rotation};
use crate::config::{ButtonConfig, ResolvedConfig, ScrollConfig};
use crate::frame::{Frame, Gesture, GestureKind, GestureState};
use crate::sink::InputEvent;

/// Fired swipe ids remembered before the oldest is dropped.  Far more than
/// can be in view at once, so an evicted id is long gone from the device.
pub const FIRED_SWIPE_MEMORY: usize = 256;

/// Per-swipe-id firing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeFiring {
    Idle,
    Fired,
}

#[derive(Clone, Debug)]
pub struct GestureDispatcher {
    scroll:  ScrollConfig,
    buttons: ButtonConfig,
    swipes:  SwipeBindings,
    /// Swipe ids that have fired, most recent last.  Never reopened.
    fired:   HashSet<i32>,
    order:   VecDeque<i32>,
}

impl GestureDispatcher {
    pub fn new(cfg: &ResolvedConfig) -> Self {
        GestureDispatcher {
            scroll:  cfg.scroll,
            buttons: cfg.buttons,
            swipes:  cfg.swipes.clone(),
            fired:   HashSet::new(),
            order:   VecDeque::new(),
        }
    }

    pub fn swipe_firing(&self, id: i32) -> SwipeFiring {
        if self.fired.contains(&id) { SwipeFiring::Fired } else { SwipeFiring::Idle }
    }

    /// Dispatch every gesture in `current`, in list order, appending events
    /// to `out`.
    pub fn dispatch(&mut self, current: &Frame, previous: &Frame, out: &mut Vec<InputEvent>) {
        for gesture in &current.gestures {
            info!("  {}", gesture);
            match &gesture.kind {
                GestureKind::Circle { progress, radius, normal, pointable_direction } => {
                    let rotation = Rotation::classify(pointable_direction, normal);
                    let prev = circle::previous_progress(gesture.id, previous);
                    let ticks = circle::tick_count(*progress, prev);
                    self.scroll(ticks, *radius, rotation, out);
                }
                GestureKind::Swipe { .. } => self.swipe(gesture, out),
                GestureKind::KeyTap { .. } | GestureKind::ScreenTap { .. } => {}
                GestureKind::Unknown => {}
            }
        }
    }

    /// Idle → Fired for `id`.  False if it had already fired.
    fn mark_fired(&mut self, id: i32) -> bool {
        if !self.fired.insert(id) {
            return false;
        }
        self.order.push_back(id);
        if self.order.len() > FIRED_SWIPE_MEMORY {
            if let Some(oldest) = self.order.pop_front() {
                self.fired.remove(&oldest);
            }
        }
        true
    }

    fn scroll(&self, ticks: u32, radius: f32, rotation: Rotation, out: &mut Vec<InputEvent>) {
        let reps = circle::repetitions_per_tick(radius, rotation, &self.scroll);
        let total = ticks.saturating_mul(reps);
        if total == 0 {
            return;
        }
        let code = match rotation {
            Rotation::Clockwise        => self.buttons.scroll_down,
            Rotation::CounterClockwise => self.buttons.scroll_up,
        };
        debug!(ticks, reps, rotation = rotation.name(), "circle scroll");
        for _ in 0..total {
            out.push(InputEvent::Button { code, pressed: true });
            out.push(InputEvent::Button { code, pressed: false });
        }
    }

    fn swipe(&mut self, gesture: &Gesture, out: &mut Vec<InputEvent>) {
        let GestureKind::Swipe { direction, finger, .. } = &gesture.kind else {
            return;
        };
        if gesture.state != GestureState::Start || !self.mark_fired(gesture.id) {
            return;
        }
        let Some(finger) = finger else {
            return;
        };
        let dir = SwipeDirection::classify(direction);
        match self.swipes.lookup(*finger, dir) {
            Some(chord) => {
                debug!(id = gesture.id, finger = finger.name(), direction = dir.name(), "swipe chord");
                out.extend(chord.strokes().iter().map(|s| InputEvent::Key {
                    code:    s.code,
                    pressed: s.pressed,
                }));
            }
            None => debug!(id = gesture.id, finger = finger.name(), direction = dir.name(), "swipe unbound"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
