//! Keyboard simulation of a hand-tracking device.
//!
//! [`SimState`] turns one frame's worth of [`SimInput`] into a [`Frame`] with
//! a fresh id, so everything downstream of the frame source can be driven
//! without hardware.  Gestures follow the device's lifecycle: a swipe is
//! reported Start → Update → Stop over three frames, a circle reports
//! cumulative progress while its key is held and Stop on release, and taps
//! appear once in the Stop state.

use gesture_input::{
    FingerType, Frame, Gesture, GestureKind, GestureState, Hand, Rotation, SwipeDirection, Vector,
};

/// Palm travel per frame while an arrow key is held (mm).
pub const PALM_STEP: f32 = 4.0;
/// Circle progress per frame while a circle key is held (revolutions).
pub const CIRCLE_STEP: f32 = 0.1;
/// Radius of simulated circles (mm); three wheel clicks per revolution.
pub const CIRCLE_RADIUS: f32 = 15.0;
const SWIPE_SPEED: f32 = 1200.0;

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Keyboard state sampled for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimInput {
    /// Palm movement this frame, in steps (-1, 0 or 1 per axis).
    pub dx:         i8,
    pub dy:         i8,
    pub pinch:      bool,
    pub fist:       bool,
    /// Finger chosen for subsequent swipes.
    pub finger:     Option<FingerType>,
    /// Newly pressed swipe key.
    pub swipe:      Option<SwipeDirection>,
    /// Held circle key.
    pub circle:     Option<Rotation>,
    pub key_tap:    bool,
    pub screen_tap: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// SimState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
struct SimSwipe {
    id:        i32,
    direction: SwipeDirection,
    finger:    FingerType,
    state:     GestureState,
}

#[derive(Clone, Copy, Debug)]
struct SimCircle {
    id:       i32,
    rotation: Rotation,
    progress: f32,
}

#[derive(Debug)]
pub struct SimState {
    next_frame_id:   u64,
    next_gesture_id: i32,
    palm:            Vector,
    finger:          FingerType,
    swipe:           Option<SimSwipe>,
    circle:          Option<SimCircle>,
}

impl SimState {
    pub fn new(palm: Vector) -> Self {
        SimState {
            next_frame_id:   1,
            next_gesture_id: 1,
            palm,
            finger:          FingerType::Index,
            swipe:           None,
            circle:          None,
        }
    }

    pub fn palm(&self) -> Vector {
        self.palm
    }

    pub fn finger(&self) -> FingerType {
        self.finger
    }

    fn gesture_id(&mut self) -> i32 {
        let id = self.next_gesture_id;
        self.next_gesture_id += 1;
        id
    }

    /// Build the next frame.
    pub fn step(&mut self, input: &SimInput) -> Frame {
        let mut frame = Frame::new(self.next_frame_id);
        self.next_frame_id += 1;

        self.palm.x += f32::from(input.dx) * PALM_STEP;
        self.palm.y += f32::from(input.dy) * PALM_STEP;
        if let Some(finger) = input.finger {
            self.finger = finger;
        }
        frame.hands.push(Hand::new(
            self.palm,
            if input.fist  { 1.0 } else { 0.0 },
            if input.pinch { 1.0 } else { 0.0 },
        ));

        self.step_swipe(input, &mut frame);
        self.step_circle(input, &mut frame);

        let tap_direction = Vector::new(0.0, -1.0, 0.0);
        if input.key_tap {
            let id = self.gesture_id();
            frame.gestures.push(Gesture::new(id, GestureState::Stop, GestureKind::KeyTap {
                position:  self.palm,
                direction: tap_direction,
            }));
        }
        if input.screen_tap {
            let id = self.gesture_id();
            frame.gestures.push(Gesture::new(id, GestureState::Stop, GestureKind::ScreenTap {
                position:  self.palm,
                direction: Vector::new(0.0, 0.0, -1.0),
            }));
        }
        frame
    }

    fn step_swipe(&mut self, input: &SimInput, frame: &mut Frame) {
        // Advance the swipe in flight; a new key press replaces it.
        self.swipe = match (self.swipe, input.swipe) {
            (_, Some(direction)) => Some(SimSwipe {
                id: self.gesture_id(),
                direction,
                finger: self.finger,
                state: GestureState::Start,
            }),
            (Some(s), None) => match s.state {
                GestureState::Start => Some(SimSwipe { state: GestureState::Update, ..s }),
                GestureState::Update => Some(SimSwipe { state: GestureState::Stop, ..s }),
                _ => None,
            },
            (None, None) => None,
        };

        if let Some(s) = self.swipe {
            let direction = match s.direction {
                SwipeDirection::Up    => Vector::new(0.0, 1.0, 0.0),
                SwipeDirection::Down  => Vector::new(0.0, -1.0, 0.0),
                SwipeDirection::Left  => Vector::new(-1.0, 0.0, 0.0),
                SwipeDirection::Right => Vector::new(1.0, 0.0, 0.0),
            };
            frame.gestures.push(Gesture::new(s.id, s.state, GestureKind::Swipe {
                direction,
                speed:  SWIPE_SPEED,
                finger: Some(s.finger),
            }));
        }
    }

    fn step_circle(&mut self, input: &SimInput, frame: &mut Frame) {
        if let (Some(c), Some(rotation)) = (self.circle, input.circle) {
            if c.rotation == rotation {
                let c = SimCircle { progress: c.progress + CIRCLE_STEP, ..c };
                self.circle = Some(c);
                frame.gestures.push(circle_gesture(&c, GestureState::Update));
                return;
            }
        }

        // Released, or switched direction: the old circle stops first.
        if let Some(c) = self.circle.take() {
            frame.gestures.push(circle_gesture(&c, GestureState::Stop));
        }
        if let Some(rotation) = input.circle {
            let c = SimCircle { id: self.gesture_id(), rotation, progress: CIRCLE_STEP };
            self.circle = Some(c);
            frame.gestures.push(circle_gesture(&c, GestureState::Start));
        }
    }
}

fn circle_gesture(c: &SimCircle, state: GestureState) -> Gesture {
    let normal = Vector::new(0.0, 0.0, -1.0);
    let pointable_direction = match c.rotation {
        Rotation::Clockwise        => Vector::new(0.0, 0.3, -1.0),
        Rotation::CounterClockwise => Vector::new(0.0, 0.3, 1.0),
    };
    Gesture::new(c.id, state, GestureKind::Circle {
        progress: c.progress,
        radius:   CIRCLE_RADIUS,
        normal,
        pointable_direction,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_input::{InputEvent, RecordingSink, Translator, TranslatorConfig};

    fn sim() -> SimState {
        SimState::new(Vector::new(0.0, 200.0, 0.0))
    }

    fn idle() -> SimInput {
        SimInput::default()
    }

    #[test]
    fn frame_ids_increase() {
        let mut s = sim();
        let a = s.step(&idle());
        let b = s.step(&idle());
        assert!(b.id > a.id);
    }

    #[test]
    fn arrows_move_palm() {
        let mut s = sim();
        let f = s.step(&SimInput { dx: 1, dy: -1, ..idle() });
        let palm = f.primary_hand().unwrap().palm_position;
        assert_eq!(palm, Vector::new(PALM_STEP, 200.0 - PALM_STEP, 0.0));
        assert_eq!(s.palm(), palm);
    }

    #[test]
    fn pinch_and_fist_set_strengths() {
        let mut s = sim();
        let f = s.step(&SimInput { pinch: true, fist: true, ..idle() });
        let hand = f.primary_hand().unwrap();
        assert_eq!(hand.pinch_strength, 1.0);
        assert_eq!(hand.grab_strength, 1.0);
    }

    #[test]
    fn swipe_runs_start_update_stop() {
        let mut s = sim();
        let start = SimInput {
            finger: Some(FingerType::Pinky),
            swipe:  Some(SwipeDirection::Down),
            ..idle()
        };
        let states: Vec<_> = [s.step(&start), s.step(&idle()), s.step(&idle()), s.step(&idle())]
            .iter()
            .map(|f| f.gestures.first().map(|g| g.state))
            .collect();
        assert_eq!(states, vec![
            Some(GestureState::Start),
            Some(GestureState::Update),
            Some(GestureState::Stop),
            None,
        ]);
        assert_eq!(s.finger(), FingerType::Pinky);
    }

    #[test]
    fn held_circle_accumulates_then_stops() {
        let mut s = sim();
        let hold = SimInput { circle: Some(Rotation::Clockwise), ..idle() };
        let mut last = 0.0;
        for i in 0..12 {
            let f = s.step(&hold);
            let g = &f.gestures[0];
            assert_eq!(g.state, if i == 0 { GestureState::Start } else { GestureState::Update });
            last = g.circle_progress().unwrap();
        }
        assert!((last - 1.2).abs() < 1e-4);
        let f = s.step(&idle());
        assert_eq!(f.gestures[0].state, GestureState::Stop);
        assert!(s.step(&idle()).gestures.is_empty());
    }

    #[test]
    fn switching_direction_stops_the_old_circle() {
        let mut s = sim();
        let cw  = SimInput { circle: Some(Rotation::Clockwise), ..idle() };
        let ccw = SimInput { circle: Some(Rotation::CounterClockwise), ..idle() };
        let first = s.step(&cw).gestures[0].id;
        s.step(&cw);
        let f = s.step(&ccw);
        assert_eq!(f.gestures.len(), 2);
        assert_eq!((f.gestures[0].id, f.gestures[0].state), (first, GestureState::Stop));
        assert_ne!(f.gestures[1].id, first);
        assert_eq!(f.gestures[1].state, GestureState::Start);
        let next = s.step(&ccw);
        assert_eq!(next.gestures.len(), 1);
        assert_eq!(next.gestures[0].state, GestureState::Update);
    }

    #[test]
    fn taps_are_single_stop_gestures() {
        let mut s = sim();
        let f = s.step(&SimInput { key_tap: true, screen_tap: true, ..idle() });
        assert_eq!(f.gestures.len(), 2);
        assert!(f.gestures.iter().all(|g| g.state == GestureState::Stop));
        assert_ne!(f.gestures[0].id, f.gestures[1].id);
    }

    // ── end to end through the translator ────────────────────────────────
    #[test]
    fn simulated_revolution_scrolls_down() {
        let mut s = sim();
        let mut t = Translator::new(TranslatorConfig::default().resolve().unwrap());
        let mut sink = RecordingSink::new();
        let hold = SimInput { circle: Some(Rotation::Clockwise), ..idle() };
        let mut prev = Frame::new(0);
        for _ in 0..12 {
            let f = s.step(&hold);
            t.process(&f, &prev, &mut sink);
            prev = f;
        }
        let wheel = sink.events().iter()
            .filter(|e| matches!(e, InputEvent::Button { code: 5, pressed: true }))
            .count();
        // floor(15 / 5) clicks for the one revolution crossed
        assert_eq!(wheel, 3);
    }
}
