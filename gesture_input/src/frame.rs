//! Tracking-frame data model.
//!
//! A [`Frame`] is an immutable snapshot produced by a frame source: the hands
//! in view and the gestures active in that frame.  The translator only ever
//! holds the current frame and the one before it.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use serde::Deserialize;

use crate::circle::Rotation;

// ════════════════════════════════════════════════════════════════════════════
// Vector
// ════════════════════════════════════════════════════════════════════════════

/// A 3-vector in sensor space (millimetres for positions, unit length for
/// directions and normals).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector { x, y, z }
    }

    pub fn dot(&self, other: &Vector) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Angle in radians (0..=π) between two vectors.
    ///
    /// A zero-length operand yields 0, as the sensor SDK does.
    pub fn angle_to(&self, other: &Vector) -> f32 {
        let denom = self.magnitude() * other.magnitude();
        if denom <= 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    /// True when the two vectors are at most a right angle apart.
    pub fn within_right_angle(&self, other: &Vector) -> bool {
        self.angle_to(other) <= FRAC_PI_2
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// The per-hand signals the pointer state machine consults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hand {
    pub palm_position:  Vector,
    /// 0.0 = open hand, 1.0 = closed fist.
    pub grab_strength:  f32,
    /// 0.0 = apart, 1.0 = thumb and index touching.
    pub pinch_strength: f32,
}

impl Hand {
    pub fn new(palm_position: Vector, grab_strength: f32, pinch_strength: f32) -> Self {
        Hand { palm_position, grab_strength, pinch_strength }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gestures
// ════════════════════════════════════════════════════════════════════════════

/// Which digit performed a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerType {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerType {
    pub fn name(&self) -> &'static str {
        match self {
            FingerType::Thumb  => "thumb",
            FingerType::Index  => "index",
            FingerType::Middle => "middle",
            FingerType::Ring   => "ring",
            FingerType::Pinky  => "pinky",
        }
    }
}

/// Lifecycle state of a gesture instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    Invalid,
    Start,
    Update,
    Stop,
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Invalid => "Invalid",
            GestureState::Start   => "Start",
            GestureState::Update  => "Update",
            GestureState::Stop    => "Stop",
        }
    }
}

/// Variant-specific gesture attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureKind {
    Circle {
        /// Cumulative revolutions since the gesture started.  Never a
        /// per-frame delta.
        progress:            f32,
        radius:              f32,
        normal:              Vector,
        pointable_direction: Vector,
    },
    Swipe {
        direction: Vector,
        speed:     f32,
        /// `None` when the swipe was made with a tool rather than a finger.
        finger:    Option<FingerType>,
    },
    KeyTap {
        position:  Vector,
        direction: Vector,
    },
    ScreenTap {
        position:  Vector,
        direction: Vector,
    },
    /// A gesture type this crate does not know about.
    Unknown,
}

/// One recognised gesture in one frame.  `id` is stable for the lifetime of
/// the gesture instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Gesture {
    pub id:    i32,
    pub state: GestureState,
    pub kind:  GestureKind,
}

impl Gesture {
    pub fn new(id: i32, state: GestureState, kind: GestureKind) -> Self {
        Gesture { id, state, kind }
    }

    /// Circle progress, or `None` for other variants.
    pub fn circle_progress(&self) -> Option<f32> {
        match self.kind {
            GestureKind::Circle { progress, .. } => Some(progress),
            _ => None,
        }
    }
}

/// The diagnostic line logged for every processed gesture.
impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.name();
        match &self.kind {
            GestureKind::Circle { progress, radius, normal, pointable_direction } => {
                let rotation = Rotation::classify(pointable_direction, normal);
                write!(
                    f,
                    "Circle id: {}, state: {}, progress: {:.2}, radius: {:.2}, {}",
                    self.id, state, progress, radius, rotation.name()
                )
            }
            GestureKind::Swipe { direction, speed, .. } => write!(
                f,
                "Swipe id: {}, state: {}, direction: {}, speed: {:.2}",
                self.id, state, direction, speed
            ),
            GestureKind::KeyTap { position, direction } => write!(
                f,
                "Key Tap id: {}, state: {}, position: {}, direction: {}",
                self.id, state, position, direction
            ),
            GestureKind::ScreenTap { position, direction } => write!(
                f,
                "Screen Tap id: {}, state: {}, position: {}, direction: {}",
                self.id, state, position, direction
            ),
            GestureKind::Unknown => write!(f, "Unknown gesture type."),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Frame
// ════════════════════════════════════════════════════════════════════════════

/// One snapshot of tracked hands and active gestures.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Monotonically increasing; used only for change detection.
    pub id:       u64,
    pub hands:    Vec<Hand>,
    pub gestures: Vec<Gesture>,
}

impl Frame {
    pub fn new(id: u64) -> Self {
        Frame { id, hands: Vec::new(), gestures: Vec::new() }
    }

    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hands.push(hand);
        self
    }

    pub fn with_gesture(mut self, gesture: Gesture) -> Self {
        self.gestures.push(gesture);
        self
    }

    /// The first hand in the frame.  No identity is tracked across frames.
    pub fn primary_hand(&self) -> Option<&Hand> {
        self.hands.first()
    }

    /// Look up a gesture instance by id.
    pub fn gesture(&self, id: i32) -> Option<&Gesture> {
        self.gestures.iter().find(|g| g.id == id)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
