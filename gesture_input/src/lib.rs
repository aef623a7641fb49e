//! # gesture_input
//!
//! Turns a stream of hand-tracking frames into discrete host input:
//! pointer warps, primary-button press/release, wheel clicks and keyboard
//! chords.
//!
//! ## Frame → event mapping
//!
//! | Signal | Condition | Events |
//! |---|---|---|
//! | Palm position | hand in view, not a fist | pointer warp |
//! | Pinch strength | crosses the threshold up / down | primary button press / release |
//! | Circle | each whole revolution | wheel down (clockwise) / up, scaled by radius |
//! | Swipe | first frame of the gesture | bound key chord for (finger, direction) |
//! | Key tap, screen tap | any | diagnostic line only |
//!
//! Frame acquisition and event injection live outside this crate: callers
//! pass frames in and supply an [`InputSink`].
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_input::{Frame, Hand, RecordingSink, TranslatorConfig, Translator, Vector};
//!
//! let cfg = TranslatorConfig::default().resolve().unwrap();
//! let mut translator = Translator::new(cfg);
//! let mut sink = RecordingSink::new();
//!
//! let previous = Frame::new(1);
//! let current  = Frame::new(2).with_hand(Hand::new(Vector::new(0.0, 200.0, 0.0), 0.0, 0.99));
//! translator.process(&current, &previous, &mut sink);
//!
//! assert!(translator.is_pressed());
//! assert_eq!(sink.events().len(), 2); // warp + button press
//! ```

pub mod chord;
pub mod circle;
pub mod config;
pub mod dispatch;
pub mod frame;
pub mod mapper;
pub mod pointer;
pub mod sink;
pub mod translator;

pub use chord::{Chord, KeyCode, KeyStroke, SwipeBindings, SwipeDirection};
pub use circle::Rotation;
pub use config::{ButtonCode, ConfigError, ResolvedConfig, TranslatorConfig};
pub use frame::{FingerType, Frame, Gesture, GestureKind, GestureState, Hand, Vector};
pub use mapper::CoordinateMapper;
pub use sink::{deliver, InputEvent, InputSink, NullSink, RecordingSink, SinkError};
pub use translator::{FrameOutcome, FrameReport, Translator};
