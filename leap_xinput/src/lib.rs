//! # leap_xinput
//!
//! Desktop driver for a LeapMotion controller: the palm steers the pointer,
//! a pinch holds the primary button, circles scroll and finger swipes send
//! keyboard shortcuts.  Translation lives in `gesture_input`; this crate
//! supplies the frame sources, the host sinks and the run loop.
//!
//! ## Gesture → Action mapping (default bindings)
//!
//! | Gesture | Finger | Action |
//! |---|---|---|
//! | Swipe down / up | Index | Ctrl+W / Ctrl+Shift+T |
//! | Swipe left / right | Index | Ctrl+Shift+Tab / Ctrl+Tab |
//! | Swipe up / down | Middle | Ctrl+Alt+Down / Ctrl+Alt+Up |
//! | Swipe left / right | Middle | Alt+Left / Alt+Right |
//! | Swipe down / up | Pinky | Alt+F4 / Alt+F1 |
//! | Circle clockwise / counter-clockwise | any | wheel down / up |
//! | Pinch | any | primary button |
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: a window with a keyboard-driven hand.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! Simulation keys are listed in [`window`].

pub mod app;
pub mod output;
pub mod sim;
pub mod source;
pub mod window;
