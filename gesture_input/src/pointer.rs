//! Pointer motion and pinch-click latch.
//!
//! Runs once per processed frame.  A closed fist freezes the pointer and the
//! button; otherwise the pointer follows the palm and the primary button
//! follows the pinch, with press and release emitted only on the edges.

use tracing::{debug, trace};

use crate::config::{ButtonCode, ClickConfig};
use crate::frame::Hand;
use crate::mapper::CoordinateMapper;
use crate::sink::InputEvent;

/// State of the primary mouse button as this machine last drove it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Latch {
    #[default]
    Released,
    Pressed,
}

#[derive(Clone, Debug)]
pub struct PointerState {
    mapper:  CoordinateMapper,
    click:   ClickConfig,
    button:  ButtonCode,
    latch:   Latch,
}

impl PointerState {
    pub fn new(mapper: CoordinateMapper, click: ClickConfig, button: ButtonCode) -> Self {
        PointerState { mapper, click, button, latch: Latch::Released }
    }

    pub fn latch(&self) -> Latch {
        self.latch
    }

    /// Evaluate one frame's primary hand, appending events to `out`.
    ///
    /// With no hand the latch is left alone: a held button stays held until a
    /// later frame sees the hand again.
    pub fn step(&mut self, hand: Option<&Hand>, out: &mut Vec<InputEvent>) {
        let Some(hand) = hand else {
            trace!("no primary hand; pointer untouched");
            return;
        };

        // Exact equality: a near-fist still moves the pointer.
        if hand.grab_strength == self.click.fist_grab_strength {
            trace!("fist closed; pointer and button frozen");
            return;
        }

        let (x, y) = self.mapper.map(&hand.palm_position);
        out.push(InputEvent::WarpPointer { x, y });

        let pinched = hand.pinch_strength >= self.click.pinch_threshold;
        match (self.latch, pinched) {
            (Latch::Released, true) => {
                debug!(pinch = hand.pinch_strength, "pinch closed; button press");
                self.latch = Latch::Pressed;
                out.push(InputEvent::Button { code: self.button, pressed: true });
            }
            (Latch::Pressed, false) => {
                debug!(pinch = hand.pinch_strength, "pinch opened; button release");
                self.latch = Latch::Released;
                out.push(InputEvent::Button { code: self.button, pressed: false });
            }
            _ => {}
        }
    }
}
