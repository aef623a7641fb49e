//! The per-frame entry point.
//!
//! `Translator` owns every piece of cross-frame state (the button latch, the
//! swipe registry and the last processed frame id), so independent instances
//! never interfere.  Calls must be serialised by the caller.

use tracing::trace;

use crate::config::ResolvedConfig;
use crate::dispatch::{GestureDispatcher, SwipeFiring};
use crate::frame::Frame;
use crate::mapper::CoordinateMapper;
use crate::pointer::{Latch, PointerState};
use crate::sink::{deliver, InputEvent, InputSink, SinkError};

/// What one `process` call did.
#[derive(Debug)]
pub enum FrameOutcome {
    /// Same frame id as last time; nothing evaluated, nothing sent.
    Unchanged,
    Processed(FrameReport),
}

#[derive(Debug, Default)]
pub struct FrameReport {
    /// Events sent to the sink, in order.
    pub events:   Vec<InputEvent>,
    /// Delivery failures.  Never retried.
    pub warnings: Vec<SinkError>,
}

pub struct Translator {
    pointer:       PointerState,
    dispatcher:    GestureDispatcher,
    last_frame_id: Option<u64>,
}

impl Translator {
    pub fn new(cfg: ResolvedConfig) -> Self {
        let mapper = CoordinateMapper::new(cfg.mapper);
        Translator {
            pointer:       PointerState::new(mapper, cfg.click, cfg.buttons.primary),
            dispatcher:    GestureDispatcher::new(&cfg),
            last_frame_id: None,
        }
    }

    /// Evaluate `current` against `previous` and deliver the resulting batch
    /// to `sink`, flushing once.  A frame id seen on the previous call is
    /// skipped.
    pub fn process(
        &mut self,
        current:  &Frame,
        previous: &Frame,
        sink:     &mut dyn InputSink,
    ) -> FrameOutcome {
        if self.last_frame_id == Some(current.id) {
            trace!(id = current.id, "frame unchanged");
            return FrameOutcome::Unchanged;
        }
        self.last_frame_id = Some(current.id);

        let events = self.translate(current, previous);
        let warnings = deliver(&events, sink);
        FrameOutcome::Processed(FrameReport { events, warnings })
    }

    /// Pointer step, then gesture dispatch.  No id gate, no sink.
    pub fn translate(&mut self, current: &Frame, previous: &Frame) -> Vec<InputEvent> {
        let mut events = Vec::new();
        self.pointer.step(current.primary_hand(), &mut events);
        self.dispatcher.dispatch(current, previous, &mut events);
        events
    }

    pub fn is_pressed(&self) -> bool {
        self.pointer.latch() == Latch::Pressed
    }

    pub fn swipe_firing(&self, id: i32) -> SwipeFiring {
        self.dispatcher.swipe_firing(id)
    }

    pub fn last_frame_id(&self) -> Option<u64> {
        self.last_frame_id
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
