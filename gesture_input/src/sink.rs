//! Synthetic input events and the sink that performs them.
//!
//! The translator never touches the host display directly.  It produces an
//! ordered batch of [`InputEvent`]s per frame and hands them to an
//! [`InputSink`]; [`deliver`] sends them one by one and flushes once.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::chord::KeyCode;
use crate::config::ButtonCode;

// ════════════════════════════════════════════════════════════════════════════
// InputEvent
// ════════════════════════════════════════════════════════════════════════════

/// One discrete synthetic input action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Absolute pointer move, screen pixels.  May lie off screen.
    WarpPointer { x: f32, y: f32 },
    Button { code: ButtonCode, pressed: bool },
    Key { code: KeyCode, pressed: bool },
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = |pressed: bool| if pressed { "press" } else { "release" };
        match self {
            InputEvent::WarpPointer { x, y }    => write!(f, "warp ({:.0}, {:.0})", x, y),
            InputEvent::Button { code, pressed } => write!(f, "button {} {}", code, edge(*pressed)),
            InputEvent::Key { code, pressed }    => write!(f, "key {:#04x} {}", code, edge(*pressed)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SinkError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SinkError {
    /// The host input system cannot be reached at all.
    #[error("input sink unavailable: {0}")]
    Unavailable(String),

    /// One event was refused.
    #[error("could not deliver {event}: {reason}")]
    Rejected { event: InputEvent, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// InputSink
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can perform synthetic input.  Delivery is fire-and-forget;
/// an error is reported, never retried.
pub trait InputSink {
    fn warp_pointer(&mut self, x: f32, y: f32) -> Result<(), SinkError>;
    fn send_key_event(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError>;
    fn send_button_event(&mut self, code: ButtonCode, pressed: bool) -> Result<(), SinkError>;
    /// Commit everything sent since the last flush.
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// Send `events` in order, then flush once.  Every failure is logged and
/// returned; delivery carries on past it.
pub fn deliver(events: &[InputEvent], sink: &mut dyn InputSink) -> Vec<SinkError> {
    let mut warnings = Vec::new();
    for event in events {
        let sent = match *event {
            InputEvent::WarpPointer { x, y }    => sink.warp_pointer(x, y),
            InputEvent::Button { code, pressed } => sink.send_button_event(code, pressed),
            InputEvent::Key { code, pressed }    => sink.send_key_event(code, pressed),
        };
        if let Err(e) = sent {
            warn!("{}", e);
            warnings.push(e);
        }
    }
    if let Err(e) = sink.flush() {
        warn!("{}", e);
        warnings.push(e);
    }
    warnings
}

// ── null sink ─────────────────────────────────────────────────────────────

/// Discards everything.
pub struct NullSink;

impl InputSink for NullSink {
    fn warp_pointer(&mut self, _x: f32, _y: f32) -> Result<(), SinkError> { Ok(()) }
    fn send_key_event(&mut self, _c: KeyCode, _p: bool) -> Result<(), SinkError> { Ok(()) }
    fn send_button_event(&mut self, _c: ButtonCode, _p: bool) -> Result<(), SinkError> { Ok(()) }
    fn flush(&mut self) -> Result<(), SinkError> { Ok(()) }
}

// ── recording sink ────────────────────────────────────────────────────────

/// Records delivered events, grouped by flush.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pending: Vec<InputEvent>,
    /// One entry per flush, in order.
    pub batches: Vec<Vec<InputEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink::default()
    }

    /// All flushed events, batches concatenated.
    pub fn events(&self) -> Vec<InputEvent> {
        self.batches.iter().flatten().copied().collect()
    }

    /// Events sent but not yet flushed.
    pub fn pending(&self) -> &[InputEvent] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.batches.clear();
    }
}

impl InputSink for RecordingSink {
    fn warp_pointer(&mut self, x: f32, y: f32) -> Result<(), SinkError> {
        self.pending.push(InputEvent::WarpPointer { x, y });
        Ok(())
    }

    fn send_key_event(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        self.pending.push(InputEvent::Key { code, pressed });
        Ok(())
    }

    fn send_button_event(&mut self, code: ButtonCode, pressed: bool) -> Result<(), SinkError> {
        self.pending.push(InputEvent::Button { code, pressed });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.batches.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Refuses key events, accepts the rest.
    struct NoKeys {
        flushed: usize,
    }

    impl InputSink for NoKeys {
        fn warp_pointer(&mut self, _x: f32, _y: f32) -> Result<(), SinkError> { Ok(()) }
        fn send_key_event(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
            Err(SinkError::Rejected {
                event:  InputEvent::Key { code, pressed },
                reason: "keyboard grabbed".to_string(),
            })
        }
        fn send_button_event(&mut self, _c: ButtonCode, _p: bool) -> Result<(), SinkError> { Ok(()) }
        fn flush(&mut self) -> Result<(), SinkError> {
            self.flushed += 1;
            Ok(())
        }
    }

    #[test]
    fn deliver_preserves_order_in_one_batch() {
        let events = [
            InputEvent::WarpPointer { x: 1.0, y: 2.0 },
            InputEvent::Button { code: 1, pressed: true },
            InputEvent::Key { code: 0x25, pressed: true },
            InputEvent::Key { code: 0x25, pressed: false },
        ];
        let mut sink = RecordingSink::new();
        assert!(deliver(&events, &mut sink).is_empty());
        assert_eq!(sink.batches.len(), 1);
        assert_eq!(sink.events(), events.to_vec());
        assert!(sink.pending().is_empty());
    }

    #[test]
    fn deliver_reports_failures_and_keeps_going() {
        let events = [
            InputEvent::Key { code: 0x19, pressed: true },
            InputEvent::Button { code: 5, pressed: true },
            InputEvent::Key { code: 0x19, pressed: false },
        ];
        let mut sink = NoKeys { flushed: 0 };
        let warnings = deliver(&events, &mut sink);
        assert_eq!(warnings.len(), 2);
        assert_eq!(sink.flushed, 1);
    }

    #[test]
    fn empty_batch_still_flushes() {
        let mut sink = RecordingSink::new();
        deliver(&[], &mut sink);
        assert_eq!(sink.batches, vec![Vec::<InputEvent>::new()]);
    }

    #[test]
    fn null_sink_accepts_everything() {
        let events = [
            InputEvent::WarpPointer { x: -40.0, y: 9000.0 },
            InputEvent::Button { code: 1, pressed: true },
            InputEvent::Key { code: 0x46, pressed: true },
        ];
        assert!(deliver(&events, &mut NullSink).is_empty());
    }

    #[test]
    fn recording_sink_clear_forgets_batches() {
        let mut sink = RecordingSink::new();
        deliver(&[InputEvent::Button { code: 4, pressed: true }], &mut sink);
        sink.send_button_event(4, false).unwrap();
        assert_eq!(sink.pending().len(), 1);
        sink.clear();
        assert!(sink.batches.is_empty());
        assert!(sink.pending().is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn display_key_event() {
        let e = InputEvent::Key { code: 0x25, pressed: true };
        assert_eq!(e.to_string(), "key 0x25 press");
    }
}
