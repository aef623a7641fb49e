//! Host-side [`InputSink`]s.
//!
//! [`EnigoSink`] drives the real display through `enigo`; [`LogSink`] is the
//! dry-run backend that only logs what would have been sent.

use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use tracing::{debug, info, warn};

use gesture_input::{ButtonCode, InputEvent, InputSink, KeyCode, SinkError};

// ════════════════════════════════════════════════════════════════════════════
// Pure helpers
// ════════════════════════════════════════════════════════════════════════════

/// Round a warp target to a pixel on a `w` × `h` screen.
pub fn clamp_to_screen(x: f32, y: f32, w: f32, h: f32) -> (i32, i32) {
    let fit = |v: f32, extent: f32| -> i32 {
        let max = (extent - 1.0).max(0.0);
        if v.is_nan() { 0 } else { v.round().clamp(0.0, max) as i32 }
    };
    (fit(x, w), fit(y, h))
}

/// X11 button numbering → enigo button.
pub fn enigo_button(code: ButtonCode) -> Option<Button> {
    match code {
        1 => Some(Button::Left),
        2 => Some(Button::Middle),
        3 => Some(Button::Right),
        4 => Some(Button::ScrollUp),
        5 => Some(Button::ScrollDown),
        6 => Some(Button::ScrollLeft),
        7 => Some(Button::ScrollRight),
        _ => None,
    }
}

fn direction(pressed: bool) -> Direction {
    if pressed { Direction::Press } else { Direction::Release }
}

// ════════════════════════════════════════════════════════════════════════════
// EnigoSink
// ════════════════════════════════════════════════════════════════════════════

/// Synthetic input on the host display.
///
/// Events queue until [`flush`](InputSink::flush), which performs them in
/// order.  Pointer warps are clamped to the screen.
pub struct EnigoSink {
    enigo:    Enigo,
    screen_w: f32,
    screen_h: f32,
    queue:    Vec<InputEvent>,
}

impl EnigoSink {
    /// Connect to the host input system.  Fails when no display is reachable.
    pub fn connect(screen_w: f32, screen_h: f32) -> Result<Self, SinkError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(EnigoSink { enigo, screen_w, screen_h, queue: Vec::new() })
    }

    /// Size of the main display, if the host reports one.
    pub fn screen_size(&self) -> Option<(f32, f32)> {
        match self.enigo.main_display() {
            Ok((w, h)) if w > 0 && h > 0 => Some((w as f32, h as f32)),
            Ok(_)  => None,
            Err(e) => {
                warn!("cannot query display size: {}", e);
                None
            }
        }
    }

    pub fn set_screen(&mut self, w: f32, h: f32) {
        self.screen_w = w;
        self.screen_h = h;
    }

    fn perform(&mut self, event: InputEvent) -> Result<(), SinkError> {
        let rejected = |reason: String| SinkError::Rejected { event, reason };
        match event {
            InputEvent::WarpPointer { x, y } => {
                let (px, py) = clamp_to_screen(x, y, self.screen_w, self.screen_h);
                self.enigo.move_mouse(px, py, Coordinate::Abs)
                    .map_err(|e| rejected(e.to_string()))
            }
            InputEvent::Button { code, pressed } => {
                let button = enigo_button(code)
                    .ok_or_else(|| rejected(format!("no host button {}", code)))?;
                self.enigo.button(button, direction(pressed))
                    .map_err(|e| rejected(e.to_string()))
            }
            InputEvent::Key { code, pressed } => {
                self.enigo.raw(code, direction(pressed))
                    .map_err(|e| rejected(e.to_string()))
            }
        }
    }
}

impl InputSink for EnigoSink {
    fn warp_pointer(&mut self, x: f32, y: f32) -> Result<(), SinkError> {
        self.queue.push(InputEvent::WarpPointer { x, y });
        Ok(())
    }

    fn send_key_event(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        self.queue.push(InputEvent::Key { code, pressed });
        Ok(())
    }

    fn send_button_event(&mut self, code: ButtonCode, pressed: bool) -> Result<(), SinkError> {
        // Refuse unmappable buttons now so the caller sees which one.
        if enigo_button(code).is_none() {
            return Err(SinkError::Rejected {
                event:  InputEvent::Button { code, pressed },
                reason: format!("no host button {}", code),
            });
        }
        self.queue.push(InputEvent::Button { code, pressed });
        Ok(())
    }

    /// Perform the queued events.  Every event is attempted; the first
    /// failure is returned and later ones are logged.
    fn flush(&mut self) -> Result<(), SinkError> {
        let mut first = None;
        for event in std::mem::take(&mut self.queue) {
            debug!("{}", event);
            if let Err(e) = self.perform(event) {
                match first {
                    None    => first = Some(e),
                    Some(_) => warn!("{}", e),
                }
            }
        }
        first.map_or(Ok(()), Err)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LogSink
// ════════════════════════════════════════════════════════════════════════════

/// Logs every event at info and performs nothing.
#[derive(Debug, Default)]
pub struct LogSink {
    sent: usize,
}

impl LogSink {
    pub fn new() -> Self {
        LogSink::default()
    }

    /// Events logged so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    fn log(&mut self, event: InputEvent) -> Result<(), SinkError> {
        self.sent += 1;
        info!("dry run: {}", event);
        Ok(())
    }
}

impl InputSink for LogSink {
    fn warp_pointer(&mut self, x: f32, y: f32) -> Result<(), SinkError> {
        self.log(InputEvent::WarpPointer { x, y })
    }

    fn send_key_event(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        self.log(InputEvent::Key { code, pressed })
    }

    fn send_button_event(&mut self, code: ButtonCode, pressed: bool) -> Result<(), SinkError> {
        self.log(InputEvent::Button { code, pressed })
    }

    fn flush(&mut self) -> Result<(), SinkError> { Ok(()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_input::deliver;

    #[test]
    fn warp_inside_screen_is_rounded() {
        assert_eq!(clamp_to_screen(10.4, 20.6, 1600.0, 1200.0), (10, 21));
    }

    #[test]
    fn warp_off_screen_is_clamped() {
        assert_eq!(clamp_to_screen(-50.0, 5000.0, 1600.0, 1200.0), (0, 1199));
        assert_eq!(clamp_to_screen(1600.0, -0.4, 1600.0, 1200.0), (1599, 0));
    }

    #[test]
    fn nan_warp_goes_to_origin() {
        assert_eq!(clamp_to_screen(f32::NAN, f32::NAN, 1600.0, 1200.0), (0, 0));
    }

    #[test]
    fn wheel_buttons_map_to_scroll() {
        assert_eq!(enigo_button(1), Some(Button::Left));
        assert_eq!(enigo_button(4), Some(Button::ScrollUp));
        assert_eq!(enigo_button(5), Some(Button::ScrollDown));
        assert_eq!(enigo_button(0), None);
        assert_eq!(enigo_button(9), None);
    }

    #[test]
    fn log_sink_counts_everything() {
        let mut sink = LogSink::new();
        let events = [
            InputEvent::WarpPointer { x: 1.0, y: 2.0 },
            InputEvent::Button { code: 1, pressed: true },
            InputEvent::Key { code: 0x25, pressed: false },
        ];
        assert!(deliver(&events, &mut sink).is_empty());
        assert_eq!(sink.sent(), 3);
    }
}
