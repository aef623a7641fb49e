//! Simulation window using `minifb`.
//!
//! The window samples the keyboard into a [`SimInput`] each frame and draws
//! the simulated palm over a map of the sensor's field of view.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ [idx][mid][pnk]              [L latch]    │
//! │                                          │
//! │                 ◆ palm                   │
//! │                                          │
//! │ [gesture strip]                          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! | Key | Input |
//! |---|---|
//! | arrows | move palm |
//! | `P` (held) | pinch |
//! | `F` (held) | fist |
//! | `1` / `2` / `5` | select index / middle / pinky |
//! | `W` `A` `S` `D` | swipe up / left / down / right |
//! | `C` / `X` (held) | clockwise / counter-clockwise circle |
//! | `K` / `N` | key tap / screen tap |
//! | `Q` / `Esc` | quit |

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::warn;

use gesture_input::config::MapperConfig;
use gesture_input::{CoordinateMapper, FingerType, Frame, GestureKind, Rotation, SwipeDirection, Vector};

use crate::sim::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 640;
pub const WIN_H:      usize = 480;
const PALM_R:         usize = 10;
const BLOCK:          usize = 24;
const BG_COLOR:       u32   = 0xFF1A1A2E;
const OPEN_COLOR:     u32   = 0xFF4ECCA3;
const PINCH_COLOR:    u32   = 0xFFFFD700;
const FIST_COLOR:     u32   = 0xFF7F8C8D;
const FINGER_IDLE:    u32   = 0xFF0F3460;
const FINGER_ACTIVE:  u32   = 0xFFE94560;
const LATCH_COLOR:    u32   = 0xFFFF6F3C;
const SWIPE_COLOR:    u32   = 0xFF3FC1C9;
const CIRCLE_COLOR:   u32   = 0xFFB388EB;
const TAP_COLOR:      u32   = 0xFFF9F871;

// ════════════════════════════════════════════════════════════════════════════
// SimWindow
// ════════════════════════════════════════════════════════════════════════════

pub struct SimWindow {
    window: Window,
    buf:    Vec<u32>,
    /// Sensor space → window pixels, same field of view as the default
    /// screen mapping.
    view:   CoordinateMapper,
}

impl SimWindow {
    pub fn new() -> Result<Self, String> {
        let mut window = Window::new(
            "leap_xinput: simulated hand",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        let screen = MapperConfig::default();
        let view = CoordinateMapper::new(screen.fit_screen(WIN_W as f32, WIN_H as f32));

        Ok(SimWindow {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            view,
        })
    }

    /// Sensor position at the centre of the window.
    pub fn centre(&self) -> Vector {
        self.view.unmap(WIN_W as f32 / 2.0, WIN_H as f32 / 2.0)
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Sample the keyboard.  `None` once the user asks to quit.
    pub fn poll_input(&mut self) -> Option<SimInput> {
        if !self.window.is_open() { return None; }

        let down     = |k: Key| self.window.is_key_down(k);
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return None;
        }

        let axis = |neg: Key, pos: Key| -> i8 {
            i8::from(down(pos)) - i8::from(down(neg))
        };

        let finger = if one_shot(Key::Key1) {
            Some(FingerType::Index)
        } else if one_shot(Key::Key2) {
            Some(FingerType::Middle)
        } else if one_shot(Key::Key5) {
            Some(FingerType::Pinky)
        } else {
            None
        };

        let swipe = [
            (Key::W, SwipeDirection::Up),
            (Key::A, SwipeDirection::Left),
            (Key::S, SwipeDirection::Down),
            (Key::D, SwipeDirection::Right),
        ]
        .into_iter()
        .find(|(k, _)| one_shot(*k))
        .map(|(_, dir)| dir);

        let circle = if down(Key::C) {
            Some(Rotation::Clockwise)
        } else if down(Key::X) {
            Some(Rotation::CounterClockwise)
        } else {
            None
        };

        Some(SimInput {
            dx: axis(Key::Left, Key::Right),
            dy: axis(Key::Down, Key::Up),
            pinch: down(Key::P),
            fist: down(Key::F),
            finger,
            swipe,
            circle,
            key_tap: one_shot(Key::K),
            screen_tap: one_shot(Key::N),
        })
    }

    /// Render one frame.
    pub fn render(&mut self, frame: &Frame, finger: FingerType, pressed: bool) {
        self.buf.fill(BG_COLOR);

        // ── finger selector ───────────────────────────────────────────────
        for (i, f) in [FingerType::Index, FingerType::Middle, FingerType::Pinky].iter().enumerate() {
            let color = if *f == finger { FINGER_ACTIVE } else { FINGER_IDLE };
            self.fill_rect(8 + i * (BLOCK + 4), 8, BLOCK, BLOCK, color);
        }

        // ── button latch ──────────────────────────────────────────────────
        if pressed {
            self.fill_rect(WIN_W - BLOCK - 8, 8, BLOCK, BLOCK, LATCH_COLOR);
        }

        // ── gesture strip ─────────────────────────────────────────────────
        for (i, g) in frame.gestures.iter().enumerate() {
            let color = match g.kind {
                GestureKind::Swipe { .. }  => SWIPE_COLOR,
                GestureKind::Circle { .. } => CIRCLE_COLOR,
                _                          => TAP_COLOR,
            };
            self.fill_rect(8 + i * (BLOCK + 4), WIN_H - BLOCK - 8, BLOCK, BLOCK, color);
        }

        // ── palm ──────────────────────────────────────────────────────────
        if let Some(hand) = frame.primary_hand() {
            let color = if hand.grab_strength >= 1.0 {
                FIST_COLOR
            } else if hand.pinch_strength >= 1.0 {
                PINCH_COLOR
            } else {
                OPEN_COLOR
            };
            let (x, y) = self.view.map(&hand.palm_position);
            if x >= 0.0 && y >= 0.0 {
                self.draw_diamond(x as usize, y as usize, PALM_R, color);
            }
        }

        if let Err(e) = self.window.update_with_buffer(&self.buf, WIN_W, WIN_H) {
            warn!("window update failed: {}", e);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Filled diamond centred on (cx, cy).
    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in -(r as isize)..=r as isize {
            let span = r as isize - dy.abs();
            for dx in -span..=span {
                let (sx, sy) = (cx as isize + dx, cy as isize + dy);
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }
}
