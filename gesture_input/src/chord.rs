//! Key chords and the swipe → chord binding table.
//!
//! A [`Chord`] is an ordered list of key transitions.  Chords are written in
//! configuration as steps like `+ctrl` (press) and `-ctrl` (release), with key
//! names resolved against a [`KeyTable`] of host key codes.  Nothing forces a
//! chord to nest its presses and releases; the sequence is replayed exactly.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::config::ConfigError;
use crate::frame::{FingerType, Vector};

/// Host key code (X11 keycode on the default tables).
pub type KeyCode = u16;

/// Key name → key code.
pub type KeyTable = BTreeMap<String, KeyCode>;

// ════════════════════════════════════════════════════════════════════════════
// Default key table (X11 keycodes, US layout)
// ════════════════════════════════════════════════════════════════════════════

pub const L_CONTROL: KeyCode = 0x25;
pub const L_ALT:     KeyCode = 0x40;
pub const L_SHIFT:   KeyCode = 0x32;
pub const TAB:       KeyCode = 0x17;
pub const KEY_W:     KeyCode = 0x19;
pub const KEY_T:     KeyCode = 0x1c;
pub const F1:        KeyCode = 0x43;
pub const F4:        KeyCode = 0x46;
pub const UP:        KeyCode = 0x6f;
pub const DOWN:      KeyCode = 0x74;
pub const LEFT:      KeyCode = 0x71;
pub const RIGHT:     KeyCode = 0x72;
pub const BACKSPACE: KeyCode = 0x16;

/// Built-in key names.  User-supplied names are layered on top.
pub fn default_key_table() -> KeyTable {
    [
        ("ctrl",      L_CONTROL),
        ("alt",       L_ALT),
        ("shift",     L_SHIFT),
        ("tab",       TAB),
        ("w",         KEY_W),
        ("t",         KEY_T),
        ("f1",        F1),
        ("f4",        F4),
        ("up",        UP),
        ("down",      DOWN),
        ("left",      LEFT),
        ("right",     RIGHT),
        ("backspace", BACKSPACE),
    ]
    .into_iter()
    .map(|(name, code)| (name.to_string(), code))
    .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// KeyStroke / Chord
// ════════════════════════════════════════════════════════════════════════════

/// One key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyStroke {
    pub code:    KeyCode,
    pub pressed: bool,
}

impl KeyStroke {
    pub const fn press(code: KeyCode) -> Self {
        KeyStroke { code, pressed: true }
    }

    pub const fn release(code: KeyCode) -> Self {
        KeyStroke { code, pressed: false }
    }
}

/// An ordered key-press/key-release sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chord {
    strokes: Vec<KeyStroke>,
}

impl Chord {
    pub fn new(strokes: Vec<KeyStroke>) -> Self {
        Chord { strokes }
    }

    /// Resolve `+name` / `-name` steps against `keys`.
    pub fn parse<S: AsRef<str>>(steps: &[S], keys: &KeyTable) -> Result<Self, ConfigError> {
        let strokes = steps
            .iter()
            .map(|step| parse_step(step.as_ref(), keys))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Chord { strokes })
    }

    pub fn strokes(&self) -> &[KeyStroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

fn parse_step(step: &str, keys: &KeyTable) -> Result<KeyStroke, ConfigError> {
    let step = step.trim();
    let (pressed, name) = if let Some(name) = step.strip_prefix('+') {
        (true, name)
    } else if let Some(name) = step.strip_prefix('-') {
        (false, name)
    } else {
        return Err(ConfigError::Invalid(format!(
            "chord step {:?} must start with '+' or '-'",
            step
        )));
    };
    let name = name.trim().to_ascii_lowercase();
    match keys.get(&name) {
        Some(&code) => Ok(KeyStroke { code, pressed }),
        None => Err(ConfigError::UnknownKey { step: step.to_string(), key: name }),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SwipeDirection
// ════════════════════════════════════════════════════════════════════════════

/// Dominant direction of a swipe in the sensor's x/y plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Vertical when |y| > |x|, otherwise horizontal (ties included).
    pub fn classify(direction: &Vector) -> Self {
        if direction.y.abs() > direction.x.abs() {
            if direction.y < 0.0 { SwipeDirection::Down } else { SwipeDirection::Up }
        } else if direction.x < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SwipeDirection::Up    => "up",
            SwipeDirection::Down  => "down",
            SwipeDirection::Left  => "left",
            SwipeDirection::Right => "right",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SwipeBindings
// ════════════════════════════════════════════════════════════════════════════

/// (finger, direction) → chord.  Combinations without an entry do nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwipeBindings {
    map: HashMap<(FingerType, SwipeDirection), Chord>,
}

impl SwipeBindings {
    pub fn new() -> Self {
        SwipeBindings::default()
    }

    /// Bind a chord, replacing any existing binding for the same pair.
    pub fn bind(&mut self, finger: FingerType, direction: SwipeDirection, chord: Chord) {
        self.map.insert((finger, direction), chord);
    }

    pub fn lookup(&self, finger: FingerType, direction: SwipeDirection) -> Option<&Chord> {
        self.map.get(&(finger, direction))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ctrl_w() {
        let chord = Chord::parse(&["+ctrl", "+w", "-w", "-ctrl"], &default_key_table()).unwrap();
        assert_eq!(chord.strokes(), &[
            KeyStroke::press(L_CONTROL),
            KeyStroke::press(KEY_W),
            KeyStroke::release(KEY_W),
            KeyStroke::release(L_CONTROL),
        ]);
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        let chord = Chord::parse(&[" +Alt", "-ALT "], &default_key_table()).unwrap();
        assert_eq!(chord.strokes(), &[KeyStroke::press(L_ALT), KeyStroke::release(L_ALT)]);
    }

    #[test]
    fn parse_rejects_unknown_key() {
        let err = Chord::parse(&["+hyper"], &default_key_table()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey { ref key, .. } if key == "hyper"));
    }

    #[test]
    fn parse_rejects_missing_sign() {
        let err = Chord::parse(&["ctrl"], &default_key_table()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(Chord::parse(&[""], &default_key_table()).is_err());
    }

    // ── SwipeDirection ───────────────────────────────────────────────────
    #[test]
    fn classify_vertical() {
        assert_eq!(SwipeDirection::classify(&Vector::new(0.2, -0.9, 0.0)), SwipeDirection::Down);
        assert_eq!(SwipeDirection::classify(&Vector::new(-0.2, 0.9, 0.0)), SwipeDirection::Up);
    }

    #[test]
    fn classify_horizontal() {
        assert_eq!(SwipeDirection::classify(&Vector::new(-0.9, 0.3, 0.0)), SwipeDirection::Left);
        assert_eq!(SwipeDirection::classify(&Vector::new(0.9, -0.3, 0.0)), SwipeDirection::Right);
    }

    #[test]
    fn classify_tie_is_horizontal() {
        assert_eq!(SwipeDirection::classify(&Vector::new(-0.5, 0.5, 0.0)), SwipeDirection::Left);
    }

    #[test]
    fn bind_replaces_existing() {
        let mut b = SwipeBindings::new();
        b.bind(FingerType::Index, SwipeDirection::Up, Chord::new(vec![KeyStroke::press(1)]));
        b.bind(FingerType::Index, SwipeDirection::Up, Chord::new(vec![KeyStroke::press(2)]));
        assert_eq!(b.len(), 1);
        assert_eq!(
            b.lookup(FingerType::Index, SwipeDirection::Up).unwrap().strokes(),
            &[KeyStroke::press(2)]
        );
        assert!(b.lookup(FingerType::Ring, SwipeDirection::Up).is_none());
    }
}
