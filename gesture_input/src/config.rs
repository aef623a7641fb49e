//! Translator configuration.
//!
//! [`TranslatorConfig`] is what users write (YAML, every field optional);
//! [`ResolvedConfig`] is what the translator runs on, with key names turned
//! into key codes and every value validated.
//!
//! ```yaml
//! mapper:  { offset_x: 150, offset_y: 75, screen_w: 1920, screen_h: 1080 }
//! click:   { pinch_threshold: 0.95 }
//! keys:    { super: 133 }
//! swipes:
//!   - { finger: ring, direction: up, chord: [+super, -super] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::chord::{default_key_table, Chord, KeyCode, KeyTable, SwipeBindings, SwipeDirection};
use crate::frame::FingerType;

/// Host mouse-button number (1 = primary, 4/5 = wheel up/down on X11).
pub type ButtonCode = u8;

// ════════════════════════════════════════════════════════════════════════════
// ConfigError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("chord step {step:?} names unknown key {key:?}")]
    UnknownKey { step: String, key: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

/// Palm position (sensor millimetres) → screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale_x:  f32,
    pub scale_y:  f32,
    pub screen_w: f32,
    pub screen_h: f32,
}

impl Default for MapperConfig {
    fn default() -> Self {
        // 300 mm of palm travel across 1600 px, 175 mm up 1200 px.
        MapperConfig {
            offset_x: 150.0,
            offset_y: 75.0,
            scale_x:  1600.0 / 300.0,
            scale_y:  1200.0 / 175.0,
            screen_w: 1600.0,
            screen_h: 1200.0,
        }
    }
}

impl MapperConfig {
    /// The same field of view stretched over a `w` × `h` screen.
    pub fn fit_screen(&self, w: f32, h: f32) -> Self {
        MapperConfig {
            scale_x:  self.scale_x * w / self.screen_w,
            scale_y:  self.scale_y * h / self.screen_h,
            screen_w: w,
            screen_h: h,
            ..*self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClickConfig {
    /// Pinch strength at or above which the primary button is held.
    pub pinch_threshold:    f32,
    /// Grab strength that counts as a closed fist.  Compared for exact
    /// equality.
    pub fist_grab_strength: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        ClickConfig { pinch_threshold: 0.97, fist_grab_strength: 1.0 }
    }
}

/// Circle → scroll scaling.  Repetitions per tick are
/// `floor((radius - bias) / radius_divisor)`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub radius_divisor:                f32,
    pub clockwise_radius_bias:         f32,
    pub counter_clockwise_radius_bias: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            radius_divisor:                5.0,
            clockwise_radius_bias:         0.0,
            counter_clockwise_radius_bias: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonConfig {
    pub primary:     ButtonCode,
    pub scroll_up:   ButtonCode,
    pub scroll_down: ButtonCode,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        ButtonConfig { primary: 1, scroll_up: 4, scroll_down: 5 }
    }
}

/// One swipe binding as written in configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwipeBindingConfig {
    pub finger:    FingerType,
    pub direction: SwipeDirection,
    pub chord:     Vec<String>,
}

impl SwipeBindingConfig {
    fn new(finger: FingerType, direction: SwipeDirection, chord: &[&str]) -> Self {
        SwipeBindingConfig {
            finger,
            direction,
            chord: chord.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The desktop shortcuts bound out of the box.
pub fn default_swipe_bindings() -> Vec<SwipeBindingConfig> {
    use FingerType::*;
    use SwipeDirection::*;
    vec![
        // index: close tab / reopen tab / cycle tabs
        SwipeBindingConfig::new(Index,  Down,  &["+ctrl", "+w", "-w", "-ctrl"]),
        SwipeBindingConfig::new(Index,  Up,    &["+ctrl", "+shift", "+t", "-t", "-shift", "-ctrl"]),
        SwipeBindingConfig::new(Index,  Left,  &["+ctrl", "+shift", "+tab", "-shift", "-tab", "-ctrl"]),
        SwipeBindingConfig::new(Index,  Right, &["+ctrl", "+tab", "-tab", "-ctrl"]),
        // middle: switch workspace / history back and forward
        SwipeBindingConfig::new(Middle, Up,    &["+ctrl", "+alt", "+down", "-down", "-alt", "-ctrl"]),
        SwipeBindingConfig::new(Middle, Down,  &["+ctrl", "+alt", "+up", "-up", "-alt", "-ctrl"]),
        SwipeBindingConfig::new(Middle, Left,  &["+alt", "+left", "-left", "-alt"]),
        SwipeBindingConfig::new(Middle, Right, &["+alt", "+right", "-right", "-alt"]),
        // pinky: close window / open menu
        SwipeBindingConfig::new(Pinky,  Down,  &["+alt", "+f4", "-f4", "-alt"]),
        SwipeBindingConfig::new(Pinky,  Up,    &["+alt", "+f1", "-f1", "-alt"]),
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// TranslatorConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    pub mapper:  MapperConfig,
    pub click:   ClickConfig,
    pub scroll:  ScrollConfig,
    pub buttons: ButtonConfig,
    /// Extra or overriding key names, layered over the built-in table.
    pub keys:    BTreeMap<String, KeyCode>,
    pub swipes:  Vec<SwipeBindingConfig>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            mapper:  MapperConfig::default(),
            click:   ClickConfig::default(),
            scroll:  ScrollConfig::default(),
            buttons: ButtonConfig::default(),
            keys:    BTreeMap::new(),
            swipes:  default_swipe_bindings(),
        }
    }
}

impl TranslatorConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// The full key table: built-ins overlaid with `keys`.
    pub fn key_table(&self) -> KeyTable {
        let mut table = default_key_table();
        for (name, &code) in &self.keys {
            table.insert(name.to_ascii_lowercase(), code);
        }
        table
    }

    /// Validate and resolve into the form the translator runs on.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let m = &self.mapper;
        for (name, value) in [
            ("mapper.scale_x", m.scale_x),
            ("mapper.scale_y", m.scale_y),
            ("mapper.screen_w", m.screen_w),
            ("mapper.screen_h", m.screen_h),
            ("scroll.radius_divisor", self.scroll.radius_divisor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !m.offset_x.is_finite() || !m.offset_y.is_finite() {
            return Err(ConfigError::Invalid("mapper offsets must be finite".to_string()));
        }
        let t = self.click.pinch_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "click.pinch_threshold must be in (0, 1], got {}",
                t
            )));
        }

        let keys = self.key_table();
        let mut swipes = SwipeBindings::new();
        for binding in &self.swipes {
            let chord = Chord::parse(&binding.chord, &keys)?;
            swipes.bind(binding.finger, binding.direction, chord);
        }

        Ok(ResolvedConfig {
            mapper:  self.mapper,
            click:   self.click,
            scroll:  self.scroll,
            buttons: self.buttons,
            swipes,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ResolvedConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub mapper:  MapperConfig,
    pub click:   ClickConfig,
    pub scroll:  ScrollConfig,
    pub buttons: ButtonConfig,
    pub swipes:  SwipeBindings,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            mapper:  MapperConfig::default(),
            click:   ClickConfig::default(),
            scroll:  ScrollConfig::default(),
            buttons: ButtonConfig::default(),
            swipes:  default_resolved_swipes(),
        }
    }
}

fn default_resolved_swipes() -> SwipeBindings {
    let keys = default_key_table();
    let mut swipes = SwipeBindings::new();
    for binding in default_swipe_bindings() {
        // Built-in bindings only name built-in keys.
        if let Ok(chord) = Chord::parse(&binding.chord, &keys) {
            swipes.bind(binding.finger, binding.direction, chord);
        }
    }
    swipes
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{KeyStroke, F4, L_ALT, L_CONTROL};

    #[test]
    fn default_resolves_all_bindings() {
        let resolved = TranslatorConfig::default().resolve().unwrap();
        assert_eq!(resolved.swipes.len(), 10);
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        let cfg = TranslatorConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, TranslatorConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = TranslatorConfig::from_yaml_str("mapper:\n  screen_w: 1920\n  screen_h: 1080\n").unwrap();
        assert_eq!(cfg.mapper.screen_w, 1920.0);
        assert_eq!(cfg.mapper.screen_h, 1080.0);
        assert_eq!(cfg.mapper.offset_x, 150.0);
        assert_eq!(cfg.click.pinch_threshold, 0.97);
    }

    #[test]
    fn fit_screen_keeps_field_of_view() {
        let m = MapperConfig::default().fit_screen(3200.0, 600.0);
        assert_eq!(m.screen_w, 3200.0);
        assert!((m.scale_x - 3200.0 / 300.0).abs() < 1e-4);
        assert!((m.scale_y - 600.0 / 175.0).abs() < 1e-4);
        assert_eq!(m.offset_x, 150.0);
    }

    #[test]
    fn swipes_replace_builtin_table() {
        let yaml = "\
keys:
  super: 133
swipes:
  - finger: ring
    direction: up
    chord: [+super, -super]
  - finger: pinky
    direction: down
    chord: [+alt, +f4, -f4, -alt]
";
        let resolved = TranslatorConfig::from_yaml_str(yaml).unwrap().resolve().unwrap();
        assert_eq!(resolved.swipes.len(), 2);
        assert_eq!(
            resolved.swipes.lookup(FingerType::Ring, SwipeDirection::Up).unwrap().strokes(),
            &[KeyStroke::press(133), KeyStroke::release(133)]
        );
        assert_eq!(
            resolved.swipes.lookup(FingerType::Pinky, SwipeDirection::Down).unwrap().strokes(),
            &[KeyStroke::press(L_ALT), KeyStroke::press(F4), KeyStroke::release(F4), KeyStroke::release(L_ALT)]
        );
        assert!(resolved.swipes.lookup(FingerType::Index, SwipeDirection::Down).is_none());
    }

    #[test]
    fn key_override_changes_code() {
        let cfg = TranslatorConfig::from_yaml_str("keys:\n  ctrl: 105\n").unwrap();
        let resolved = cfg.resolve().unwrap();
        let chord = resolved.swipes.lookup(FingerType::Index, SwipeDirection::Down).unwrap();
        assert_eq!(chord.strokes()[0], KeyStroke::press(105));
        assert_ne!(chord.strokes()[0], KeyStroke::press(L_CONTROL));
    }

    #[test]
    fn unknown_key_in_binding_is_rejected() {
        let yaml = "swipes:\n  - { finger: index, direction: up, chord: [+hyper] }\n";
        let err = TranslatorConfig::from_yaml_str(yaml).unwrap().resolve().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey { .. }));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = TranslatorConfig::from_yaml_str("mapper:\n  scale_z: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let cfg = TranslatorConfig::from_yaml_str("scroll:\n  radius_divisor: 0\n").unwrap();
        assert!(matches!(cfg.resolve(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn pinch_threshold_out_of_range_is_rejected() {
        let cfg = TranslatorConfig::from_yaml_str("click:\n  pinch_threshold: 1.5\n").unwrap();
        assert!(matches!(cfg.resolve(), Err(ConfigError::Invalid(_))));
    }
}
