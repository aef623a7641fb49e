//! Top-level application loop.
//!
//! `App` owns the [`Translator`] and the [`FrameHistory`]; every frame from
//! the source is pushed into the history and translated against its
//! predecessor.  `run` picks the frame source and the sink and drives the
//! loop until the window closes or the device goes away.

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use gesture_input::config::MapperConfig;
use gesture_input::{Frame, FrameOutcome, InputSink, Translator, TranslatorConfig};

use crate::output::{EnigoSink, LogSink};
use crate::sim::SimState;
use crate::source::FrameHistory;
use crate::window::SimWindow;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where frames come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Keyboard-driven simulated hand in a window.
    Sim,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

impl SourceKind {
    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Sim  => "simulation",
            SourceKind::Leap => "LeapMotion",
        }
    }
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub translator:  TranslatorConfig,
    pub source:      SourceKind,
    /// Ask the device for frames while unfocused.
    pub background:  bool,
    /// Log events instead of performing them.
    pub dry_run:     bool,
    /// Fit the screen mapping to the main display's real size.
    pub auto_screen: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            translator:  TranslatorConfig::default(),
            source:      SourceKind::Sim,
            background:  false,
            dry_run:     false,
            auto_screen: false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    translator: Translator,
    history:    FrameHistory,
    processed:  u64,
    warnings:   u64,
}

impl App {
    pub fn new(translator: Translator) -> Self {
        App {
            translator,
            history:   FrameHistory::new(),
            processed: 0,
            warnings:  0,
        }
    }

    /// Take the next frame from the source and translate it.
    pub fn handle_frame(&mut self, frame: Frame, sink: &mut dyn InputSink) -> FrameOutcome {
        self.history.push(frame);
        let Some(current) = self.history.current() else {
            return FrameOutcome::Unchanged;
        };
        let outcome = self.translator.process(current, self.history.previous(), sink);
        if let FrameOutcome::Processed(report) = &outcome {
            self.processed += 1;
            self.warnings  += report.warnings.len() as u64;
        }
        outcome
    }

    pub fn current(&self) -> Option<&Frame> { self.history.current() }
    pub fn is_pressed(&self) -> bool         { self.translator.is_pressed() }
    pub fn processed(&self) -> u64           { self.processed }
    pub fn warnings(&self) -> u64            { self.warnings }
}

// ════════════════════════════════════════════════════════════════════════════
// run()
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.  Returns once the source ends.
pub fn run(cfg: AppConfig) -> Result<()> {
    if cfg.source == SourceKind::Leap && !cfg!(feature = "leap") {
        bail!("this build has no LeapMotion support; rebuild with `--features leap`");
    }

    let mut translator_cfg = cfg.translator.clone();
    let mut sink = open_sink(&cfg, &mut translator_cfg.mapper)?;
    let resolved = translator_cfg.resolve().context("invalid translator configuration")?;
    let mut app = App::new(Translator::new(resolved));

    info!(
        "translating {} frames → {} ({}×{} screen)",
        cfg.source.name(),
        if cfg.dry_run { "log" } else { "host input" },
        translator_cfg.mapper.screen_w,
        translator_cfg.mapper.screen_h,
    );

    match cfg.source {
        SourceKind::Sim => {
            if cfg.background {
                debug!("background frames only apply to hardware sources");
            }
            run_sim(&mut app, sink.as_mut())?;
        }
        SourceKind::Leap => run_leap(&mut app, sink.as_mut(), cfg.background)?,
    }

    info!("{} frames processed, {} delivery warnings", app.processed(), app.warnings());
    Ok(())
}

/// The dry-run log or the host display.  With `auto_screen` the mapping is
/// refitted to the display the sink reports.
fn open_sink(cfg: &AppConfig, mapper: &mut MapperConfig) -> Result<Box<dyn InputSink>> {
    if cfg.dry_run {
        return Ok(Box::new(LogSink::new()));
    }

    let mut sink = EnigoSink::connect(mapper.screen_w, mapper.screen_h)
        .context("cannot reach the host input system")?;
    if cfg.auto_screen {
        match sink.screen_size() {
            Some((w, h)) => {
                *mapper = mapper.fit_screen(w, h);
                sink.set_screen(w, h);
                info!("screen mapping fitted to {}×{}", w, h);
            }
            None => warn!("display size unknown; keeping configured screen mapping"),
        }
    }
    Ok(Box::new(sink))
}

fn run_sim(app: &mut App, sink: &mut dyn InputSink) -> Result<()> {
    let mut window = SimWindow::new()
        .map_err(|e| anyhow!("cannot open simulation window: {}", e))?;
    let mut sim = SimState::new(window.centre());

    while window.is_open() {
        let input = match window.poll_input() {
            Some(input) => input,
            None        => break,
        };
        app.handle_frame(sim.step(&input), sink);
        if let Some(frame) = app.current() {
            window.render(frame, sim.finger(), app.is_pressed());
        }
    }
    Ok(())
}

#[cfg(feature = "leap")]
fn run_leap(app: &mut App, sink: &mut dyn InputSink, background: bool) -> Result<()> {
    use crate::source::{spawn_frame_source, LeapFrameSource};

    let rx = spawn_frame_source(LeapFrameSource { background });
    for frame in rx.iter() {
        app.handle_frame(frame, sink);
    }
    bail!("LeapMotion frame source stopped")
}

#[cfg(not(feature = "leap"))]
fn run_leap(_app: &mut App, _sink: &mut dyn InputSink, _background: bool) -> Result<()> {
    bail!("this build has no LeapMotion support; rebuild with `--features leap`")
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_input::{
        FingerType, Gesture, GestureKind, GestureState, Hand, InputEvent, RecordingSink, Vector,
    };

    fn make_app() -> App {
        App::new(Translator::new(TranslatorConfig::default().resolve().unwrap()))
    }

    fn hand(pinch: f32) -> Hand {
        Hand::new(Vector::new(0.0, 200.0, 0.0), 0.0, pinch)
    }

    fn swipe(id: i32, state: GestureState) -> Gesture {
        Gesture::new(id, state, GestureKind::Swipe {
            direction: Vector::new(0.0, -1.0, 0.0),
            speed:     900.0,
            finger:    Some(FingerType::Index),
        })
    }

    #[test]
    fn default_source_is_simulation() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.source, SourceKind::Sim);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn first_frame_is_processed() {
        let mut app = make_app();
        let mut sink = RecordingSink::new();
        let outcome = app.handle_frame(Frame::new(1).with_hand(hand(0.0)), &mut sink);
        assert!(matches!(outcome, FrameOutcome::Processed(_)));
        assert_eq!(app.processed(), 1);
        assert_eq!(sink.batches.len(), 1);
    }

    #[test]
    fn repeated_frame_id_is_skipped() {
        let mut app = make_app();
        let mut sink = RecordingSink::new();
        app.handle_frame(Frame::new(4).with_hand(hand(0.0)), &mut sink);
        let outcome = app.handle_frame(Frame::new(4).with_hand(hand(0.0)), &mut sink);
        assert!(matches!(outcome, FrameOutcome::Unchanged));
        assert_eq!(app.processed(), 1);
        assert_eq!(sink.batches.len(), 1);
    }

    #[test]
    fn pinch_latches_across_frames() {
        let mut app = make_app();
        let mut sink = RecordingSink::new();
        app.handle_frame(Frame::new(1).with_hand(hand(0.99)), &mut sink);
        app.handle_frame(Frame::new(2).with_hand(hand(0.99)), &mut sink);
        assert!(app.is_pressed());
        app.handle_frame(Frame::new(3).with_hand(hand(0.2)), &mut sink);
        assert!(!app.is_pressed());
        let buttons: Vec<_> = sink.events().into_iter()
            .filter(|e| matches!(e, InputEvent::Button { .. }))
            .collect();
        assert_eq!(buttons, vec![
            InputEvent::Button { code: 1, pressed: true },
            InputEvent::Button { code: 1, pressed: false },
        ]);
    }

    #[test]
    fn swipe_fires_once_over_its_lifetime() {
        let mut app = make_app();
        let mut sink = RecordingSink::new();
        app.handle_frame(Frame::new(1).with_gesture(swipe(3, GestureState::Start)), &mut sink);
        let chord_len = sink.events().len();
        assert!(chord_len > 0);
        app.handle_frame(Frame::new(2).with_gesture(swipe(3, GestureState::Update)), &mut sink);
        app.handle_frame(Frame::new(3).with_gesture(swipe(3, GestureState::Stop)), &mut sink);
        assert_eq!(sink.events().len(), chord_len);
    }

    #[test]
    fn dry_run_sink_needs_no_display() {
        let cfg = AppConfig { dry_run: true, auto_screen: true, ..AppConfig::default() };
        let mut mapper = cfg.translator.mapper;
        assert!(open_sink(&cfg, &mut mapper).is_ok());
        assert_eq!(mapper, cfg.translator.mapper);
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn leap_source_needs_feature() {
        let cfg = AppConfig { source: SourceKind::Leap, dry_run: true, ..AppConfig::default() };
        assert!(run(cfg).is_err());
    }
}
