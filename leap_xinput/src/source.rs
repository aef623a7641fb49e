//! Frame sources: LeapMotion hardware, plus the history the translator reads.
//!
//! Hardware sources run on their own thread and deliver [`Frame`]s over an
//! `mpsc` channel.  The consumer pushes each into a [`FrameHistory`], which
//! keeps exactly the current frame and the one before it.
//!
//! The keyboard simulator lives in [`crate::sim`]; it needs the window on the
//! main thread, so it produces frames directly instead of over a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use gesture_input::Frame;

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`Frame`]s over a channel.  `run` returns when
/// the device goes away or the receiver is dropped.
pub trait FrameSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Frame>);
}

/// Spawn a frame source on its own thread and return the receiving end.
pub fn spawn_frame_source<S: FrameSource>(source: S) -> Receiver<Frame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// FrameHistory
// ════════════════════════════════════════════════════════════════════════════

/// The latest frame and its predecessor.
#[derive(Debug, Default)]
pub struct FrameHistory {
    current:  Option<Frame>,
    previous: Frame,
}

impl FrameHistory {
    pub fn new() -> Self {
        FrameHistory::default()
    }

    pub fn push(&mut self, frame: Frame) {
        if let Some(old) = self.current.replace(frame) {
            self.previous = old;
        }
    }

    pub fn current(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// The frame before [`current`](Self::current); an empty frame with id 0
    /// until two frames have arrived.
    pub fn previous(&self) -> &Frame {
        &self.previous
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// LeapC has no built-in gesture recogniser, so frames from this source carry
/// hands only: pointer and pinch-click work, circle and swipe never appear.
#[cfg(feature = "leap")]
pub struct LeapFrameSource {
    /// Keep receiving frames while another application has focus.
    pub background: bool,
}

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        use gesture_input::{Hand, Vector};
        use leaprs::*;
        use tracing::{error, info, warn};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                error!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        if self.background {
            if let Err(e) = connection.set_policy_flags(PolicyFlags::BACKGROUND_FRAMES, PolicyFlags::empty()) {
                warn!("background frames policy rejected: {:?}", e);
            }
        }

        let mut connected = false;
        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            match msg.event() {
                EventRef::Device(_) if !connected => {
                    connected = true;
                    info!("LeapMotion device connected");
                }
                EventRef::Tracking(tracking) => {
                    let mut frame = Frame::new(tracking.tracking_frame_id as u64);
                    for hand in tracking.hands() {
                        let [x, y, z] = hand.palm().position().array();
                        frame.hands.push(Hand::new(
                            Vector::new(x, y, z),
                            hand.grab_strength,
                            hand.pinch_strength,
                        ));
                    }
                    if tx.send(frame).is_err() { return; }
                }
                _ => {}
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
