//! Gesture recognizer base contract and the narrow manager seams it needs.

mod tap;

pub use tap::{TapRecognizer, TimerFired};

use crate::input::InputSample;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum GestureState {
    /// Nothing tracked yet.
    #[default]
    Possible = 0,
    /// Actively tracking a candidate gesture.
    Began = 1,
    Failed = 2,
    Recognized = 3,
}

impl GestureState {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            GestureState::Possible => "possible",
            GestureState::Began => "began",
            GestureState::Failed => "failed",
            GestureState::Recognized => "recognized",
        }
    }
}

/// Declarative touch-action intent a recognizer asks the platform to honor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TouchAction {
    /// Allow panning and pinch-zoom, suppress double-tap zoom.
    Manipulation,
}

impl TouchAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            TouchAction::Manipulation => "manipulation",
        }
    }
}

/// Payload signaled when a tap gesture is emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct TapEvent {
    pub sample: InputSample,
    pub tap_count: u32,
}

/// Manager-side answers a recognizer may ask for while processing.
pub trait RecognizerHost {
    /// Whether a sibling recognizer still has to fail before this one may
    /// finalize recognition.
    fn has_require_failures(&self) -> bool;
}

/// Host with no sibling dependencies.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRequireFailures;

impl RecognizerHost for NoRequireFailures {
    fn has_require_failures(&self) -> bool {
        false
    }
}

/// Host where some sibling always has to fail first, so every recognition
/// goes through the deferred commit.
#[derive(Clone, Copy, Debug, Default)]
pub struct SiblingsPending;

impl RecognizerHost for SiblingsPending {
    fn has_require_failures(&self) -> bool {
        true
    }
}

/// Named-event signaling channel owned by the manager.
pub trait GestureSink {
    fn signal(&mut self, event: &str, payload: &TapEvent);
}

/// Sink that keeps every signaled event in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<(String, TapEvent)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(String, TapEvent)> {
        self.events.last()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, (String, TapEvent)> {
        self.events.drain(..)
    }
}

impl GestureSink for RecordingSink {
    fn signal(&mut self, event: &str, payload: &TapEvent) {
        self.events.push((event.to_owned(), payload.clone()));
    }
}

/// Capability set shared by every gesture variant.
pub trait Recognizer {
    fn touch_action(&self) -> &'static [TouchAction];

    fn process(&mut self, sample: &InputSample, host: &dyn RecognizerHost) -> GestureState;

    /// Signals the configured event when the current state is
    /// [`GestureState::Recognized`]; a no-op otherwise.
    fn emit(&mut self, sink: &mut dyn GestureSink);

    /// Cancels any pending timer.
    fn reset(&mut self);

    fn state(&self) -> GestureState;
}
