//! Tap and multi-tap gesture recognition over normalized pointer samples.
//!
//! [`TapRecognizer`] consumes one [`InputSample`] per call and reports a
//! [`GestureState`]. Timers are deadlines on the caller's millisecond clock;
//! the owner drives them with [`TapRecognizer::advance`] or, with the
//! `runtime` feature, hands the recognizer to [`runtime::run_recognizer`].

pub mod config;
pub mod input;
pub mod recognizer;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod timer;
pub mod trace;

pub use config::{ConfigError, TapConfig};
pub use input::{distance, EventType, InputSample, PointerPoint};
pub use recognizer::{
    GestureSink, GestureState, NoRequireFailures, Recognizer, RecognizerHost, RecordingSink,
    SiblingsPending, TapEvent, TapRecognizer, TimerFired, TouchAction,
};
pub use timer::{PendingTimer, TimerKind, TimerToken};
pub use trace::{RejectReason, TapTraceSample};
