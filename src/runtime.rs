//! Async driver that races incoming samples against the recognizer's
//! pending timer on a single executor.

use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Receiver, Sender},
};
use embassy_time::{Instant, Timer};

use crate::{
    input::InputSample,
    recognizer::{
        GestureSink, GestureState, Recognizer, RecognizerHost, TapRecognizer, TimerFired,
    },
};

#[derive(Clone, Debug)]
pub enum RecognizerInput {
    /// Sample stamped with `embassy_time::Instant::now().as_millis()`.
    Sample(InputSample),
    Reset,
    Shutdown,
}

/// State change published by [`run_recognizer`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RuntimeEvent {
    pub time_ms: u64,
    pub state: GestureState,
    pub fired: Option<TimerFired>,
}

/// Runs until a [`RecognizerInput::Shutdown`] arrives.
///
/// Recognized samples and committed deferred recognitions are emitted into
/// `sink` right away; arbitration across recognizers is left to the owner of
/// `host`.
///
/// Every state change is sent on `events` and awaited, so the owner must keep
/// draining that channel; a full channel also holds back due timers.
pub async fn run_recognizer<M: RawMutex, const N: usize, const E: usize>(
    recognizer: &mut TapRecognizer,
    host: &dyn RecognizerHost,
    sink: &mut dyn GestureSink,
    inputs: Receiver<'_, M, RecognizerInput, N>,
    events: Sender<'_, M, RuntimeEvent, E>,
) {
    loop {
        let input = match recognizer.pending_timer() {
            Some(timer) => {
                let deadline = Instant::from_millis(timer.deadline_ms);
                match select(inputs.receive(), Timer::at(deadline)).await {
                    Either::First(input) => Some(input),
                    Either::Second(()) => {
                        if let Some(fired) = recognizer.fire_timer(timer.token) {
                            if fired == TimerFired::Commit {
                                recognizer.emit(sink);
                            }
                            events
                                .send(RuntimeEvent {
                                    time_ms: timer.deadline_ms,
                                    state: recognizer.state(),
                                    fired: Some(fired),
                                })
                                .await;
                        }
                        None
                    }
                }
            }
            None => Some(inputs.receive().await),
        };

        match input {
            None => {}
            Some(RecognizerInput::Sample(sample)) => {
                let state = recognizer.process(&sample, host);
                if state == GestureState::Recognized {
                    recognizer.emit(sink);
                }
                events
                    .send(RuntimeEvent {
                        time_ms: sample.time_stamp,
                        state,
                        fired: None,
                    })
                    .await;
            }
            Some(RecognizerInput::Reset) => {
                log::debug!("runtime: reset");
                recognizer.reset();
            }
            Some(RecognizerInput::Shutdown) => {
                log::debug!("runtime: shutdown");
                recognizer.reset();
                return;
            }
        }
    }
}
