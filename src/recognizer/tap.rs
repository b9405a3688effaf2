//! Tap and multi-tap recognition.
//!
//! A tap is a pointer down/up cycle that stays within the movement, duration
//! and pointer-count limits. Consecutive taps that land within `interval` ms
//! and `pos_threshold` px of the previous one accumulate into a multi-tap;
//! recognition fires whenever the running count is a positive multiple of
//! `taps`. The count survives across contacts and only restarts when a
//! completed tap breaks the time or position window.
//!
//! While tracking, a 200 ms fail-safe timer is re-armed on every sample so a
//! gap in the input stream (for example a lost END) fails the gesture. When
//! siblings still have to fail first, recognition is deferred by 250 ms; any
//! later sample cancels that commit.

use statig::prelude::*;

use super::{GestureState, TapEvent};
use crate::{
    config::TapConfig,
    input::{distance, EventType, InputSample, PointerPoint},
    timer::{TimerKind, TimerSlot, TimerToken},
    trace::{RejectReason, TapTraceSample},
};

mod engine;
mod helpers;

pub use engine::TapRecognizer;

/// Outcome of a timer firing, reported back to the manager.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerFired {
    /// Input went quiet for too long; the state is now failed.
    FailSafe,
    /// Deferred recognition committed; the manager should attempt to emit.
    Commit,
}

#[derive(Clone, Debug)]
enum TapHsmEvent {
    Sample {
        sample: InputSample,
        has_require_failures: bool,
    },
    Timer(TimerToken),
    Reset,
}

#[derive(Default)]
struct DispatchContext {
    state: Option<GestureState>,
    fired: Option<TimerFired>,
}

struct TapHsm {
    config: TapConfig,
    state: GestureState,
    previous_tap_time: Option<u64>,
    previous_tap_center: Option<PointerPoint>,
    tap_count: u32,
    timer: TimerSlot,
    last_sample: Option<InputSample>,
    last_trace: TapTraceSample,
}

#[state_machine(initial = "State::idle()")]
impl TapHsm {
    #[state(superstate = "active")]
    fn idle(&mut self, context: &mut DispatchContext, event: &TapHsmEvent) -> Outcome<State> {
        let _ = context;
        let _ = event;
        Super
    }

    #[state(superstate = "active")]
    fn began(&mut self, context: &mut DispatchContext, event: &TapHsmEvent) -> Outcome<State> {
        match event {
            TapHsmEvent::Timer(token) => {
                let Some(timer) = self.timer.take(*token) else {
                    return Handled;
                };
                match timer.kind {
                    TimerKind::FailSafe => {
                        log::debug!("tap: fail-safe gap elapsed; failing");
                        self.settle(
                            context,
                            timer.deadline_ms,
                            GestureState::Failed,
                            RejectReason::GapTimeout,
                        );
                        context.fired = Some(TimerFired::FailSafe);
                        Transition(State::failed())
                    }
                    TimerKind::DeferredCommit => {
                        log::debug!("tap: deferred commit count={}", self.tap_count);
                        self.settle(
                            context,
                            timer.deadline_ms,
                            GestureState::Recognized,
                            RejectReason::None,
                        );
                        context.fired = Some(TimerFired::Commit);
                        Transition(State::recognized())
                    }
                }
            }
            _ => Super,
        }
    }

    #[state(superstate = "active")]
    fn failed(&mut self, context: &mut DispatchContext, event: &TapHsmEvent) -> Outcome<State> {
        let _ = context;
        let _ = event;
        Super
    }

    #[state(superstate = "active")]
    fn recognized(
        &mut self,
        context: &mut DispatchContext,
        event: &TapHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        let _ = event;
        Super
    }

    #[superstate]
    fn active(&mut self, context: &mut DispatchContext, event: &TapHsmEvent) -> Outcome<State> {
        match event {
            TapHsmEvent::Sample {
                sample,
                has_require_failures,
            } => {
                let (state, reason) = self.process_sample(sample, *has_require_failures);
                self.settle(context, sample.time_stamp, state, reason);
                Transition(Self::target(state))
            }
            TapHsmEvent::Reset => {
                self.timer.cancel();
                Handled
            }
            TapHsmEvent::Timer(token) => {
                log::trace!(
                    "tap: ignoring stale timer gen={} in state={}",
                    token.generation(),
                    self.state.label()
                );
                Handled
            }
        }
    }
}
