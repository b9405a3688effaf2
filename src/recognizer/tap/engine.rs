use statig::blocking::IntoStateMachineExt as _;

use super::*;
use crate::{
    config::ConfigError,
    recognizer::{GestureSink, Recognizer, RecognizerHost, TouchAction},
    timer::PendingTimer,
};

const TOUCH_ACTIONS: &[TouchAction] = &[TouchAction::Manipulation];

pub struct TapRecognizer {
    machine: statig::blocking::StateMachine<TapHsm>,
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self::from_validated(TapConfig::default())
    }
}

impl TapRecognizer {
    pub fn new(config: TapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: TapConfig) -> Self {
        Self {
            machine: TapHsm::new(config).state_machine(),
        }
    }

    pub fn config(&self) -> &TapConfig {
        &self.machine.inner().config
    }

    /// Running tap count of the current multi-tap sequence.
    pub fn tap_count(&self) -> u32 {
        self.machine.inner().tap_count
    }

    pub fn last_trace(&self) -> TapTraceSample {
        self.machine.inner().last_trace
    }

    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.machine.inner().timer.pending()
    }

    /// Fires the timer named by `token`. Cancelled or superseded tokens are
    /// ignored and return `None`.
    pub fn fire_timer(&mut self, token: TimerToken) -> Option<TimerFired> {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&TapHsmEvent::Timer(token), &mut context);
        context.fired
    }

    /// Fires the pending timer if its deadline is at or before `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> Option<TimerFired> {
        let token = self.machine.inner().timer.due(now_ms)?;
        self.fire_timer(token)
    }
}

impl Recognizer for TapRecognizer {
    fn touch_action(&self) -> &'static [TouchAction] {
        TOUCH_ACTIONS
    }

    fn process(&mut self, sample: &InputSample, host: &dyn RecognizerHost) -> GestureState {
        let mut context = DispatchContext::default();
        let event = TapHsmEvent::Sample {
            sample: sample.clone(),
            has_require_failures: host.has_require_failures(),
        };
        self.machine.handle_with_context(&event, &mut context);
        context.state.unwrap_or(self.machine.inner().state)
    }

    fn emit(&mut self, sink: &mut dyn GestureSink) {
        let hsm = self.machine.inner();
        if hsm.state != GestureState::Recognized {
            return;
        }
        if let Some(payload) = hsm.tap_event() {
            sink.signal(&hsm.config.event, &payload);
        }
    }

    fn reset(&mut self) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&TapHsmEvent::Reset, &mut context);
    }

    fn state(&self) -> GestureState {
        self.machine.inner().state
    }
}
