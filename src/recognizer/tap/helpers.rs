use super::*;

impl TapHsm {
    pub(super) fn new(config: TapConfig) -> Self {
        Self {
            config,
            state: GestureState::Possible,
            previous_tap_time: None,
            previous_tap_center: None,
            tap_count: 0,
            timer: TimerSlot::new(),
            last_sample: None,
            last_trace: TapTraceSample::default(),
        }
    }

    pub(super) fn target(state: GestureState) -> State {
        match state {
            GestureState::Possible => State::idle(),
            GestureState::Began => State::began(),
            GestureState::Failed => State::failed(),
            GestureState::Recognized => State::recognized(),
        }
    }

    pub(super) fn effective_index(&self) -> u32 {
        // `taps` is validated non-zero at construction.
        self.tap_count % self.config.taps.max(1)
    }

    pub(super) fn settle(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
        state: GestureState,
        reason: RejectReason,
    ) {
        if self.state != state {
            log::trace!("tap: {} -> {}", self.state.label(), state.label());
        }
        self.state = state;
        context.state = Some(state);
        self.last_trace = TapTraceSample {
            time_stamp: now_ms,
            state,
            reject_reason: reason,
            tap_count: self.tap_count,
            effective_index: self.effective_index(),
            timer: self.timer.pending().map(|timer| timer.kind),
        };
    }

    pub(super) fn setup_began(&mut self, now_ms: u64) -> (GestureState, RejectReason) {
        self.timer.arm(TimerKind::FailSafe, now_ms);
        (GestureState::Began, RejectReason::None)
    }

    pub(super) fn process_sample(
        &mut self,
        sample: &InputSample,
        has_require_failures: bool,
    ) -> (GestureState, RejectReason) {
        let enabled = self.config.enable;
        let valid_pointers = sample.pointer_count() == self.config.pointers;
        let valid_movement = sample.distance < self.config.threshold;
        let valid_touch_time = sample.delta_time < self.config.time;

        self.timer.cancel();

        if !enabled {
            return (GestureState::Failed, RejectReason::Disabled);
        }

        if sample.event_type.contains(EventType::START) && self.tap_count == 0 {
            return self.setup_began(sample.time_stamp);
        }

        if !valid_pointers {
            return (GestureState::Failed, RejectReason::PointerCount);
        }
        if !valid_movement {
            return (GestureState::Failed, RejectReason::Movement);
        }
        if !valid_touch_time {
            return (GestureState::Failed, RejectReason::TouchTime);
        }

        if !sample.event_type.contains(EventType::END) {
            return self.setup_began(sample.time_stamp);
        }

        self.complete_tap(sample, has_require_failures)
    }

    fn complete_tap(
        &mut self,
        sample: &InputSample,
        has_require_failures: bool,
    ) -> (GestureState, RejectReason) {
        let valid_interval = self.previous_tap_time.is_none_or(|previous| {
            sample.time_stamp.saturating_sub(previous) < self.config.interval
        });
        let valid_multi_tap = self.previous_tap_center.is_none_or(|previous| {
            distance(previous, sample.center) < self.config.pos_threshold
        });

        // The completed tap always becomes the reference for the next one,
        // even when it restarts the sequence.
        self.previous_tap_time = Some(sample.time_stamp);
        self.previous_tap_center = Some(sample.center);

        let reason = if !valid_multi_tap {
            RejectReason::PositionDrift
        } else if !valid_interval {
            RejectReason::IntervalExpired
        } else {
            RejectReason::None
        };

        if reason == RejectReason::None {
            self.tap_count = self.tap_count.saturating_add(1);
        } else {
            if self.tap_count > 0 {
                log::debug!(
                    "tap: sequence restart reason={} previous_count={}",
                    reason.label(),
                    self.tap_count
                );
            }
            self.tap_count = 1;
        }

        self.last_sample = Some(sample.clone());

        if self.effective_index() != 0 {
            let (state, _) = self.setup_began(sample.time_stamp);
            return (state, reason);
        }

        if has_require_failures {
            self.timer.arm(TimerKind::DeferredCommit, sample.time_stamp);
            return (GestureState::Began, reason);
        }

        log::debug!("tap: recognized count={}", self.tap_count);
        (GestureState::Recognized, reason)
    }

    pub(super) fn tap_event(&self) -> Option<TapEvent> {
        self.last_sample.as_ref().map(|sample| TapEvent {
            sample: sample.clone(),
            tap_count: self.tap_count,
        })
    }
}
