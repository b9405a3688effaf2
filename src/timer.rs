//! Single-slot timer owned by a recognizer.
//!
//! At most one timer is live at a time. Arming always cancels the previous
//! timer first, and every arm bumps a generation counter so a token handed
//! out for an earlier timer can never fire a later one.

/// Fail-safe watchdog window: the gesture fails if no sample arrives in time.
pub const FAIL_SAFE_MS: u64 = 200;
/// Delay before a provisional recognition commits while siblings may still fail.
pub const DEFERRED_COMMIT_MS: u64 = 250;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerKind {
    FailSafe,
    DeferredCommit,
}

impl TimerKind {
    pub const fn delay_ms(self) -> u64 {
        match self {
            TimerKind::FailSafe => FAIL_SAFE_MS,
            TimerKind::DeferredCommit => DEFERRED_COMMIT_MS,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TimerKind::FailSafe => "fail_safe",
            TimerKind::DeferredCommit => "deferred_commit",
        }
    }
}

/// Identifies one arming of a [`TimerSlot`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimerToken(u64);

impl TimerToken {
    pub const fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingTimer {
    pub token: TimerToken,
    pub kind: TimerKind,
    pub deadline_ms: u64,
}

impl PendingTimer {
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.deadline_ms
    }

    pub fn ms_until(&self, now_ms: u64) -> u64 {
        self.deadline_ms.saturating_sub(now_ms)
    }
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    generation: u64,
    pending: Option<PendingTimer>,
}

impl TimerSlot {
    pub const fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    pub fn arm(&mut self, kind: TimerKind, now_ms: u64) -> TimerToken {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);
        self.pending = Some(PendingTimer {
            token,
            kind,
            deadline_ms: now_ms.saturating_add(kind.delay_ms()),
        });
        log::trace!(
            "timer: arm kind={} gen={} deadline_ms={}",
            kind.label(),
            self.generation,
            now_ms.saturating_add(kind.delay_ms())
        );
        token
    }

    pub fn cancel(&mut self) -> Option<PendingTimer> {
        let cancelled = self.pending.take();
        if let Some(timer) = cancelled {
            log::trace!(
                "timer: cancel kind={} gen={}",
                timer.kind.label(),
                timer.token.generation()
            );
        }
        cancelled
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    /// Consumes the live timer if `token` still names it. Stale tokens leave
    /// the slot untouched and return `None`.
    pub fn take(&mut self, token: TimerToken) -> Option<PendingTimer> {
        match self.pending {
            Some(timer) if timer.token == token => self.pending.take(),
            _ => None,
        }
    }

    /// Token of the live timer if its deadline has passed.
    pub fn due(&self, now_ms: u64) -> Option<TimerToken> {
        self.pending
            .filter(|timer| timer.is_due(now_ms))
            .map(|timer| timer.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_replaces_previous_timer() {
        let mut slot = TimerSlot::new();
        let first = slot.arm(TimerKind::FailSafe, 1_000);
        let second = slot.arm(TimerKind::DeferredCommit, 1_050);

        assert_ne!(first, second);
        let pending = slot.pending().expect("timer should be pending");
        assert_eq!(pending.kind, TimerKind::DeferredCommit);
        assert_eq!(pending.deadline_ms, 1_300);
        assert_eq!(slot.take(first), None);
        assert_eq!(
            slot.take(second).map(|timer| timer.kind),
            Some(TimerKind::DeferredCommit)
        );
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn cancelled_token_is_a_no_op() {
        let mut slot = TimerSlot::new();
        let token = slot.arm(TimerKind::FailSafe, 0);
        assert!(slot.cancel().is_some());
        assert_eq!(slot.take(token), None);
        assert!(slot.cancel().is_none());
    }

    #[test]
    fn due_respects_deadline() {
        let mut slot = TimerSlot::new();
        let token = slot.arm(TimerKind::FailSafe, 500);
        assert_eq!(slot.due(699), None);
        assert_eq!(slot.due(700), Some(token));
        assert_eq!(slot.pending().map(|t| t.ms_until(650)), Some(50));
    }
}
