use crate::{recognizer::GestureState, timer::TimerKind};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum RejectReason {
    #[default]
    None = 0,
    Disabled = 1,
    PointerCount = 2,
    Movement = 3,
    TouchTime = 4,
    IntervalExpired = 5,
    PositionDrift = 6,
    GapTimeout = 7,
}

impl RejectReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            RejectReason::None => "none",
            RejectReason::Disabled => "disabled",
            RejectReason::PointerCount => "pointer_count",
            RejectReason::Movement => "movement",
            RejectReason::TouchTime => "touch_time",
            RejectReason::IntervalExpired => "interval_expired",
            RejectReason::PositionDrift => "position_drift",
            RejectReason::GapTimeout => "gap_timeout",
        }
    }
}

/// Snapshot of the last decision, refreshed on every sample and timer firing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapTraceSample {
    pub time_stamp: u64,
    pub state: GestureState,
    pub reject_reason: RejectReason,
    pub tap_count: u32,
    pub effective_index: u32,
    pub timer: Option<TimerKind>,
}
