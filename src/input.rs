//! Normalized pointer samples as delivered by the upstream input normalizer.

use heapless::Vec;

/// Upper bound on simultaneous contacts carried by one sample.
pub const MAX_POINTERS: usize = 10;

pub const INPUT_START: u8 = 0x01;
pub const INPUT_MOVE: u8 = 0x02;
pub const INPUT_END: u8 = 0x04;
pub const INPUT_CANCEL: u8 = 0x08;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPoint {
    pub x: f32,
    pub y: f32,
}

impl PointerPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: PointerPoint, b: PointerPoint) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Input phase bit flags. Normally exactly one bit is set, but consumers test
/// membership rather than equality.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EventType(u8);

impl EventType {
    pub const START: Self = Self(INPUT_START);
    pub const MOVE: Self = Self(INPUT_MOVE);
    pub const END: Self = Self(INPUT_END);
    pub const CANCEL: Self = Self(INPUT_CANCEL);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn label(self) -> &'static str {
        if self.contains(Self::START) {
            "start"
        } else if self.contains(Self::END) {
            "end"
        } else if self.contains(Self::CANCEL) {
            "cancel"
        } else if self.contains(Self::MOVE) {
            "move"
        } else {
            "none"
        }
    }
}

/// One normalized pointer/touch event. All times are milliseconds on the
/// caller's monotonic clock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSample {
    /// Up to [`MAX_POINTERS`] contact positions.
    pub pointers: Vec<PointerPoint, MAX_POINTERS>,
    /// Contacts reported by the normalizer; may exceed `pointers.len()`.
    pub contact_count: usize,
    pub event_type: EventType,
    /// Elapsed time since the current pointer-down began.
    pub delta_time: u64,
    /// Movement magnitude since pointer-down.
    pub distance: f32,
    pub time_stamp: u64,
    /// Centroid of the active pointers.
    pub center: PointerPoint,
}

impl InputSample {
    /// Single-contact sample whose center is the contact itself.
    pub fn single(
        event_type: EventType,
        time_stamp: u64,
        delta_time: u64,
        distance: f32,
        center: PointerPoint,
    ) -> Self {
        let mut pointers = Vec::new();
        // Capacity is non-zero, the push cannot fail.
        let _ = pointers.push(center);
        Self {
            pointers,
            contact_count: 1,
            event_type,
            delta_time,
            distance,
            time_stamp,
            center,
        }
    }

    /// Builds a sample from an explicit contact list; the center is their
    /// centroid. Positions beyond [`MAX_POINTERS`] are not stored, but still
    /// count towards [`InputSample::pointer_count`].
    pub fn with_pointers(
        event_type: EventType,
        time_stamp: u64,
        delta_time: u64,
        distance: f32,
        contacts: &[PointerPoint],
    ) -> Self {
        let pointers: Vec<PointerPoint, MAX_POINTERS> =
            contacts.iter().copied().take(MAX_POINTERS).collect();
        let center = centroid(&pointers);
        Self {
            pointers,
            contact_count: contacts.len(),
            event_type,
            delta_time,
            distance,
            time_stamp,
            center,
        }
    }

    pub fn pointer_count(&self) -> usize {
        self.contact_count.max(self.pointers.len())
    }
}

fn centroid(points: &[PointerPoint]) -> PointerPoint {
    if points.is_empty() {
        return PointerPoint::default();
    }
    let (sx, sy) = points
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    let n = points.len() as f32;
    PointerPoint::new(sx / n, sy / n)
}
