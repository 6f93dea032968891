//! Local wall-clock access and calendar-day arithmetic.
//!
//! # Invariants
//! - Every reading is truncated to whole seconds, matching stored precision.
//! - The due window is half-open: `[now, start_of_day(now) + 1 day)`.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};

/// Source of the current local date-time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_seconds(Local::now().naive_local())
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDateTime);

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self(truncate_to_seconds(instant))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Drops sub-second precision.
pub fn truncate_to_seconds(instant: NaiveDateTime) -> NaiveDateTime {
    instant.trunc_subsecs(0)
}

/// Midnight at the start of `instant`'s calendar day.
pub fn start_of_day(instant: NaiveDateTime) -> NaiveDateTime {
    instant.date().and_time(NaiveTime::MIN)
}

/// Midnight at the start of the following calendar day.
///
/// Saturates at `NaiveDateTime::MAX` on the last representable date.
pub fn end_of_day(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .date()
        .succ_opt()
        .map_or(NaiveDateTime::MAX, |next: NaiveDate| {
            next.and_time(NaiveTime::MIN)
        })
}

/// Window of pending events that still count as due "today".
///
/// The lower bound is `now` itself, so an event earlier today that was
/// never notified is no longer due once its time has passed.
pub fn due_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let now = truncate_to_seconds(now);
    (now, end_of_day(now))
}
