//! The millisecond clock shared between the tick interrupt and the control loop,
//! plus the deadline arithmetic the loop schedules against it.
//!
//! All comparisons use the signed difference of two wrapping `u32` values, so a
//! schedule keeps working across the ~49.7-day counter wrap.
use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Free-running millisecond counter.
///
/// Only the tick context calls [`Timebase::tick`]. The control loop reads a
/// torn-free snapshot with [`Timebase::now_ms`], which briefly masks interrupts.
///
/// # Examples
/// ```
/// use fan_kit::Timebase;
///
/// static TIMEBASE: Timebase = Timebase::new();
///
/// TIMEBASE.tick();
/// TIMEBASE.tick();
/// assert_eq!(TIMEBASE.now_ms(), 2);
/// ```
pub struct Timebase {
    ms: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl Timebase {
    /// Create a counter starting at zero, suitable for a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ms: Mutex::new(Cell::new(0)),
        }
    }

    /// Advance the counter by one millisecond. Tick context only.
    pub fn tick(&self) {
        self.ms.lock(|ms| ms.set(ms.get().wrapping_add(1)));
    }

    /// Atomic snapshot of the current millisecond count.
    #[must_use]
    pub fn now_ms(&self) -> u32 {
        self.ms.lock(Cell::get)
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::new()
    }
}

/// True once `now_ms` is at or past `deadline_ms`.
#[must_use]
#[inline]
#[expect(
    clippy::cast_possible_wrap,
    reason = "The wrapped difference is meant to be read as signed."
)]
pub const fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

/// A fixed-period schedule with its own next deadline.
///
/// Each due period advances the deadline by exactly one period from the
/// previous deadline (not from "now"), so a late loop iteration is caught up
/// one period at a time and never accumulates drift.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Period {
    period_ms: u32,
    next_ms: u32,
}

impl Period {
    /// Schedule the first deadline one period after `start_ms`.
    #[must_use]
    pub const fn new(start_ms: u32, period_ms: u32) -> Self {
        Self {
            period_ms,
            next_ms: start_ms.wrapping_add(period_ms),
        }
    }

    /// Returns `true` at most once per call when the current deadline has
    /// elapsed, and moves the deadline one period forward.
    pub const fn due(&mut self, now_ms: u32) -> bool {
        if deadline_reached(now_ms, self.next_ms) {
            self.next_ms = self.next_ms.wrapping_add(self.period_ms);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn next_ms(&self) -> u32 {
        self.next_ms
    }
}
