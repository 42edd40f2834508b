//! # timer
//!
//! The COSMAC VIP decremented its delay and tone bytes from an interrupt at
//! 60Hz. Here a counter is just a deadline: the remaining time is worked out
//! from the wall clock whenever somebody asks, so nothing has to tick it.
use std::time::{Duration, Instant};

/// counter rate used when converting to and from register values
pub const TIMER_HZ: u32 = 60;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// a decaying counter
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    armed_at: Instant,
    duration: Duration,
}

impl Timer {
    /// an expired timer
    pub fn new() -> Self {
        Timer {
            armed_at: Instant::now(),
            duration: Duration::ZERO,
        }
    }

    /// restart the countdown from now
    pub fn arm(&mut self, duration: Duration) {
        self.armed_at = Instant::now();
        self.duration = duration;
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.armed_at.elapsed())
    }

    pub fn expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// arm with a count of 1/60s units
    pub fn arm_units(&mut self, units: u8) {
        self.arm(units_to_duration(units));
    }

    /// remaining time as a count of 1/60s units
    pub fn units(&self) -> u8 {
        duration_to_units(self.remaining())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Timer::new()
    }
}

pub fn units_to_duration(units: u8) -> Duration {
    Duration::from_nanos((units as u128 * NANOS_PER_SEC / TIMER_HZ as u128) as u64)
}

/// NB. rounds up, so a part-elapsed unit still counts; saturates at 255
pub fn duration_to_units(d: Duration) -> u8 {
    let units = (d.as_nanos() * TIMER_HZ as u128 + NANOS_PER_SEC - 1) / NANOS_PER_SEC;
    units.min(u8::MAX as u128) as u8
}
