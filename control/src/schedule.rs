//! Run tasks of the main loop on their own periods.

/// Task timer running on a fixed period.
///
/// The main loop polls it on each iteration with the current time. It is
/// due once more than `period` milliseconds passed since the last time it
/// fired.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Periodic {
    period: u32,
    last: u32,
}

impl Periodic {
    #[must_use]
    pub fn new(period: u32) -> Self {
        Self { period, last: 0 }
    }

    pub fn poll(&mut self, now: u32) -> bool {
        if now.wrapping_sub(self.last) > self.period {
            self.last = now;
            true
        } else {
            false
        }
    }
}
