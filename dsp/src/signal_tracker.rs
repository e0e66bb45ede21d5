//! Detect impulses such as claps or beats in a raw analog signal.
//!
//! The tracker keeps a very slow baseline of the signal, a band of its
//! averaged extremes and the average interval between detected events.
//! An event fires when a sample deviates from the baseline by more than a
//! fraction of the band. That fraction gets smaller when events arrive in
//! a steady rhythm, so the detector locks onto beats while it stays
//! conservative against random noise.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::envelope::Envelope;
use crate::log;
use crate::rolling_average::RollingAverage;

/// Tuning of the tracker.
///
/// Times are in milliseconds, levels in raw sample units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// The highest value the analog input can return.
    pub sample_max: u16,
    pub initial_baseline: f32,
    pub baseline_window: u32,
    pub initial_envelope: (f32, f32),
    pub envelope_window: u32,
    /// Minimal distance of the band's edges from the baseline.
    pub envelope_margin: f32,
    pub initial_event_interval: f32,
    pub event_interval_window: u32,
    /// A single physical impulse rings for a while, this many milliseconds
    /// after an event are ignored.
    pub refractory_period: u32,
    /// Fraction of the half band the signal must cross.
    pub sensitivity: f32,
    pub periodicity_tolerance: f32,
    /// Multiplier of the sensitivity when events follow a steady rhythm.
    pub periodicity_bonus: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_max: 1023,
            initial_baseline: 512.0,
            baseline_window: 1000,
            initial_envelope: (300.0, 500.0),
            envelope_window: 4,
            envelope_margin: 300.0,
            initial_event_interval: 500.0,
            event_interval_window: 4,
            refractory_period: 150,
            sensitivity: 0.7,
            periodicity_tolerance: 20.0,
            periodicity_bonus: 0.8,
        }
    }
}

/// Adaptive event detector.
///
/// Call `sample` for every raw reading, at least every few milliseconds,
/// and `recalibrate` periodically, every 2 seconds with the default
/// configuration. `sample` returns `true` when an event was detected.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalTracker {
    config: Config,
    baseline: RollingAverage,
    envelope: Envelope,
    min_sample: u16,
    max_sample: u16,
    last_sample: u16,
    last_event: u32,
    last_recalibration: u32,
    event_interval: RollingAverage,
}

impl Default for SignalTracker {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SignalTracker {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            baseline: RollingAverage::new(config.initial_baseline, config.baseline_window),
            envelope: Envelope::new(
                config.initial_envelope.0,
                config.initial_envelope.1,
                config.envelope_window,
            ),
            min_sample: config.sample_max,
            max_sample: 0,
            last_sample: config.initial_baseline as u16,
            last_event: 0,
            last_recalibration: 0,
            event_interval: RollingAverage::new(
                config.initial_event_interval,
                config.event_interval_window,
            ),
        }
    }

    pub fn sample(&mut self, raw: u16, now: u32) -> bool {
        let raw = raw.min(self.config.sample_max);
        self.last_sample = raw;
        self.baseline.update(raw as f32);
        self.min_sample = self.min_sample.min(raw);
        self.max_sample = self.max_sample.max(raw);

        let interval = self.millis_since_event(now);
        if interval <= self.config.refractory_period {
            return false;
        }

        let mut sensitivity = self.config.sensitivity;
        if (interval as f32 - self.event_interval.value()).abs() < self.config.periodicity_tolerance
        {
            sensitivity *= self.config.periodicity_bonus;
        }

        let deviation = (raw as f32 - self.baseline.value()).abs();
        if deviation > self.envelope.width() / 2.0 * sensitivity {
            self.event_interval.update(interval as f32);
            self.last_event = now;
            log::debug!("Event after {=u32} ms", interval);
            true
        } else {
            false
        }
    }

    pub fn recalibrate(&mut self, now: u32) {
        self.envelope.fold(
            self.min_sample as f32,
            self.max_sample as f32,
            self.baseline.value(),
            self.config.envelope_margin,
        );
        self.min_sample = self.config.sample_max;
        self.max_sample = 0;
        self.last_recalibration = now;
        log::debug!(
            "Recalibrated band=[{=f32}, {=f32}] baseline={=f32}",
            self.envelope.min(),
            self.envelope.max(),
            self.baseline.value()
        );
    }

    #[must_use]
    pub fn baseline(&self) -> f32 {
        self.baseline.value()
    }

    #[must_use]
    pub fn min(&self) -> f32 {
        self.envelope.min()
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.envelope.max()
    }

    #[must_use]
    pub fn event_interval(&self) -> f32 {
        self.event_interval.value()
    }

    #[must_use]
    pub fn last_event(&self) -> u32 {
        self.last_event
    }

    #[must_use]
    pub fn last_sample(&self) -> u16 {
        self.last_sample
    }

    #[must_use]
    pub fn last_recalibration(&self) -> u32 {
        self.last_recalibration
    }

    #[must_use]
    pub fn sample_max(&self) -> u16 {
        self.config.sample_max
    }

    /// Time passed since the last event, surviving the clock overflow.
    #[must_use]
    pub fn millis_since_event(&self, now: u32) -> u32 {
        now.wrapping_sub(self.last_event)
    }

    /// Distance from the baseline the signal must cross to fire an event,
    /// not counting the bonus for steady rhythm.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.envelope.width() / 2.0 * self.config.sensitivity
    }

    #[must_use]
    pub fn trigger_band(&self) -> (f32, f32) {
        let threshold = self.threshold();
        (self.baseline() - threshold, self.baseline() + threshold)
    }

    /// Loudness of the last sample relative to the band, between 0 and 1.
    #[must_use]
    pub fn level(&self) -> f32 {
        let width = self.envelope.width();
        if width <= 0.0 {
            return 0.0;
        }
        ((self.baseline() - self.last_sample as f32).abs() * 2.0 / width).min(1.0)
    }
}
