//! Slowly adapting band of signal extremes.

use crate::rolling_average::RollingAverage;

/// Averaged minimum and maximum of the signal.
///
/// The band is updated once per calibration period with the extremes
/// observed during that period. It is never allowed to get narrower than
/// `margin` on either side of the baseline, so a silent input cannot
/// collapse it and make the detector hypersensitive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Envelope {
    min: RollingAverage,
    max: RollingAverage,
}

impl Envelope {
    #[must_use]
    pub fn new(min: f32, max: f32, window: u32) -> Self {
        Self {
            min: RollingAverage::new(min, window),
            max: RollingAverage::new(max, window),
        }
    }

    /// Fold extremes of the last period into the band.
    pub fn fold(&mut self, min_sample: f32, max_sample: f32, baseline: f32, margin: f32) {
        let min = self.min.update(min_sample).min(baseline - margin);
        self.min.set(min);

        let max = self.max.update(max_sample).max(baseline + margin);
        self.max.set(max);
    }

    #[must_use]
    pub fn min(&self) -> f32 {
        self.min.value()
    }

    #[must_use]
    pub fn max(&self) -> f32 {
        self.max.value()
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.max() - self.min()
    }
}
