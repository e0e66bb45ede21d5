//! Approximated rolling average.

/// Exponential moving average over an approximate window of `N` samples.
///
/// Unlike a real rolling average, it does not need to store the history.
/// Each new sample takes `1/N` share of the result. The larger the window,
/// the slower it adapts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RollingAverage {
    value: f32,
    window: f32,
}

impl RollingAverage {
    /// # Panics
    ///
    /// Window must be at least 1 sample long.
    #[must_use]
    pub fn new(value: f32, window: u32) -> Self {
        assert!(window > 0, "Window must be at least one sample long");
        Self {
            value,
            window: window as f32,
        }
    }

    pub fn update(&mut self, sample: f32) -> f32 {
        self.value -= self.value / self.window;
        self.value += sample / self.window;
        self.value
    }

    /// Override the current value, keeping the window.
    pub fn set(&mut self, value: f32) {
        self.value = value;
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }
}
