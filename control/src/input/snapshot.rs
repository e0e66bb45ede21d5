//! Structures used to pass the current state of hardware peripherals.

/// The current state of all inputs.
///
/// `Snapshot` is meant to be passed from the hardware binding to the
/// control package on each iteration of the main loop. The button is
/// `true` while pressed, regardless of the pin's polarity.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Milliseconds since boot.
    pub now: u32,
    /// Raw reading of the analog input.
    pub sample: u16,
    pub button: bool,
}
