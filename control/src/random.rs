//! Source of randomness provided by the platform.

/// Hardware random generator, or any other source of entropy.
pub trait Random {
    /// Returns a random number in range `[0.0, 1.0)`.
    fn uniform(&mut self) -> f32;
}
