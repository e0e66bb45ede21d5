pub mod button;
pub mod snapshot;
