//! Components of the display, turning sound into animations.
//!
//! It is mainly targetted to run in a firmware with a single main loop
//! polling the peripherals. However, everything but the hardware binding
//! lives here, so it runs in software and tests as well.
//!
//! Following is the flow of a single tick of the main loop:
//!
//! ```text
//!   [ Mic ] [ Button ] [ Clock ]
//!       |       |         |
//!       +---(Snapshot)----+
//!               |
//!               V
//!     [ Engine {SignalTracker} ] ----(event)----> [ Animation {Ball, Path} ]
//!               |                                          |
//!               +--------------> [ Canvas ] <--------------+
//!                                    |
//!                                 [ LEDs ]
//! ```

#![no_std]
#![allow(clippy::items_after_statements)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod animation;
pub mod ball;
pub mod canvas;
pub mod diagnostics;
pub mod engine;
pub mod geometry;
pub mod input;
mod log;
pub mod path;
pub mod random;
mod schedule;

pub use engine::{Config, Engine, Reaction, Screen};
pub use input::button::Press;
pub use input::snapshot::Snapshot;
