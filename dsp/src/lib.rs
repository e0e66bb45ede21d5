//! Signal processing components that must keep up with the sampling loop.
//!
//! The crate turns a stream of raw analog samples into discrete events,
//! such as claps or beats picked up by a microphone. Everything here runs
//! in constant time per sample and without allocation.

#![no_std]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
#[macro_use]
extern crate approx;

mod log;

pub mod envelope;
pub mod rolling_average;
pub mod signal_tracker;
