//! Low-level synthesis primitives.
//!
//! Everything in this module is allocation-free and realtime-safe, so the
//! render callback can advance oscillators directly while holding a channel
//! lock.

pub mod oscillator;

pub use oscillator::Oscillator;
