//! chipstaff - a miniature two/three-channel synthesizer.
//!
//! Live key input and a staff sequencer drive pulse and wavetable channels;
//! a realtime render callback mixes them, hard-clips the sum, and captures
//! every output sample for a WAV dump at the end of the session.

pub mod dsp;
pub mod engine;
pub mod io;
pub mod keymap;
pub mod sequencing;

/// Session-wide sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Frames requested per audio callback.
pub const FRAMES_PER_BUFFER: u32 = 256;

/// Largest block the render path is asked to fill in one call. Callbacks
/// delivering more frames than this are processed in chunks.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Per-channel pulse amplitude. Two pulse channels sum to exactly full
/// scale, so clipping only engages with a third channel in the mix.
pub const AMPLITUDE: f32 = 0.5;
