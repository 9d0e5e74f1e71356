//! The synthesis engine: channels, the render path, and the session capture.
//!
//! `ChipEngine` is shared by reference between a control thread (keyboard,
//! sequencer) and the audio callback. Channel mutations and rendering
//! synchronize on short per-channel critical sections; nothing in the render
//! path blocks beyond those.

pub mod capture;
pub mod channel;

pub use channel::{ChannelKind, ChannelSnapshot, ChannelState};

use capture::CaptureBuffer;
use channel::Channel;

use crate::SAMPLE_RATE;

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub channels: Vec<ChannelKind>,
}

impl Default for EngineConfig {
    /// The classic two-pulse-channel setup.
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: vec![ChannelKind::Pulse, ChannelKind::Pulse],
        }
    }
}

impl EngineConfig {
    /// Two pulse channels plus a wavetable channel.
    pub fn with_wavetable() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: vec![ChannelKind::Pulse, ChannelKind::Pulse, ChannelKind::Wavetable],
        }
    }
}

/// Control surface the sequencer drives. Implemented by the engine and by
/// test recorders, so playback logic can be exercised without audio.
pub trait ChannelControl {
    fn note_on(&self, channel: usize, frequency: f32);
    fn note_off(&self, channel: usize);
    fn all_notes_off(&self);
}

/// The mixing engine. `render` is called from the audio callback; every
/// other method is safe to call concurrently from control threads.
pub struct ChipEngine {
    channels: Vec<Channel>,
    capture: CaptureBuffer,
    sample_rate: f32,
}

impl ChipEngine {
    pub fn new(config: EngineConfig) -> Self {
        let channels = config.channels.iter().map(|&kind| Channel::new(kind)).collect();
        Self {
            channels,
            capture: CaptureBuffer::new(),
            sample_rate: config.sample_rate as f32,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fill `out` with one block of mixed mono output.
    ///
    /// Zeroes the buffer, accumulates each active channel under its own lock,
    /// hard-clips the sum to [-1, 1], and appends the post-clip block to the
    /// session capture.
    pub fn render(&self, out: &mut [f32]) {
        out.fill(0.0);
        for channel in &self.channels {
            channel.accumulate(out, self.sample_rate);
        }
        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
        self.capture.append(out);
    }

    /// Point-in-time view of every channel, for the UI.
    pub fn snapshot(&self) -> Vec<ChannelSnapshot> {
        self.channels.iter().map(Channel::snapshot).collect()
    }

    pub fn capture_len(&self) -> usize {
        self.capture.len()
    }

    /// Drain the session capture for encoding. Call after the render
    /// context has stopped.
    pub fn take_capture(&self) -> Vec<f32> {
        self.capture.take()
    }
}

impl ChannelControl for ChipEngine {
    fn note_on(&self, channel: usize, frequency: f32) {
        if let Some(ch) = self.channels.get(channel) {
            ch.note_on(frequency);
        }
    }

    fn note_off(&self, channel: usize) {
        if let Some(ch) = self.channels.get(channel) {
            ch.note_off();
        }
    }

    fn all_notes_off(&self) {
        for ch in &self.channels {
            ch.note_off();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AMPLITUDE;

    #[test]
    fn silent_engine_renders_zeros() {
        let engine = ChipEngine::new(EngineConfig::default());
        let mut out = vec![0.7f32; 256];
        engine.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn two_pulse_channels_never_clip() {
        let engine = ChipEngine::new(EngineConfig::default());
        engine.note_on(0, 440.0);
        engine.note_on(1, 523.25);
        let mut out = vec![0.0f32; 4_096];
        engine.render(&mut out);
        // Worst case is both pulses high: exactly full scale.
        assert!(out.iter().all(|&s| (-1.0..=1.0).contains(&s)));
        assert!(out.iter().any(|&s| s == 2.0 * AMPLITUDE));
    }

    #[test]
    fn third_channel_engages_the_clipper() {
        let engine = ChipEngine::new(EngineConfig::with_wavetable());
        engine.note_on(0, 440.0);
        engine.note_on(1, 440.0);
        engine.note_on(2, 440.0);
        let mut out = vec![0.0f32; 4_096];
        engine.render(&mut out);
        assert!(out.iter().all(|&s| (-1.0..=1.0).contains(&s)));
        // Both pulses phase-locked at the same frequency sum to 1.0; the
        // wavetable peak would push past full scale without the clamp.
        assert!(out.iter().any(|&s| s == 1.0));
    }

    #[test]
    fn render_appends_to_capture() {
        let engine = ChipEngine::new(EngineConfig::default());
        let mut out = vec![0.0f32; 256];
        engine.render(&mut out);
        engine.render(&mut out);
        assert_eq!(engine.capture_len(), 512);
        let capture = engine.take_capture();
        assert_eq!(capture.len(), 512);
        assert_eq!(engine.capture_len(), 0);
    }

    #[test]
    fn out_of_range_channel_ids_are_ignored() {
        let engine = ChipEngine::new(EngineConfig::default());
        engine.note_on(7, 440.0);
        engine.note_off(7);
        assert!(engine.snapshot().iter().all(|s| !s.active));
    }

    #[test]
    fn all_notes_off_silences_everything() {
        let engine = ChipEngine::new(EngineConfig::with_wavetable());
        engine.note_on(0, 261.63);
        engine.note_on(1, 523.25);
        engine.note_on(2, 329.63);
        engine.all_notes_off();
        assert!(engine.snapshot().iter().all(|s| !s.active));
    }
}
