//! Per-channel oscillator state shared between control and render threads.

use std::sync::Mutex;

use crate::dsp::oscillator::{Oscillator, DEFAULT_WAVETABLE};

/// Which oscillator a channel drives. Fixed at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Pulse,
    Wavetable,
}

/// Mutable state of one sound channel. All fields are read and written
/// under the owning channel's lock, so the render thread never observes a
/// half-applied note change.
#[derive(Debug)]
pub struct ChannelState {
    pub active: bool,
    pub frequency: f32,
    pub osc: Oscillator,
}

/// One sound channel: a kind tag plus locked state.
pub struct Channel {
    kind: ChannelKind,
    state: Mutex<ChannelState>,
}

impl Channel {
    pub fn new(kind: ChannelKind) -> Self {
        let osc = match kind {
            ChannelKind::Pulse => Oscillator::pulse(),
            ChannelKind::Wavetable => Oscillator::wavetable(DEFAULT_WAVETABLE),
        };
        Self {
            kind,
            state: Mutex::new(ChannelState {
                active: false,
                frequency: 0.0,
                osc,
            }),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Activate the channel at `frequency`. Non-positive frequencies are
    /// ignored. The running phase is deliberately kept, so a retriggered
    /// note continues the waveform instead of clicking.
    pub fn note_on(&self, frequency: f32) {
        if frequency <= 0.0 {
            return;
        }
        let mut state = self.state.lock().unwrap();
        state.active = true;
        state.frequency = frequency;
    }

    /// Silence the channel. Frequency and phase are retained; calling this
    /// on an already-silent channel is a no-op.
    pub fn note_off(&self) {
        self.state.lock().unwrap().active = false;
    }

    /// Add one block of this channel's output on top of `out`. The lock is
    /// held for the duration of one buffer's synthesis only.
    pub fn accumulate(&self, out: &mut [f32], sample_rate: f32) {
        let mut state = self.state.lock().unwrap();
        if !state.active || state.frequency <= 0.0 {
            return;
        }
        let frequency = state.frequency;
        for slot in out.iter_mut() {
            *slot += state.osc.advance_and_sample(frequency, sample_rate);
        }
    }

    /// Read-only view for UI highlighting.
    pub fn snapshot(&self) -> ChannelSnapshot {
        let state = self.state.lock().unwrap();
        ChannelSnapshot {
            kind: self.kind,
            active: state.active,
            frequency: state.frequency,
        }
    }
}

/// Point-in-time view of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSnapshot {
    pub kind: ChannelKind,
    pub active: bool,
    pub frequency: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_rejects_non_positive_frequency() {
        let channel = Channel::new(ChannelKind::Pulse);
        channel.note_on(0.0);
        assert!(!channel.snapshot().active);
        channel.note_on(-440.0);
        assert!(!channel.snapshot().active);
        channel.note_on(440.0);
        assert!(channel.snapshot().active);
    }

    #[test]
    fn note_off_is_idempotent() {
        let channel = Channel::new(ChannelKind::Pulse);
        channel.note_on(440.0);
        channel.note_off();
        let first = channel.snapshot();
        channel.note_off();
        let second = channel.snapshot();
        assert!(!first.active);
        assert_eq!(first, second);
        // Frequency survives the release.
        assert_eq!(second.frequency, 440.0);
    }

    #[test]
    fn silent_channel_leaves_buffer_untouched() {
        let channel = Channel::new(ChannelKind::Pulse);
        let mut out = vec![0.25f32; 64];
        channel.accumulate(&mut out, 44_100.0);
        assert!(out.iter().all(|&s| s == 0.25));
    }
}
