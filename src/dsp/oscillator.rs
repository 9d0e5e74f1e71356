//! Phase-accumulator oscillators: a 50% duty pulse and a stepped wavetable.

use std::f32::consts::{PI, TAU};

use crate::AMPLITUDE;

/// Number of entries in one wavetable cycle.
pub const WAVETABLE_LEN: usize = 16;

/// Default wavetable: one triangle cycle stepped to 16 levels.
pub const DEFAULT_WAVETABLE: [f32; WAVETABLE_LEN] = [
    0.0, 0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25, //
    0.0, -0.25, -0.5, -0.75, -1.0, -0.75, -0.5, -0.25,
];

/// A free-running oscillator. The phase accumulator persists across note
/// boundaries so retriggered notes continue the waveform without a click.
#[derive(Debug, Clone, PartialEq)]
pub enum Oscillator {
    /// 50% duty square wave. Phase is in radians, wrapped to `[0, 2pi)`.
    Pulse { phase: f32 },
    /// Stepped table lookup. Phase is normalized to `[0, 1)`.
    Wavetable {
        phase: f32,
        table: [f32; WAVETABLE_LEN],
    },
}

impl Oscillator {
    /// A pulse oscillator starting at phase zero.
    pub fn pulse() -> Self {
        Self::Pulse { phase: 0.0 }
    }

    /// A wavetable oscillator over `table`, starting at phase zero.
    pub fn wavetable(table: [f32; WAVETABLE_LEN]) -> Self {
        Self::Wavetable { phase: 0.0, table }
    }

    /// Advance the phase by one sample period and return the next output
    /// sample. Callers gate on channel activity and positive frequency;
    /// this assumes `frequency > 0`.
    pub fn advance_and_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        match self {
            Self::Pulse { phase } => {
                *phase += TAU * frequency / sample_rate;
                if *phase > TAU {
                    *phase -= TAU;
                }
                if *phase < PI {
                    AMPLITUDE
                } else {
                    -AMPLITUDE
                }
            }
            Self::Wavetable { phase, table } => {
                *phase += frequency / sample_rate;
                if *phase >= 1.0 {
                    *phase -= 1.0;
                }
                let index = (*phase * WAVETABLE_LEN as f32) as usize % WAVETABLE_LEN;
                // Half the pulse level so a wavetable channel rides on top of
                // two full-scale pulse channels without dominating the mix.
                table[index] * AMPLITUDE * 0.5
            }
        }
    }

    /// Current phase accumulator value.
    pub fn phase(&self) -> f32 {
        match self {
            Self::Pulse { phase } => *phase,
            Self::Wavetable { phase, .. } => *phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(osc: &mut Oscillator, frequency: f32, sample_rate: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|_| osc.advance_and_sample(frequency, sample_rate))
            .collect()
    }

    #[test]
    fn pulse_outputs_exactly_two_levels() {
        let mut osc = Oscillator::pulse();
        let samples = collect(&mut osc, 440.0, 44_100.0, 2_000);
        assert!(samples.iter().all(|&s| s == AMPLITUDE || s == -AMPLITUDE));
        assert!(samples.contains(&AMPLITUDE));
        assert!(samples.contains(&-AMPLITUDE));
    }

    #[test]
    fn pulse_period_matches_frequency() {
        // 441 Hz at 44.1 kHz is exactly 100 samples per cycle; accumulated
        // rounding may shift an edge by one sample.
        let mut osc = Oscillator::pulse();
        let samples = collect(&mut osc, 441.0, 44_100.0, 1_000);
        let rising: Vec<usize> = samples
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] < 0.0 && w[1] > 0.0)
            .map(|(i, _)| i)
            .collect();
        assert!(rising.len() >= 2);
        for pair in rising.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((99..=101).contains(&gap), "period off: {gap}");
        }
    }

    #[test]
    fn pulse_phase_stays_canonical() {
        let mut osc = Oscillator::pulse();
        for _ in 0..100_000 {
            osc.advance_and_sample(987.77, 44_100.0);
            let phase = osc.phase();
            assert!((0.0..TAU).contains(&phase), "phase out of range: {phase}");
        }
    }

    #[test]
    fn wavetable_phase_stays_normalized() {
        let mut osc = Oscillator::wavetable(DEFAULT_WAVETABLE);
        for _ in 0..100_000 {
            osc.advance_and_sample(523.25, 44_100.0);
            let phase = osc.phase();
            assert!((0.0..1.0).contains(&phase), "phase out of range: {phase}");
        }
    }

    #[test]
    fn wavetable_output_is_scaled_table_value() {
        let mut osc = Oscillator::wavetable(DEFAULT_WAVETABLE);
        let scale = AMPLITUDE * 0.5;
        for _ in 0..10_000 {
            let sample = osc.advance_and_sample(261.63, 44_100.0);
            assert!(
                DEFAULT_WAVETABLE
                    .iter()
                    .any(|&entry| (entry * scale - sample).abs() < 1e-6),
                "sample {sample} not from the table"
            );
        }
    }

    #[test]
    fn phase_persists_across_frequency_changes() {
        let mut osc = Oscillator::pulse();
        collect(&mut osc, 440.0, 44_100.0, 37);
        let before = osc.phase();
        // A frequency change alone does not touch the accumulator.
        let _ = osc.advance_and_sample(880.0, 44_100.0);
        assert!(osc.phase() > before);
    }
}
