//! Benchmarks for the oscillators and the full render path.
//!
//! Run with: cargo bench
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 samples  = 1.45ms deadline
//!   - 128 samples = 2.90ms deadline
//!   - 256 samples = 5.80ms deadline
//!   - 512 samples = 11.61ms deadline

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use chipstaff::dsp::oscillator::{Oscillator, DEFAULT_WAVETABLE};
use chipstaff::engine::{ChannelControl, ChipEngine, EngineConfig};
use chipstaff::SAMPLE_RATE;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_rate = SAMPLE_RATE as f32;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Pulse - branch per sample
        let mut osc = Oscillator::pulse();
        group.bench_with_input(BenchmarkId::new("pulse", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = osc.advance_and_sample(black_box(440.0), sample_rate);
                }
                black_box(&buffer);
            })
        });

        // Wavetable - index and lookup per sample
        let mut osc = Oscillator::wavetable(DEFAULT_WAVETABLE);
        group.bench_with_input(BenchmarkId::new("wavetable", size), &size, |b, _| {
            b.iter(|| {
                for slot in buffer.iter_mut() {
                    *slot = osc.advance_and_sample(black_box(440.0), sample_rate);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/render");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let engine = ChipEngine::new(EngineConfig::with_wavetable());
        engine.note_on(0, 261.63);
        engine.note_on(1, 523.25);
        engine.note_on(2, 440.0);

        group.bench_with_input(BenchmarkId::new("three_channels", size), &size, |b, _| {
            b.iter(|| {
                engine.render(black_box(&mut buffer));
                // Drain so the capture does not grow across iterations.
                engine.take_capture();
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_oscillator, bench_render);
criterion_main!(benches);
