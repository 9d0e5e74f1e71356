//! chipstaff - terminal pulse/wavetable composer
//!
//! Run with: cargo run
//!
//! Play notes live on the A..J and Z..M key rows, click them onto the staff
//! with the mouse, and press Space to hear the staff back. Every rendered
//! sample is captured and written to a WAV file when the session ends.

mod app;
mod ui;

use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use chipstaff::engine::{ChipEngine, EngineConfig};
use chipstaff::io::wav::{self, SaveOutcome};
use chipstaff::{FRAMES_PER_BUFFER, MAX_BLOCK_SIZE, SAMPLE_RATE};

use app::App;

/// Where the session capture lands.
const CAPTURE_PATH: &str = "chipstaff_session.wav";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let engine = Arc::new(ChipEngine::new(EngineConfig::with_wavetable()));
    let stream = start_audio(engine.clone())?;

    // Kitty-style key release events let held notes sustain; terminals
    // without the protocol fall back to a repeat-driven timeout in App.
    let key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);

    let mut terminal = ratatui::init();
    let mut setup = execute!(std::io::stdout(), EnableMouseCapture);
    if setup.is_ok() && key_releases {
        setup = execute!(
            std::io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );
    }
    let run_result = match setup {
        Ok(()) => App::new(engine.clone(), key_releases).run(&mut terminal),
        Err(err) => Err(err).wrap_err("failed to configure terminal input"),
    };
    if key_releases {
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    // Stop rendering before draining the capture.
    drop(stream);

    let capture = engine.take_capture();
    match wav::save(Path::new(CAPTURE_PATH), &capture, SAMPLE_RATE) {
        Ok(SaveOutcome::Written { path, samples }) => {
            println!("Audio saved to {} ({} samples)", path.display(), samples);
        }
        Ok(SaveOutcome::Empty) => println!("No audio data recorded"),
        // A failed dump should not mask an otherwise clean session.
        Err(err) => eprintln!("Failed to write capture: {err}"),
    }

    run_result
}

/// Open the default output device and keep the engine rendering into it.
fn start_audio(engine: Arc<ChipEngine>) -> EyreResult<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let channels = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?
        .channels() as usize;

    let config = cpal::StreamConfig {
        channels: channels as u16,
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Fixed(FRAMES_PER_BUFFER),
    };

    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    engine.render(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to open the output stream")?;

    stream.play().wrap_err("failed to start the output stream")?;
    Ok(stream)
}
