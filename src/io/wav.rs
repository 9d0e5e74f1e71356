//! WAV encoding of the session capture.
//!
//! Quantization happens here rather than in `hound`: each sample is clamped
//! to [-1, 1] and truncated toward zero at 16-bit full scale, matching the
//! bit pattern of a C-style `(int16_t)(x * 32767.0f)` cast.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Size of a canonical 16-bit PCM mono WAV header.
pub const HEADER_LEN: usize = 44;

#[derive(Debug)]
pub enum WavError {
    Encode(hound::Error),
}

impl fmt::Display for WavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "WAV encoding failed: {err}"),
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<hound::Error> for WavError {
    fn from(err: hound::Error) -> Self {
        Self::Encode(err)
    }
}

/// Outcome of a capture save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing was rendered this session; no file was written.
    Empty,
    /// The capture was written to disk.
    Written { path: PathBuf, samples: usize },
}

fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Quantize one sample: clamp to [-1, 1], then truncate toward zero at
/// full scale. Full-scale negative maps to -32767, not -32768.
#[inline]
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Encode `samples` as a complete mono 16-bit PCM WAV byte image.
pub fn encode(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    let mut cursor = Cursor::new(Vec::with_capacity(HEADER_LEN + samples.len() * 2));
    let mut writer = WavWriter::new(&mut cursor, spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(quantize(sample))?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Write the session capture to `path`. An empty capture is informational,
/// not an error: no file is produced and [`SaveOutcome::Empty`] is returned.
pub fn save(path: &Path, samples: &[f32], sample_rate: u32) -> Result<SaveOutcome, WavError> {
    if samples.is_empty() {
        log::info!("no audio data recorded, skipping {}", path.display());
        return Ok(SaveOutcome::Empty);
    }
    let mut writer = WavWriter::create(path, spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(quantize(sample))?;
    }
    writer.finalize()?;
    log::info!("audio saved to {} ({} samples)", path.display(), samples.len());
    Ok(SaveOutcome::Written {
        path: path.to_path_buf(),
        samples: samples.len(),
    })
}
