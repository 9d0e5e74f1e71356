//! Linear capture of every rendered sample.

use std::sync::Mutex;

/// Append-only capture of the session's post-clip output. Written by the
/// render context, drained once at teardown. Growth is unbounded: a long
/// session yields a long file.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    samples: Mutex<Vec<f32>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, block: &[f32]) {
        self.samples.lock().unwrap().extend_from_slice(block);
    }

    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the accumulated samples, leaving the buffer empty.
    pub fn take(&self) -> Vec<f32> {
        std::mem::take(&mut *self.samples.lock().unwrap())
    }
}
