//! Sequential playback scheduling for downlink speech
//!
//! Received audio chunks are appended to one contiguous sample queue,
//! so each chunk starts exactly where the previous one ended and the
//! output stream plays them back to back. The tail of the queue is the
//! next start time: once the queue drains, the cursor has caught up
//! with the device and the next chunk begins immediately.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Shared queue of mono samples awaiting playback
#[derive(Clone)]
pub struct PlaybackQueue {
    samples: Arc<Mutex<VecDeque<f32>>>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Schedule a chunk after everything already queued
    pub fn append(&self, chunk: &[f32]) {
        let mut samples = self.samples.lock();
        samples.extend(chunk.iter().copied());
    }

    /// Move up to `out.len()` samples into the output buffer
    ///
    /// Returns how many samples were written. The caller fills the rest
    /// with silence.
    pub fn pop_into(&self, out: &mut [f32]) -> usize {
        let mut samples = self.samples.lock();
        let mut written = 0;
        while written < out.len() {
            match samples.pop_front() {
                Some(sample) => {
                    out[written] = sample;
                    written += 1;
                }
                None => break,
            }
        }
        written
    }

    /// Drop everything not yet played and reset the cursor
    ///
    /// Used when the server interrupts the current turn and on stop.
    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    /// Check whether nothing is scheduled
    pub fn is_idle(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Number of samples still scheduled
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    /// Check if the queue holds no samples
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}
