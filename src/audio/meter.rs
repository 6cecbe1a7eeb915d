//! Microphone level metering
//!
//! Capture threads push raw samples in, the UI drains them once per
//! frame and turns them into an RMS level for the status orb. When the
//! buffer is full the oldest samples are dropped so the reading always
//! reflects the most recent audio.

use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

/// Thread-safe buffer of recent microphone samples
#[derive(Clone)]
pub struct LevelMeter {
    buffer: Arc<Mutex<HeapRb<f32>>>,
}

impl LevelMeter {
    /// Create a meter holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(HeapRb::new(capacity))),
        }
    }

    /// Push captured samples, dropping the oldest on overflow
    pub fn push(&self, samples: &[f32]) {
        let mut buffer = self.buffer.lock();
        for &sample in samples {
            if buffer.try_push(sample).is_err() {
                let _ = buffer.try_pop();
                let _ = buffer.try_push(sample);
            }
        }
    }

    /// Drain buffered samples and return their RMS level in [0, 1]
    ///
    /// Returns 0.0 when no samples arrived since the last call.
    pub fn level(&self) -> f32 {
        let mut buffer = self.buffer.lock();
        let count = buffer.occupied_len();
        if count == 0 {
            return 0.0;
        }

        let mut sum_squares = 0.0f32;
        while let Some(sample) = buffer.try_pop() {
            sum_squares += sample * sample;
        }

        (sum_squares / count as f32).sqrt().min(1.0)
    }

    /// Discard any buffered samples
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    /// Number of samples currently buffered
    pub fn len(&self) -> usize {
        self.buffer.lock().occupied_len()
    }

    /// Check if no samples are buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_reads_zero() {
        let meter = LevelMeter::new(64);
        meter.push(&[0.0; 32]);
        assert_eq!(meter.level(), 0.0);
    }

    #[test]
    fn test_level_drains_buffer() {
        let meter = LevelMeter::new(64);
        meter.push(&[0.5; 16]);
        let level = meter.level();
        assert!((level - 0.5).abs() < 0.001);
        assert!(meter.is_empty());
        assert_eq!(meter.level(), 0.0);
    }

    #[test]
    fn test_overflow_keeps_most_recent() {
        let meter = LevelMeter::new(4);
        meter.push(&[0.0, 0.0, 0.0, 0.0]);
        meter.push(&[1.0, 1.0, 1.0, 1.0]);
        let level = meter.level();
        assert!((level - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_clone_shares_samples() {
        let meter = LevelMeter::new(16);
        let other = meter.clone();
        meter.push(&[0.3; 8]);
        assert_eq!(other.len(), 8);
    }
}
