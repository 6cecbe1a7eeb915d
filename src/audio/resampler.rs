use crate::{MiraError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Streaming mono resampler for converting between sample rates
///
/// The underlying sinc resampler consumes fixed-size chunks, so input
/// that does not fill a whole chunk is carried over to the next call.
/// Call `flush` at end of stream to drain the remainder.
pub struct StreamResampler {
    resampler: SincFixedIn<f32>,
    pending: Vec<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl StreamResampler {
    /// Create a new resampler between the given rates
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(MiraError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let resample_ratio = output_rate as f64 / input_rate as f64;

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        // chunk_size is the number of frames consumed per process call
        let chunk_size = 1024;

        let resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, chunk_size, 1)
            .map_err(|e| {
                MiraError::AudioProcessingError(format!("Failed to create resampler: {}", e))
            })?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            pending: Vec::with_capacity(chunk_size * 2),
            input_rate,
            output_rate,
        })
    }

    /// Feed samples in, returning whatever full chunks produced
    ///
    /// Leftover samples that do not fill a chunk are buffered until the
    /// next call, so consecutive calls resample one continuous stream.
    pub fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        self.pending.extend_from_slice(input);

        let chunk_size = self.resampler.input_frames_max();
        if self.pending.len() < chunk_size {
            return Ok(Vec::new());
        }

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let estimated = (self.pending.len() as f64 * ratio * 1.1) as usize;
        let mut output = Vec::with_capacity(estimated);

        while self.pending.len() >= chunk_size {
            let chunk: Vec<f32> = self.pending.drain(..chunk_size).collect();
            let processed = self
                .resampler
                .process(&[chunk], None)
                .map_err(|e| MiraError::AudioProcessingError(format!("Resampling failed: {}", e)))?;
            output.extend_from_slice(&processed[0]);
        }

        Ok(output)
    }

    /// Drain the buffered remainder, zero-padded to a full chunk
    ///
    /// Only the output corresponding to real input is returned.
    pub fn flush(&mut self) -> Result<Vec<f32>> {
        if self.pending.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_size = self.resampler.input_frames_max();
        let real_frames = self.pending.len();

        let mut chunk = std::mem::take(&mut self.pending);
        chunk.resize(chunk_size, 0.0);

        let processed = self
            .resampler
            .process(&[chunk], None)
            .map_err(|e| MiraError::AudioProcessingError(format!("Resampling failed: {}", e)))?;

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let frames_to_take = ((real_frames as f64) * ratio).ceil() as usize;

        let mut output = processed[0].clone();
        output.truncate(frames_to_take);
        Ok(output)
    }

    /// Get the input sample rate
    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    /// Get the output sample rate
    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Reset filter state and drop any buffered remainder
    pub fn reset(&mut self) {
        self.pending.clear();
        self.resampler.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resampler_creation() {
        assert!(StreamResampler::new(48000, 16000).is_ok());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(StreamResampler::new(0, 16000).is_err());
        assert!(StreamResampler::new(48000, 0).is_err());
    }

    #[test]
    fn test_small_input_buffers_until_full_chunk() {
        let mut resampler = StreamResampler::new(48000, 16000).unwrap();
        let output = resampler.process(&vec![0.0; 100]).unwrap();
        assert!(output.is_empty());

        // Enough total input to complete a chunk
        let output = resampler.process(&vec![0.0; 1000]).unwrap();
        assert!(!output.is_empty());
    }

    #[test]
    fn test_downsampling_ratio() {
        let mut resampler = StreamResampler::new(48000, 16000).unwrap();
        let input: Vec<f32> = (0..4096).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resampler.process(&input).unwrap();
        // Roughly one third of the consumed frames come out
        assert!(output.len() > 1000);
        assert!(output.len() < 2000);
    }

    #[test]
    fn test_upsampling_ratio() {
        let mut resampler = StreamResampler::new(24000, 48000).unwrap();
        let input: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = resampler.process(&input).unwrap();
        assert!(output.len() > 3500);
    }

    #[test]
    fn test_flush_drains_remainder() {
        let mut resampler = StreamResampler::new(48000, 16000).unwrap();
        let _ = resampler.process(&vec![0.1; 500]).unwrap();
        let tail = resampler.flush().unwrap();
        // 500 frames at one third ratio, rounded up
        assert!(!tail.is_empty());
        assert!(tail.len() <= 200);
    }

    #[test]
    fn test_reset_clears_pending() {
        let mut resampler = StreamResampler::new(48000, 16000).unwrap();
        let _ = resampler.process(&vec![0.1; 500]).unwrap();
        resampler.reset();
        assert!(resampler.flush().unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        let mut resampler = StreamResampler::new(48000, 16000).unwrap();
        assert!(resampler.process(&[]).unwrap().is_empty());
    }
}
