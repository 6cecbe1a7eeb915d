//! PCM wire format for the realtime session
//!
//! Uplink audio is 16 kHz mono 16-bit little-endian PCM, downlink audio
//! is 24 kHz mono in the same sample format. Both travel base64-encoded
//! inside JSON messages.

use crate::{MiraError, Result};
use base64::prelude::*;

/// Sample rate the service expects for microphone audio
pub const INPUT_SAMPLE_RATE: u32 = 16_000;

/// Sample rate of synthesized speech coming back from the service
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// Mime type attached to uplink media chunks
pub const INPUT_MIME_TYPE: &str = "audio/pcm;rate=16000";

/// Convert float samples to 16-bit little-endian PCM bytes
pub fn samples_to_pcm(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * 32768.0).clamp(-32768.0, 32767.0) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert 16-bit little-endian PCM bytes back to float samples
pub fn pcm_to_samples(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(MiraError::WireError(format!(
            "PCM payload has odd length: {} bytes",
            bytes.len()
        )));
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    Ok(samples)
}

/// Encode float samples as a base64 PCM blob for the uplink
pub fn encode_blob(samples: &[f32]) -> String {
    BASE64_STANDARD.encode(samples_to_pcm(samples))
}

/// Decode a base64 PCM blob from the downlink into float samples
pub fn decode_blob(data: &str) -> Result<Vec<f32>> {
    let bytes = BASE64_STANDARD
        .decode(data)
        .map_err(|e| MiraError::WireError(format!("Invalid base64 audio payload: {}", e)))?;
    pcm_to_samples(&bytes)
}
