#[cfg(feature = "audio-io")]
pub mod input;
pub mod meter;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod pcm;
pub mod playback;
pub mod resampler;

#[cfg(feature = "audio-io")]
pub use input::AudioInput;
pub use meter::LevelMeter;
#[cfg(feature = "audio-io")]
pub use output::AudioOutput;
pub use playback::PlaybackQueue;
pub use resampler::StreamResampler;
