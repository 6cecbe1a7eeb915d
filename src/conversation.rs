//! Conversation wiring: microphone -> session -> speakers
//!
//! Owns the live session plus both audio directions. The uplink thread
//! resamples captured chunks to the session rate and encodes them for
//! the socket. The downlink router drains session events, schedules
//! decoded speech for playback and forwards everything the UI needs.

use crate::audio::pcm;
#[cfg(feature = "audio-io")]
use crate::audio::{AudioInput, AudioOutput};
use crate::audio::{LevelMeter, PlaybackQueue, StreamResampler};
use crate::session::{LiveSession, SessionCommand, SessionConfig, SessionEvent};
use crate::{MiraError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};

/// Events the UI consumes, one conversation at a time
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    /// Session is open and listening
    Ready,

    /// Accumulated transcript of what the user said this turn
    UserTranscript(String),

    /// Accumulated transcript of what the model is saying this turn
    AssistantTranscript(String),

    /// Speech audio was scheduled for playback
    SpeechScheduled,

    /// The model turn finished
    TurnComplete,

    /// The model toggled comfort mode
    ComfortMode(bool),

    /// The session closed normally
    Closed,

    /// The session failed
    Error(String),
}

/// A running voice conversation
pub struct Conversation {
    session: LiveSession,
    #[cfg(feature = "audio-io")]
    input: AudioInput,
    #[cfg(feature = "audio-io")]
    output: AudioOutput,
    playback: PlaybackQueue,
    meter: LevelMeter,
    event_rx: Receiver<ConversationEvent>,
    uplink: Option<JoinHandle<()>>,
    router: Option<JoinHandle<()>>,
}

impl Conversation {
    /// Open the session, start both audio directions and return the
    /// running conversation
    pub fn start(config: SessionConfig) -> Result<Self> {
        let session = LiveSession::start(config)?;
        let playback = PlaybackQueue::new();
        let meter = LevelMeter::new(4096);
        let (event_tx, event_rx) = bounded(256);

        #[cfg(feature = "audio-io")]
        let (input, output, uplink, output_rate) = {
            let mut input = AudioInput::new()?;
            let mut output = AudioOutput::new()?;
            let output_rate = output.sample_rate();
            let capture_rate = input.sample_rate();

            let (raw_tx, raw_rx) = bounded(64);
            input.start_capture(raw_tx)?;
            output.start_playback(playback.clone())?;

            let command_tx = session.command_sender();
            let meter_tap = meter.clone();
            let uplink = std::thread::Builder::new()
                .name("uplink".to_string())
                .spawn(move || run_uplink(raw_rx, command_tx, meter_tap, capture_rate))
                .map_err(|e| {
                    MiraError::ChannelError(format!("Failed to spawn uplink: {}", e))
                })?;

            (input, output, Some(uplink), output_rate)
        };

        #[cfg(not(feature = "audio-io"))]
        let (uplink, output_rate): (Option<JoinHandle<()>>, u32) =
            (None, pcm::OUTPUT_SAMPLE_RATE);

        let session_rx = session.event_receiver();
        let router_playback = playback.clone();
        let router = std::thread::Builder::new()
            .name("downlink".to_string())
            .spawn(move || run_router(session_rx, router_playback, event_tx, output_rate))
            .map_err(|e| MiraError::ChannelError(format!("Failed to spawn router: {}", e)))?;

        info!("Conversation started");

        Ok(Self {
            session,
            #[cfg(feature = "audio-io")]
            input,
            #[cfg(feature = "audio-io")]
            output,
            playback,
            meter,
            event_rx,
            uplink,
            router: Some(router),
        })
    }

    /// Non-blocking poll for the next UI event
    pub fn try_event(&self) -> Option<ConversationEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Check whether model speech is scheduled or playing
    pub fn is_speaking(&self) -> bool {
        !self.playback.is_idle()
    }

    /// Current microphone level in [0, 1]
    pub fn mic_level(&self) -> f32 {
        self.meter.level()
    }

    /// Stop capture, drop scheduled audio and close the session
    pub fn stop(&mut self) {
        info!("Stopping conversation");

        #[cfg(feature = "audio-io")]
        {
            let _ = self.input.stop_capture();
        }

        self.playback.clear();

        #[cfg(feature = "audio-io")]
        {
            let _ = self.output.stop_playback();
        }

        self.session.stop();

        if let Some(handle) = self.uplink.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.router.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Conversation {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Capture side: device rate chunks in, session rate blobs out
#[cfg(feature = "audio-io")]
fn run_uplink(
    raw_rx: Receiver<Vec<f32>>,
    command_tx: tokio::sync::mpsc::Sender<SessionCommand>,
    meter: LevelMeter,
    capture_rate: u32,
) {
    debug!("Uplink running at {} Hz", capture_rate);

    let mut resampler = if capture_rate != pcm::INPUT_SAMPLE_RATE {
        match StreamResampler::new(capture_rate, pcm::INPUT_SAMPLE_RATE) {
            Ok(resampler) => Some(resampler),
            Err(e) => {
                error!("Uplink resampler failed: {}", e);
                return;
            }
        }
    } else {
        None
    };

    while let Ok(chunk) = raw_rx.recv() {
        meter.push(&chunk);

        let resampled = match resampler.as_mut() {
            Some(resampler) => match resampler.process(&chunk) {
                Ok(samples) => samples,
                Err(e) => {
                    warn!("Uplink resample failed: {}", e);
                    continue;
                }
            },
            None => chunk,
        };

        if resampled.is_empty() {
            continue;
        }

        let blob = pcm::encode_blob(&resampled);
        if command_tx.try_send(SessionCommand::Audio(blob)).is_err() {
            debug!("Dropping uplink chunk, session saturated");
        }
    }

    debug!("Uplink stopped");
}

/// Downlink side: session events in, scheduled audio and UI events out
fn run_router(
    session_rx: Receiver<SessionEvent>,
    playback: PlaybackQueue,
    event_tx: Sender<ConversationEvent>,
    output_rate: u32,
) {
    let mut resampler = if output_rate != pcm::OUTPUT_SAMPLE_RATE {
        match StreamResampler::new(pcm::OUTPUT_SAMPLE_RATE, output_rate) {
            Ok(resampler) => Some(resampler),
            Err(e) => {
                error!("Downlink resampler failed: {}", e);
                let _ = event_tx.send(ConversationEvent::Error(e.user_message()));
                return;
            }
        }
    } else {
        None
    };

    while let Ok(event) = session_rx.recv() {
        match event {
            SessionEvent::Ready => {
                let _ = event_tx.send(ConversationEvent::Ready);
            }
            SessionEvent::Audio(samples) => {
                let scheduled = match resampler.as_mut() {
                    Some(resampler) => match resampler.process(&samples) {
                        Ok(samples) => samples,
                        Err(e) => {
                            warn!("Downlink resample failed: {}", e);
                            continue;
                        }
                    },
                    None => samples,
                };

                if !scheduled.is_empty() {
                    playback.append(&scheduled);
                    let _ = event_tx.send(ConversationEvent::SpeechScheduled);
                }
            }
            SessionEvent::Interrupted => {
                debug!("Interrupted, dropping {} scheduled samples", playback.len());
                playback.clear();
                if let Some(resampler) = resampler.as_mut() {
                    resampler.reset();
                }
            }
            SessionEvent::TurnComplete => {
                // Play out whatever the resampler still buffers
                if let Some(resampler) = resampler.as_mut() {
                    match resampler.flush() {
                        Ok(tail) if !tail.is_empty() => {
                            playback.append(&tail);
                            let _ = event_tx.send(ConversationEvent::SpeechScheduled);
                        }
                        Ok(_) => {}
                        Err(e) => warn!("Downlink flush failed: {}", e),
                    }
                }
                let _ = event_tx.send(ConversationEvent::TurnComplete);
            }
            SessionEvent::UserTranscript(text) => {
                let _ = event_tx.send(ConversationEvent::UserTranscript(text));
            }
            SessionEvent::AssistantTranscript(text) => {
                let _ = event_tx.send(ConversationEvent::AssistantTranscript(text));
            }
            SessionEvent::ComfortMode(active) => {
                let _ = event_tx.send(ConversationEvent::ComfortMode(active));
            }
            SessionEvent::Closed => {
                let _ = event_tx.send(ConversationEvent::Closed);
                break;
            }
            SessionEvent::Error(message) => {
                let _ = event_tx.send(ConversationEvent::Error(message));
                break;
            }
        }
    }

    debug!("Router stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn spawn_router() -> (
        Sender<SessionEvent>,
        Receiver<ConversationEvent>,
        PlaybackQueue,
        JoinHandle<()>,
    ) {
        let (session_tx, session_rx) = unbounded();
        let (event_tx, event_rx) = bounded(64);
        let playback = PlaybackQueue::new();
        let router_playback = playback.clone();
        let handle = std::thread::spawn(move || {
            run_router(session_rx, router_playback, event_tx, pcm::OUTPUT_SAMPLE_RATE)
        });
        (session_tx, event_rx, playback, handle)
    }

    #[test]
    fn test_start_requires_api_key() {
        let result = Conversation::start(SessionConfig::default());
        assert!(matches!(result, Err(MiraError::ConfigError(_))));
    }

    #[test]
    fn test_audio_is_scheduled_for_playback() {
        let (session_tx, event_rx, playback, handle) = spawn_router();

        session_tx
            .send(SessionEvent::Audio(vec![0.1; 10]))
            .unwrap();
        session_tx.send(SessionEvent::Closed).unwrap();
        handle.join().unwrap();

        assert_eq!(playback.len(), 10);
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::SpeechScheduled)));
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::Closed)));
    }

    #[test]
    fn test_each_chunk_marks_speaking() {
        let (session_tx, event_rx, _playback, handle) = spawn_router();

        session_tx.send(SessionEvent::Audio(vec![0.1; 4])).unwrap();
        session_tx.send(SessionEvent::Audio(vec![0.2; 4])).unwrap();
        session_tx.send(SessionEvent::TurnComplete).unwrap();
        session_tx.send(SessionEvent::Audio(vec![0.3; 4])).unwrap();
        session_tx.send(SessionEvent::Closed).unwrap();
        handle.join().unwrap();

        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::SpeechScheduled)));
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::SpeechScheduled)));
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::TurnComplete)));
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::SpeechScheduled)));
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::Closed)));
    }

    #[test]
    fn test_interrupted_clears_scheduled_audio() {
        let (session_tx, event_rx, playback, handle) = spawn_router();

        session_tx
            .send(SessionEvent::Audio(vec![0.1; 100]))
            .unwrap();
        session_tx.send(SessionEvent::Interrupted).unwrap();
        session_tx.send(SessionEvent::Closed).unwrap();
        handle.join().unwrap();

        assert!(playback.is_idle());
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::SpeechScheduled)));
        // Interruption itself is not surfaced, the queue drain is enough
        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::Closed)));
    }

    #[test]
    fn test_transcripts_are_forwarded() {
        let (session_tx, event_rx, _playback, handle) = spawn_router();

        session_tx
            .send(SessionEvent::UserTranscript("hello".to_string()))
            .unwrap();
        session_tx
            .send(SessionEvent::AssistantTranscript("hi there".to_string()))
            .unwrap();
        session_tx.send(SessionEvent::Closed).unwrap();
        handle.join().unwrap();

        assert!(
            matches!(event_rx.try_recv(), Ok(ConversationEvent::UserTranscript(text)) if text == "hello")
        );
        assert!(
            matches!(event_rx.try_recv(), Ok(ConversationEvent::AssistantTranscript(text)) if text == "hi there")
        );
    }

    #[test]
    fn test_error_stops_router() {
        let (session_tx, event_rx, _playback, handle) = spawn_router();

        session_tx
            .send(SessionEvent::Error("connection lost".to_string()))
            .unwrap();
        handle.join().unwrap();

        assert!(
            matches!(event_rx.try_recv(), Ok(ConversationEvent::Error(message)) if message == "connection lost")
        );
    }

    #[test]
    fn test_comfort_mode_is_forwarded() {
        let (session_tx, event_rx, _playback, handle) = spawn_router();

        session_tx.send(SessionEvent::ComfortMode(true)).unwrap();
        session_tx.send(SessionEvent::Closed).unwrap();
        handle.join().unwrap();

        assert!(matches!(event_rx.try_recv(), Ok(ConversationEvent::ComfortMode(true))));
    }
}
