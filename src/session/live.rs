//! Live session worker for the realtime voice service
//!
//! The session runs on its own thread with a single-threaded tokio
//! runtime driving the WebSocket. Commands flow in over an async
//! channel, decoded events flow out over a crossbeam channel polled by
//! the conversation layer. One session maps to one socket, there is no
//! reconnection: a transport failure surfaces one error event and the
//! worker exits.

use crate::audio::pcm;
use crate::session::config::SessionConfig;
use crate::session::persona;
use crate::session::wire::{
    ClientMessage, Content, GenerationConfig, Part, ServerMessage, SessionSetup, SpeechConfig,
    TranscriptionConfig,
};
use crate::{MiraError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Commands accepted by the session worker
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// One base64 PCM blob for the uplink
    Audio(String),

    /// Close the socket and stop the worker
    Shutdown,
}

/// Events emitted by the session worker
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Setup acknowledged, the service is listening
    Ready,

    /// Accumulated transcript of what the user said this turn
    UserTranscript(String),

    /// Accumulated transcript of what the model is saying this turn
    AssistantTranscript(String),

    /// Decoded speech samples at the service output rate
    Audio(Vec<f32>),

    /// The model turn finished
    TurnComplete,

    /// The user barged in, scheduled playback should be dropped
    Interrupted,

    /// The model toggled comfort mode
    ComfortMode(bool),

    /// The socket closed normally
    Closed,

    /// The session failed
    Error(String),
}

/// Handle to a running live session
pub struct LiveSession {
    command_tx: mpsc::Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl LiveSession {
    /// Connect a new session and spawn its worker thread
    pub fn start(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let (command_tx, command_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = bounded(256);

        let worker = std::thread::Builder::new()
            .name("live-session".to_string())
            .spawn(move || run_session(config, command_rx, event_tx))
            .map_err(|e| MiraError::SessionError(format!("Failed to spawn worker: {}", e)))?;

        Ok(Self {
            command_tx,
            event_rx,
            worker: Some(worker),
        })
    }

    /// Get a sender for session commands
    ///
    /// Uplink threads queue audio through this with `try_send`, so a
    /// saturated worker drops chunks instead of blocking capture.
    pub fn command_sender(&self) -> mpsc::Sender<SessionCommand> {
        self.command_tx.clone()
    }

    /// Non-blocking poll for the next session event
    pub fn try_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Get a receiver for session events
    pub fn event_receiver(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }

    /// Close the socket and wait for the worker to finish
    pub fn stop(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = self.command_tx.try_send(SessionCommand::Shutdown);
            let _ = handle.join();
        }
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Per-turn transcript accumulation
#[derive(Debug, Default)]
struct TurnState {
    user_transcript: String,
    assistant_transcript: String,
}

fn build_setup(config: &SessionConfig) -> ClientMessage {
    ClientMessage::Setup(SessionSetup {
        model: config.model.clone(),
        generation_config: GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(SpeechConfig {
                voice: config.voice.clone(),
            }),
        },
        system_instruction: Some(Content {
            parts: vec![Part {
                text: Some(config.system_instruction.clone()),
                ..Default::default()
            }],
        }),
        tools: persona::declared_tools(),
        input_audio_transcription: Some(TranscriptionConfig {}),
        output_audio_transcription: Some(TranscriptionConfig {}),
    })
}

fn to_frame(message: &ClientMessage) -> Result<Message> {
    let json = serde_json::to_string(message)
        .map_err(|e| MiraError::WireError(format!("Failed to serialize message: {}", e)))?;
    Ok(Message::Text(json.into()))
}

/// Dispatch one decoded server message
///
/// Emits session events and returns any replies that must go back out
/// on the socket.
fn handle_server_message(
    turn: &mut TurnState,
    message: ServerMessage,
    event_tx: &Sender<SessionEvent>,
) -> Vec<ClientMessage> {
    let mut replies = Vec::new();

    if message.setup_complete.is_some() {
        info!("Session ready");
        let _ = event_tx.send(SessionEvent::Ready);
    }

    if let Some(content) = message.server_content {
        if content.interrupted {
            debug!("Model turn interrupted");
            let _ = event_tx.send(SessionEvent::Interrupted);
        }

        if let Some(ref transcription) = content.input_transcription {
            turn.user_transcript.push_str(&transcription.text);
            let _ = event_tx.send(SessionEvent::UserTranscript(turn.user_transcript.clone()));
        }

        if let Some(ref transcription) = content.output_transcription {
            turn.assistant_transcript.push_str(&transcription.text);
            let _ = event_tx.send(SessionEvent::AssistantTranscript(
                turn.assistant_transcript.clone(),
            ));
        }

        for payload in content.audio_payloads() {
            match pcm::decode_blob(payload) {
                Ok(samples) => {
                    let _ = event_tx.send(SessionEvent::Audio(samples));
                }
                Err(e) => warn!("Skipping malformed audio chunk: {}", e),
            }
        }

        if content.turn_complete {
            debug!("Turn complete");
            *turn = TurnState::default();
            let _ = event_tx.send(SessionEvent::TurnComplete);
        }
    }

    if let Some(tool_call) = message.tool_call {
        for call in tool_call.function_calls {
            if call.name != persona::COMFORT_MODE_TOOL {
                warn!("Ignoring unknown tool call: {}", call.name);
                continue;
            }

            match call.args.get("active").and_then(|v| v.as_bool()) {
                Some(active) => {
                    info!("Comfort mode set to {}", active);
                    let _ = event_tx.send(SessionEvent::ComfortMode(active));
                    replies.push(ClientMessage::tool_ok(&call.id, &call.name));
                }
                None => warn!("Tool call {} missing 'active' argument", call.name),
            }
        }
    }

    replies
}

fn run_session(
    config: SessionConfig,
    mut command_rx: mpsc::Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) {
    info!("Session worker starting");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            let _ = event_tx.send(SessionEvent::Error(format!(
                "Runtime creation failed: {}",
                e
            )));
            return;
        }
    };

    runtime.block_on(async move {
        let mut ws = match connect_async(config.url()).await {
            Ok((ws, _response)) => {
                info!("Connected to {}", config.endpoint);
                ws
            }
            Err(e) => {
                error!("Connect failed: {}", e);
                let _ = event_tx.send(SessionEvent::Error(
                    MiraError::SessionError(format!("Connect failed: {}", e)).user_message(),
                ));
                return;
            }
        };

        let setup = match to_frame(&build_setup(&config)) {
            Ok(frame) => frame,
            Err(e) => {
                let _ = event_tx.send(SessionEvent::Error(e.user_message()));
                return;
            }
        };

        if let Err(e) = ws.send(setup).await {
            error!("Setup send failed: {}", e);
            let _ = event_tx.send(SessionEvent::Error(
                MiraError::SessionError(format!("Setup send failed: {}", e)).user_message(),
            ));
            return;
        }

        let mut turn = TurnState::default();

        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(SessionCommand::Audio(blob)) => {
                            match to_frame(&ClientMessage::audio_chunk(blob)) {
                                Ok(frame) => {
                                    if let Err(e) = ws.send(frame).await {
                                        error!("Uplink send failed: {}", e);
                                        let _ = event_tx.send(SessionEvent::Error(
                                            MiraError::SessionError(e.to_string()).user_message(),
                                        ));
                                        break;
                                    }
                                }
                                Err(e) => warn!("Skipping uplink chunk: {}", e),
                            }
                        }
                        Some(SessionCommand::Shutdown) | None => {
                            info!("Session shutting down");
                            let _ = ws.close(None).await;
                            let _ = event_tx.send(SessionEvent::Closed);
                            break;
                        }
                    }
                }
                incoming = ws.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerMessage>(&text) {
                                Ok(message) => {
                                    for reply in handle_server_message(&mut turn, message, &event_tx) {
                                        match to_frame(&reply) {
                                            Ok(frame) => {
                                                if let Err(e) = ws.send(frame).await {
                                                    warn!("Reply send failed: {}", e);
                                                }
                                            }
                                            Err(e) => warn!("Skipping reply: {}", e),
                                        }
                                    }
                                }
                                Err(e) => debug!("Skipping unparseable message: {}", e),
                            }
                        }
                        Some(Ok(Message::Binary(data))) => {
                            // Some deployments deliver JSON in binary frames
                            match serde_json::from_slice::<ServerMessage>(&data) {
                                Ok(message) => {
                                    for reply in handle_server_message(&mut turn, message, &event_tx) {
                                        match to_frame(&reply) {
                                            Ok(frame) => {
                                                if let Err(e) = ws.send(frame).await {
                                                    warn!("Reply send failed: {}", e);
                                                }
                                            }
                                            Err(e) => warn!("Skipping reply: {}", e),
                                        }
                                    }
                                }
                                Err(e) => debug!("Skipping unparseable binary frame: {}", e),
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws.send(Message::Pong(data)).await {
                                warn!("Pong send failed: {}", e);
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("Server closed the session");
                            let _ = event_tx.send(SessionEvent::Closed);
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!("Socket error: {}", e);
                            let _ = event_tx.send(SessionEvent::Error(
                                MiraError::SessionError(e.to_string()).user_message(),
                            ));
                            break;
                        }
                        None => {
                            info!("Socket stream ended");
                            let _ = event_tx.send(SessionEvent::Closed);
                            break;
                        }
                    }
                }
            }
        }
    });

    info!("Session worker stopped");
}
