//! Application state management
//!
//! This module provides the central state for the Mira UI.

use crate::conversation::{Conversation, ConversationEvent};
use crate::messages::{ChatMessage, MessageStorage};
use crate::session::SessionConfig;
use tracing::{info, warn};

/// What Mira is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompanionPhase {
    /// No session running
    #[default]
    Idle,
    /// Session is being opened
    Connecting,
    /// Session is open, waiting for the user to talk
    Listening,
    /// Model transcript is arriving but no speech yet
    Thinking,
    /// Model speech is scheduled or playing
    Speaking,
    /// Session failed
    Error,
}

impl CompanionPhase {
    /// Check whether a session is live
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Connecting | Self::Listening | Self::Thinking | Self::Speaking
        )
    }
}

/// Central application state
pub struct AppState {
    /// Current companion phase
    pub phase: CompanionPhase,

    /// Whether the model switched into comfort mode this session
    pub comfort_mode: bool,

    /// Finished chat turns (thread-safe)
    pub messages: MessageStorage,

    /// Transcript of the user turn still in progress
    pub partial_user_text: String,

    /// Transcript of the model turn still in progress
    pub partial_assistant_text: String,

    /// Last error message
    pub last_error: Option<String>,

    /// The running conversation, if any
    pub conversation: Option<Conversation>,

    /// Smoothed microphone level for the orb animation
    pub mic_level: f32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create a new application state
    pub fn new() -> Self {
        Self {
            phase: CompanionPhase::Idle,
            comfort_mode: false,
            messages: MessageStorage::new(),
            partial_user_text: String::new(),
            partial_assistant_text: String::new(),
            last_error: None,
            conversation: None,
            mic_level: 0.0,
        }
    }

    /// Start a session when idle, end it otherwise
    pub fn toggle_session(&mut self, config: &SessionConfig) {
        if matches!(self.phase, CompanionPhase::Idle | CompanionPhase::Error) {
            self.last_error = None;
            self.comfort_mode = false;
            self.phase = CompanionPhase::Connecting;

            match Conversation::start(config.clone()) {
                Ok(conversation) => {
                    info!("Session starting");
                    self.conversation = Some(conversation);
                }
                Err(e) => {
                    warn!("Failed to start session: {}", e);
                    self.last_error = Some(e.user_message());
                    self.phase = CompanionPhase::Error;
                }
            }
        } else {
            self.end_session();
        }
    }

    /// Tear the session down and return to idle
    pub fn end_session(&mut self) {
        if let Some(mut conversation) = self.conversation.take() {
            conversation.stop();
        }
        self.flush_partials();
        self.comfort_mode = false;
        self.mic_level = 0.0;
        self.phase = CompanionPhase::Idle;
    }

    /// Drain pending conversation events and update the phase
    pub fn poll_events(&mut self) {
        let Some(conversation) = &self.conversation else {
            return;
        };

        let mut events = Vec::new();
        while let Some(event) = conversation.try_event() {
            events.push(event);
        }

        let speaking = conversation.is_speaking();
        let level = conversation.mic_level();

        for event in events {
            self.apply_event(event);
        }

        // Smooth the meter so the orb does not jitter
        self.mic_level = self.mic_level * 0.8 + level * 0.2;

        // Scheduled speech has fully played out
        if self.phase == CompanionPhase::Speaking && !speaking {
            self.enter(CompanionPhase::Listening);
        }
    }

    /// Apply a single conversation event
    pub fn apply_event(&mut self, event: ConversationEvent) {
        match event {
            ConversationEvent::Ready => {
                self.enter(CompanionPhase::Listening);
            }
            ConversationEvent::UserTranscript(text) => {
                self.partial_user_text = text;
            }
            ConversationEvent::AssistantTranscript(text) => {
                self.partial_assistant_text = text;
                if self.phase == CompanionPhase::Listening {
                    self.phase = CompanionPhase::Thinking;
                }
            }
            ConversationEvent::SpeechScheduled => {
                self.phase = CompanionPhase::Speaking;
            }
            ConversationEvent::TurnComplete => {
                self.enter(CompanionPhase::Listening);
            }
            ConversationEvent::ComfortMode(active) => {
                info!("Comfort mode {}", if active { "on" } else { "off" });
                self.comfort_mode = active;
            }
            ConversationEvent::Closed => {
                self.end_session();
            }
            ConversationEvent::Error(message) => {
                warn!("Session error: {}", message);
                if let Some(mut conversation) = self.conversation.take() {
                    conversation.stop();
                }
                self.flush_partials();
                self.last_error = Some(message);
                self.mic_level = 0.0;
                self.phase = CompanionPhase::Error;
            }
        }
    }

    /// Move finished partial transcripts into the chat log
    pub fn flush_partials(&mut self) {
        if !self.partial_user_text.is_empty() {
            self.messages
                .add(ChatMessage::user(std::mem::take(&mut self.partial_user_text)));
        }
        if !self.partial_assistant_text.is_empty() {
            self.messages.add(ChatMessage::assistant(std::mem::take(
                &mut self.partial_assistant_text,
            )));
        }
    }

    /// Set the phase, flushing partials whenever a turn boundary
    /// is crossed
    fn enter(&mut self, phase: CompanionPhase) {
        if matches!(phase, CompanionPhase::Listening | CompanionPhase::Idle) {
            self.flush_partials();
        }
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;

    #[test]
    fn test_initial_phase_is_idle() {
        let state = AppState::new();
        assert_eq!(state.phase, CompanionPhase::Idle);
        assert!(!state.phase.is_active());
    }

    #[test]
    fn test_ready_enters_listening() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Connecting;

        state.apply_event(ConversationEvent::Ready);

        assert_eq!(state.phase, CompanionPhase::Listening);
    }

    #[test]
    fn test_transcripts_replace_partials() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Listening;

        state.apply_event(ConversationEvent::UserTranscript("hel".to_string()));
        state.apply_event(ConversationEvent::UserTranscript("hello".to_string()));

        assert_eq!(state.partial_user_text, "hello");
    }

    #[test]
    fn test_assistant_transcript_enters_thinking() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Listening;

        state.apply_event(ConversationEvent::AssistantTranscript("Hmm".to_string()));

        assert_eq!(state.phase, CompanionPhase::Thinking);
        assert_eq!(state.partial_assistant_text, "Hmm");
    }

    #[test]
    fn test_speech_scheduled_enters_speaking() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Thinking;

        state.apply_event(ConversationEvent::SpeechScheduled);

        assert_eq!(state.phase, CompanionPhase::Speaking);
    }

    #[test]
    fn test_turn_complete_flushes_partials() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Speaking;
        state.partial_user_text = "how are you".to_string();
        state.partial_assistant_text = "I'm great, Sona".to_string();

        state.apply_event(ConversationEvent::TurnComplete);

        assert_eq!(state.phase, CompanionPhase::Listening);
        assert!(state.partial_user_text.is_empty());
        assert!(state.partial_assistant_text.is_empty());

        let messages = state.messages.get_all();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].text, "how are you");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].text, "I'm great, Sona");
    }

    #[test]
    fn test_turn_complete_with_empty_partials_adds_nothing() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Speaking;

        state.apply_event(ConversationEvent::TurnComplete);

        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_comfort_mode_toggles() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Listening;

        state.apply_event(ConversationEvent::ComfortMode(true));
        assert!(state.comfort_mode);

        state.apply_event(ConversationEvent::ComfortMode(false));
        assert!(!state.comfort_mode);
    }

    #[test]
    fn test_closed_returns_to_idle_and_flushes() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Listening;
        state.comfort_mode = true;
        state.partial_user_text = "bye".to_string();

        state.apply_event(ConversationEvent::Closed);

        assert_eq!(state.phase, CompanionPhase::Idle);
        assert!(!state.comfort_mode);
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_error_keeps_message_and_enters_error() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Speaking;
        state.partial_assistant_text = "as I was say".to_string();

        state.apply_event(ConversationEvent::Error("connection lost".to_string()));

        assert_eq!(state.phase, CompanionPhase::Error);
        assert_eq!(state.last_error.as_deref(), Some("connection lost"));
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn test_toggle_without_api_key_enters_error() {
        let mut state = AppState::new();

        state.toggle_session(&SessionConfig::default());

        assert_eq!(state.phase, CompanionPhase::Error);
        assert!(state.last_error.is_some());
        assert!(state.conversation.is_none());
    }

    #[test]
    fn test_toggle_from_error_clears_error_first() {
        let mut state = AppState::new();
        state.phase = CompanionPhase::Error;
        state.last_error = Some("old failure".to_string());

        state.toggle_session(&SessionConfig::default());

        // A fresh start attempt was made, only the new failure remains
        assert_eq!(state.phase, CompanionPhase::Error);
        assert_ne!(state.last_error.as_deref(), Some("old failure"));
    }
}
