//! Companion phase flow tests
//!
//! These tests drive the UI state with the event sequences a live
//! session produces and verify the phase machine and chat log.

use mira::conversation::ConversationEvent;
use mira::messages::Role;
use mira::session::SessionConfig;
use mira::ui::{AppState, CompanionPhase};

/// A full voice turn: connect, user talks, model answers, turn ends
#[test]
fn test_full_turn_reaches_chat_log() {
    let mut state = AppState::new();
    state.phase = CompanionPhase::Connecting;

    state.apply_event(ConversationEvent::Ready);
    assert_eq!(state.phase, CompanionPhase::Listening);

    state.apply_event(ConversationEvent::UserTranscript("hey ".to_string()));
    state.apply_event(ConversationEvent::UserTranscript("hey Mira".to_string()));
    assert_eq!(state.phase, CompanionPhase::Listening);
    assert_eq!(state.partial_user_text, "hey Mira");

    state.apply_event(ConversationEvent::AssistantTranscript("Hi".to_string()));
    assert_eq!(state.phase, CompanionPhase::Thinking);

    state.apply_event(ConversationEvent::SpeechScheduled);
    assert_eq!(state.phase, CompanionPhase::Speaking);

    state.apply_event(ConversationEvent::AssistantTranscript(
        "Hi Sona, I'm here".to_string(),
    ));
    assert_eq!(
        state.phase,
        CompanionPhase::Speaking,
        "transcript updates must not leave the speaking phase"
    );

    state.apply_event(ConversationEvent::TurnComplete);
    assert_eq!(state.phase, CompanionPhase::Listening);

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "hey Mira");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].text, "Hi Sona, I'm here");
    assert!(state.partial_user_text.is_empty());
    assert!(state.partial_assistant_text.is_empty());
}

#[test]
fn test_two_turns_accumulate_in_order() {
    let mut state = AppState::new();
    state.apply_event(ConversationEvent::Ready);

    state.apply_event(ConversationEvent::UserTranscript("first".to_string()));
    state.apply_event(ConversationEvent::AssistantTranscript("one".to_string()));
    state.apply_event(ConversationEvent::TurnComplete);

    state.apply_event(ConversationEvent::UserTranscript("second".to_string()));
    state.apply_event(ConversationEvent::AssistantTranscript("two".to_string()));
    state.apply_event(ConversationEvent::TurnComplete);

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].text, "first");
    assert_eq!(messages[1].text, "one");
    assert_eq!(messages[2].text, "second");
    assert_eq!(messages[3].text, "two");

    // Timestamps follow arrival order
    for pair in messages.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

/// A turn the model never voiced still lands in the log
#[test]
fn test_text_only_turn_is_flushed() {
    let mut state = AppState::new();
    state.apply_event(ConversationEvent::Ready);

    state.apply_event(ConversationEvent::UserTranscript("silent one".to_string()));
    state.apply_event(ConversationEvent::TurnComplete);

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
}

#[test]
fn test_comfort_mode_survives_turns_but_not_sessions() {
    let mut state = AppState::new();
    state.apply_event(ConversationEvent::Ready);

    state.apply_event(ConversationEvent::ComfortMode(true));
    state.apply_event(ConversationEvent::TurnComplete);
    assert!(state.comfort_mode, "turn boundaries keep comfort mode");

    state.apply_event(ConversationEvent::Closed);
    assert!(!state.comfort_mode, "session end resets comfort mode");
    assert_eq!(state.phase, CompanionPhase::Idle);
}

#[test]
fn test_error_event_preserves_transcripts() {
    let mut state = AppState::new();
    state.apply_event(ConversationEvent::Ready);

    state.apply_event(ConversationEvent::UserTranscript("are you there".to_string()));
    state.apply_event(ConversationEvent::AssistantTranscript("I am".to_string()));
    state.apply_event(ConversationEvent::Error("socket dropped".to_string()));

    assert_eq!(state.phase, CompanionPhase::Error);
    assert_eq!(state.last_error.as_deref(), Some("socket dropped"));
    assert_eq!(
        state.messages.len(),
        2,
        "partial transcripts must not be lost on failure"
    );
}

#[test]
fn test_restart_after_error_clears_stale_state() {
    let mut state = AppState::new();
    state.apply_event(ConversationEvent::Ready);
    state.apply_event(ConversationEvent::ComfortMode(true));
    state.apply_event(ConversationEvent::Error("boom".to_string()));

    // Starting again without credentials fails, but stale session
    // state must already be gone
    state.toggle_session(&SessionConfig::default());

    assert!(!state.comfort_mode);
    assert_ne!(state.last_error.as_deref(), Some("boom"));
}

#[test]
fn test_toggle_with_valid_looking_config_still_ends_cleanly() {
    let mut state = AppState::new();

    // No credentials, the attempt fails before anything starts
    state.toggle_session(&SessionConfig::default());
    assert_eq!(state.phase, CompanionPhase::Error);

    // Toggling out of the error phase attempts a fresh start
    state.toggle_session(&SessionConfig::default());
    assert_eq!(state.phase, CompanionPhase::Error);
    assert!(state.conversation.is_none());
}
