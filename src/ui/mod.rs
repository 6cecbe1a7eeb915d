//! UI components and application module
//!
//! This module provides the egui/eframe-based user interface for Mira.

mod app;
pub mod components;
mod state;
mod theme;

pub use app::CompanionApp;
pub use components::{MessageList, MicButton, StatusOrb};
pub use state::{AppState, CompanionPhase};
pub use theme::Theme;
