//! Reusable UI components

mod message_list;
mod mic_button;
mod status_orb;

pub use message_list::MessageList;
pub use mic_button::MicButton;
pub use status_orb::StatusOrb;
