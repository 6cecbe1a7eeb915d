pub mod config;
pub mod live;
pub mod persona;
pub mod wire;

pub use config::SessionConfig;
pub use live::{LiveSession, SessionCommand, SessionEvent};
