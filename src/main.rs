//! Mira - Voice companion
//!
//! Main entry point for the Mira application.

use eframe::egui;
use mira::session::SessionConfig;
use mira::ui::CompanionApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mira=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mira voice companion");

    let config = SessionConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 760.0])
            .with_min_inner_size([380.0, 520.0])
            .with_title("Mira"),
        ..Default::default()
    };

    eframe::run_native(
        "Mira",
        options,
        Box::new(|cc| Ok(Box::new(CompanionApp::new(cc, config)))),
    )
}
