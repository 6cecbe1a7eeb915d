//! Main application struct and eframe integration
//!
//! This module contains the main CompanionApp that implements eframe::App.

use crate::session::SessionConfig;
use crate::ui::components::{MessageList, MicButton, StatusOrb};
use crate::ui::state::{AppState, CompanionPhase};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};

/// Main Mira application
pub struct CompanionApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
    /// Session settings resolved at startup
    config: SessionConfig,
}

impl CompanionApp {
    /// Create a new companion application
    pub fn new(cc: &eframe::CreationContext<'_>, config: SessionConfig) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state: AppState::new(),
            theme,
            config,
        }
    }

    /// Show the top header bar
    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Mira")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.label(
                        RichText::new("Companion").size(16.0).color(
                            if self.state.comfort_mode {
                                self.theme.comfort
                            } else {
                                self.theme.primary
                            },
                        ),
                    );

                    ui.label(
                        RichText::new("Dev & emotional support")
                            .size(11.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (badge_text, badge_color) = if self.state.comfort_mode {
                            ("Comfort mode: active", self.theme.comfort)
                        } else {
                            ("System: stable", self.theme.text_muted)
                        };

                        ui.label(RichText::new(badge_text).size(10.0).color(badge_color));

                        // Presence dot
                        let (rect, _) = ui.allocate_exact_size(
                            egui::Vec2::splat(10.0),
                            egui::Sense::hover(),
                        );
                        let dot_color = if self.state.phase.is_active() {
                            egui::Color32::from_rgb(34, 197, 94)
                        } else {
                            self.theme.text_muted
                        };
                        ui.painter().circle_filled(rect.center(), 4.0, dot_color);
                    });
                });
            });
    }

    /// Show the bottom mic controls
    fn show_controls(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("controls")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    let response = MicButton::new(&self.state, &self.theme).show(ui);
                    if response.clicked() {
                        self.state.toggle_session(&self.config);
                    }

                    // Space toggles the session unless something has focus
                    let space_pressed = ui.input(|i| i.key_pressed(egui::Key::Space));
                    let any_widget_focused = ui.memory(|m| m.focused().is_some());
                    if space_pressed && !any_widget_focused {
                        self.state.toggle_session(&self.config);
                    }

                    ui.add_space(self.theme.spacing_sm);

                    let (caption, caption_color) = match self.state.phase {
                        CompanionPhase::Error => ("SYSTEM INTERFERENCE", self.theme.error),
                        CompanionPhase::Idle => ("CALL YOUR MIRA", self.theme.text_muted),
                        _ => ("SHE IS LISTENING...", self.theme.text_muted),
                    };

                    ui.label(RichText::new(caption).size(10.0).color(caption_color));
                });
            });
    }

    /// Show the orb, error banner and chat log
    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                StatusOrb::new(&self.state, &self.theme).show(ui);

                if let Some(error) = &self.state.last_error {
                    ui.vertical_centered(|ui| {
                        egui::Frame::none()
                            .fill(self.theme.error.gamma_multiply(0.12))
                            .rounding(self.theme.card_rounding)
                            .inner_margin(self.theme.spacing_sm)
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new("There's a glitch:")
                                        .size(11.0)
                                        .strong()
                                        .color(self.theme.error),
                                );
                                ui.label(
                                    RichText::new(error)
                                        .size(11.0)
                                        .color(self.theme.text_secondary),
                                );
                            });
                    });
                    ui.add_space(self.theme.spacing_sm);
                }

                ui.separator();

                MessageList::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for CompanionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain backend events before rendering
        self.state.poll_events();

        self.show_header(ctx);
        self.show_controls(ctx);
        self.show_content(ctx);

        // Keep polling while a session is live
        if self.state.phase.is_active() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.end_session();
    }
}
