//! Chat log component
//!
//! Displays finished turns as bubbles plus the transcripts of the
//! turn still in progress.

use crate::messages::{ChatMessage, Role};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText};

/// Message list component
pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let messages = self.state.messages.get_all();
        let has_partials = !self.state.partial_user_text.is_empty()
            || !self.state.partial_assistant_text.is_empty();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if messages.is_empty() && !has_partials {
                        self.show_empty_state(ui);
                    } else {
                        for message in &messages {
                            self.show_message(ui, message);
                            ui.add_space(self.theme.spacing_sm);
                        }

                        self.show_live_turn(ui);
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);

            ui.label(
                RichText::new("Start talking to Mira...")
                    .size(14.0)
                    .italics()
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &ChatMessage) {
        let is_user = matches!(message.role, Role::User);
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };

        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Mira" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            self.show_bubble(ui, &message.text, bubble_color, self.theme.text_primary);

            let time_str = message.timestamp.format("%H:%M").to_string();
            ui.label(
                RichText::new(time_str)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    /// Render the in-progress turn below the finished ones
    fn show_live_turn(&self, ui: &mut egui::Ui) {
        if !self.state.partial_user_text.is_empty() {
            ui.with_layout(egui::Layout::top_down(Align::RIGHT), |ui| {
                egui::Frame::none()
                    .fill(self.theme.user_bubble.gamma_multiply(0.6))
                    .rounding(self.theme.bubble_rounding)
                    .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.set_max_width(ui.available_width() * 0.85);
                        ui.label(
                            RichText::new(&self.state.partial_user_text)
                                .italics()
                                .color(self.theme.text_secondary),
                        );
                    });
            });
            ui.add_space(self.theme.spacing_sm);
        }

        if !self.state.partial_assistant_text.is_empty() {
            ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
                self.show_bubble(
                    ui,
                    &self.state.partial_assistant_text,
                    self.theme.assistant_bubble,
                    self.theme.text_primary,
                );
            });
            ui.add_space(self.theme.spacing_sm);
        }
    }

    fn show_bubble(&self, ui: &mut egui::Ui, text: &str, fill: Color32, text_color: Color32) {
        let max_width = ui.available_width() * 0.85;

        egui::Frame::none()
            .fill(fill)
            .rounding(self.theme.bubble_rounding)
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                self.show_rich_text(ui, text, text_color);
            });
    }

    /// Split out fenced code so Mira's snippets render monospaced
    fn show_rich_text(&self, ui: &mut egui::Ui, text: &str, text_color: Color32) {
        for (i, part) in text.split("```").enumerate() {
            if part.trim().is_empty() {
                continue;
            }

            if i % 2 == 1 {
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .rounding(self.theme.button_rounding)
                    .inner_margin(egui::Margin::same(8.0))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(part.trim())
                                .family(egui::FontFamily::Monospace)
                                .size(12.0)
                                .color(self.theme.code_text),
                        );
                    });
            } else {
                ui.label(RichText::new(part.trim()).color(text_color));
            }
        }
    }
}
