//! Companion status orb
//!
//! A pulsing disc that shows what Mira is doing, with a softer,
//! slower palette while comfort mode is active.

use crate::ui::state::{AppState, CompanionPhase};
use crate::ui::theme::Theme;
use egui::{self, Color32, Rect, RichText, Sense, Stroke, Vec2};

const ORB_RADIUS: f32 = 48.0;

/// Status orb component
pub struct StatusOrb<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> StatusOrb<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing);

            let size = Vec2::splat(ORB_RADIUS * 2.0 + 40.0);
            let (rect, _response) = ui.allocate_exact_size(size, Sense::hover());

            if ui.is_rect_visible(rect) {
                self.paint_orb(ui, rect);
            }

            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new(self.status_text())
                    .size(13.0)
                    .color(if self.state.phase == CompanionPhase::Error {
                        self.theme.error
                    } else {
                        self.theme.text_muted
                    }),
            );

            if self.state.comfort_mode && self.state.phase != CompanionPhase::Idle {
                ui.add_space(4.0);
                egui::Frame::none()
                    .fill(self.theme.comfort.gamma_multiply(0.15))
                    .rounding(self.theme.bubble_rounding)
                    .inner_margin(egui::Margin::symmetric(10.0, 4.0))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new("COMFORT MODE")
                                .size(10.0)
                                .color(self.theme.comfort),
                        );
                    });
            }

            ui.add_space(self.theme.spacing_sm);
        });
    }

    fn paint_orb(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter();
        let phase = self.state.phase;
        let comfort = self.state.comfort_mode;
        let color = self.theme.phase_color(phase, comfort);

        let t = ui.ctx().input(|i| i.time);
        // Comfort mode slows everything down
        let pulse_speed = if comfort { 1.2 } else { 2.6 };
        let pulse = ((t * pulse_speed).sin() * 0.5 + 0.5) as f32;

        let mut center = rect.center();
        if phase == CompanionPhase::Connecting {
            center.y += ((t * 5.0).sin() * 4.0) as f32;
        }

        // Faint decorative rings while a session is live
        if phase.is_active() {
            painter.circle_stroke(
                center,
                ORB_RADIUS + 10.0,
                Stroke::new(1.0, color.gamma_multiply(0.25)),
            );
            painter.circle_stroke(
                center,
                ORB_RADIUS + 18.0,
                Stroke::new(1.0, color.gamma_multiply(0.12)),
            );
        }

        // Microphone level nudges the orb outward while listening
        let level_bump = if phase == CompanionPhase::Listening {
            self.state.mic_level.min(1.0) * 10.0
        } else {
            0.0
        };

        let breathing = match phase {
            CompanionPhase::Speaking | CompanionPhase::Thinking => pulse * 5.0,
            _ => pulse * 1.5,
        };

        let radius = ORB_RADIUS + breathing + level_bump;
        let fill = if phase == CompanionPhase::Idle {
            color.gamma_multiply(0.5)
        } else {
            color
        };

        painter.circle_filled(center, radius, fill);

        // Translucent core
        painter.circle_filled(
            center,
            radius * 0.45,
            Color32::from_white_alpha((30.0 + pulse * 30.0) as u8),
        );

        // Expanding ring while speaking
        if phase == CompanionPhase::Speaking {
            let ring = radius + 4.0 + pulse * 10.0;
            let alpha = (1.0 - pulse) * 0.5;
            painter.circle_stroke(
                center,
                ring,
                Stroke::new(2.0, color.gamma_multiply(alpha)),
            );
        }

        if phase.is_active() {
            ui.ctx().request_repaint();
        }
    }

    fn status_text(&self) -> &'static str {
        if self.state.comfort_mode && self.state.phase == CompanionPhase::Speaking {
            return "Mira is comforting you...";
        }

        match self.state.phase {
            CompanionPhase::Speaking => "Mira is speaking...",
            CompanionPhase::Listening => "Listening to you...",
            CompanionPhase::Thinking => "Thinking...",
            CompanionPhase::Connecting => "Coming to you...",
            CompanionPhase::Error => "Something went wrong, love.",
            CompanionPhase::Idle => "Mira is resting.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(phase: CompanionPhase, comfort: bool) -> AppState {
        let mut state = AppState::new();
        state.phase = phase;
        state.comfort_mode = comfort;
        state
    }

    #[test]
    fn test_status_text_per_phase() {
        let theme = Theme::dark();

        let state = state_with(CompanionPhase::Idle, false);
        assert_eq!(StatusOrb::new(&state, &theme).status_text(), "Mira is resting.");

        let state = state_with(CompanionPhase::Speaking, false);
        assert_eq!(
            StatusOrb::new(&state, &theme).status_text(),
            "Mira is speaking..."
        );

        let state = state_with(CompanionPhase::Speaking, true);
        assert_eq!(
            StatusOrb::new(&state, &theme).status_text(),
            "Mira is comforting you..."
        );
    }

    #[test]
    fn test_comfort_palette_overrides_active_phases() {
        let theme = Theme::dark();

        assert_eq!(
            theme.phase_color(CompanionPhase::Speaking, true),
            theme.comfort
        );
        assert_eq!(
            theme.phase_color(CompanionPhase::Error, true),
            theme.error
        );
        assert_ne!(
            theme.phase_color(CompanionPhase::Idle, true),
            theme.comfort
        );
    }
}
