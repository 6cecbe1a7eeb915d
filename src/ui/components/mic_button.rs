//! Session toggle button
//!
//! The single round button that starts a conversation when idle and
//! hangs up while one is running.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

/// Microphone toggle button
pub struct MicButton<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MicButton<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Show the button and return the response for the caller to
    /// wire up
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let size = Vec2::splat(72.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            self.paint_button(ui, rect, &response);
        }

        let tooltip = if self.state.phase.is_active() {
            "Hang up (Space)"
        } else {
            "Start talking (Space)"
        };

        response.clone().on_hover_text(tooltip);
        response
    }

    fn paint_button(&self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let active = self.state.phase.is_active();

        let bg_color = if active {
            if response.hovered() {
                self.theme.error.gamma_multiply(1.2)
            } else {
                self.theme.error
            }
        } else if response.hovered() {
            self.theme.primary.gamma_multiply(1.2)
        } else {
            self.theme.primary
        };

        painter.circle_filled(rect.center(), 32.0, bg_color);

        if response.hovered() && !active {
            painter.circle_stroke(
                rect.center(),
                34.0,
                Stroke::new(2.0, self.theme.primary.gamma_multiply(0.6)),
            );
        }

        if active {
            self.draw_hangup_icon(painter, rect.center());
            self.draw_pulsing_ring(ui, painter, rect.center());
        } else {
            self.draw_mic_icon(painter, rect.center());
        }
    }

    /// Crossed lines, meaning end the call
    fn draw_hangup_icon(&self, painter: &egui::Painter, center: Pos2) {
        let arm = 9.0;
        let stroke = Stroke::new(3.0, Color32::WHITE);

        painter.line_segment(
            [
                Pos2::new(center.x - arm, center.y - arm),
                Pos2::new(center.x + arm, center.y + arm),
            ],
            stroke,
        );
        painter.line_segment(
            [
                Pos2::new(center.x - arm, center.y + arm),
                Pos2::new(center.x + arm, center.y - arm),
            ],
            stroke,
        );
    }

    fn draw_mic_icon(&self, painter: &egui::Painter, center: Pos2) {
        let color = Color32::WHITE;

        // Mic body
        let mic_rect = Rect::from_center_size(
            Pos2::new(center.x, center.y - 4.0),
            Vec2::new(9.0, 16.0),
        );
        painter.rect_filled(mic_rect, 4.5, color);

        // Stand arc
        let arc_center = Pos2::new(center.x, center.y + 2.0);
        let arc_radius = 11.0;
        let num_segments = 8;
        for i in 0..num_segments {
            let start_angle = std::f32::consts::PI * (i as f32 / num_segments as f32);
            let end_angle = std::f32::consts::PI * ((i + 1) as f32 / num_segments as f32);

            let start = Pos2::new(
                arc_center.x - arc_radius * start_angle.cos(),
                arc_center.y + arc_radius * start_angle.sin(),
            );
            let end = Pos2::new(
                arc_center.x - arc_radius * end_angle.cos(),
                arc_center.y + arc_radius * end_angle.sin(),
            );

            painter.line_segment([start, end], Stroke::new(2.0, color));
        }

        // Stem and base
        let stem_top = Pos2::new(center.x, arc_center.y + arc_radius);
        let stem_bottom = Pos2::new(center.x, arc_center.y + arc_radius + 4.0);
        painter.line_segment([stem_top, stem_bottom], Stroke::new(2.0, color));
        painter.line_segment(
            [
                Pos2::new(center.x - 6.0, stem_bottom.y),
                Pos2::new(center.x + 6.0, stem_bottom.y),
            ],
            Stroke::new(2.0, color),
        );
    }

    fn draw_pulsing_ring(&self, ui: &egui::Ui, painter: &egui::Painter, center: Pos2) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

        let radius = 34.0 + pulse * 8.0;
        let alpha = (1.0 - pulse) * 0.6;

        painter.circle_stroke(
            center,
            radius,
            Stroke::new(2.0 + pulse * 2.0, self.theme.error.gamma_multiply(alpha)),
        );

        ui.ctx().request_repaint();
    }
}
