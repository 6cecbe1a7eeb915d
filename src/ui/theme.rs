//! Theme and styling for the Mira UI
//!
//! This module provides colors, fonts, and visual styling for the application.

use crate::ui::state::CompanionPhase;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color (Mira's pink)
    pub primary: Color32,
    /// Secondary accent color (listening indigo)
    pub secondary: Color32,
    /// Thinking accent color
    pub thinking: Color32,
    /// Comfort mode accent color
    pub comfort: Color32,
    /// Error color
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Chat bubble fills
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,
    /// Inline code block text color
    pub code_text: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for chat bubbles
    pub bubble_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the dark companion theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(236, 72, 153),   // Pink
            secondary: Color32::from_rgb(99, 102, 241), // Indigo
            thinking: Color32::from_rgb(168, 85, 247),  // Purple
            comfort: Color32::from_rgb(251, 113, 133),  // Rose
            error: Color32::from_rgb(239, 68, 68),      // Red

            bg_primary: Color32::from_rgb(10, 10, 12),   // Near black
            bg_secondary: Color32::from_rgb(20, 20, 26), // Panel fill
            bg_tertiary: Color32::from_rgb(31, 41, 55),  // Raised surfaces

            text_primary: Color32::from_rgb(249, 250, 251),   // Almost white
            text_secondary: Color32::from_rgb(209, 213, 219), // Light gray
            text_muted: Color32::from_rgb(107, 114, 128),     // Medium gray

            user_bubble: Color32::from_rgb(49, 46, 129),     // Deep indigo
            assistant_bubble: Color32::from_rgb(80, 7, 36),  // Deep pink
            code_text: Color32::from_rgb(244, 114, 182),     // Light pink

            button_rounding: Rounding::same(8.0),
            bubble_rounding: Rounding::same(12.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Orb color for a companion phase, with the comfort palette
    /// taking over while a session is active
    pub fn phase_color(&self, phase: CompanionPhase, comfort_mode: bool) -> Color32 {
        if comfort_mode
            && !matches!(phase, CompanionPhase::Idle | CompanionPhase::Error)
        {
            return self.comfort;
        }

        match phase {
            CompanionPhase::Speaking => self.primary,
            CompanionPhase::Listening => self.secondary,
            CompanionPhase::Thinking => self.thinking,
            CompanionPhase::Connecting => self.text_muted,
            CompanionPhase::Error => self.error,
            CompanionPhase::Idle => self.bg_tertiary,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        // Panel backgrounds
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        // Widget colors
        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Text selection
        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);

        // Hyperlinks
        visuals.hyperlink_color = self.primary;

        // Window styling
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        ctx.set_fonts(egui::FontDefinitions::default());

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        // Text styles
        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(24.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }
}
