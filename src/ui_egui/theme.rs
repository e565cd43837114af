//! Theme module for the booking grid
//!
//! Defines the GridTheme structure with the colors used by the grid and
//! its dialogs, plus the light and dark presets.

use egui::Color32;

/// Colors used across the application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTheme {
    /// Whether this is a dark theme (affects base egui::Visuals)
    pub is_dark: bool,

    /// Application background color
    pub app_background: Color32,

    /// Background of a bookable sub-slot
    pub open_background: Color32,

    /// Background of a sub-slot outside business hours
    pub closed_background: Color32,

    /// Fill of confirmed bookings
    pub booking_fill: Color32,

    /// Fill of administrator blocks
    pub blocked_fill: Color32,

    /// Fill of the pending drag selection
    pub selection_fill: Color32,

    /// Grid line color
    pub grid_line: Color32,

    /// Primary text color (headings, labels)
    pub text_primary: Color32,

    /// Secondary text color (time column, secondary info)
    pub text_secondary: Color32,
}

impl GridTheme {
    /// Create the default Light theme
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(245, 245, 245),
            open_background: Color32::from_rgb(255, 255, 255),
            closed_background: Color32::from_rgb(232, 232, 236),
            booking_fill: Color32::from_rgb(70, 130, 200),
            blocked_fill: Color32::from_rgb(150, 150, 160),
            selection_fill: Color32::from_rgb(120, 200, 140),
            grid_line: Color32::from_rgb(220, 220, 220),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
        }
    }

    /// Create the default Dark theme
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(30, 30, 30),
            open_background: Color32::from_rgb(40, 40, 40),
            closed_background: Color32::from_rgb(28, 28, 32),
            booking_fill: Color32::from_rgb(60, 110, 180),
            blocked_fill: Color32::from_rgb(95, 95, 105),
            selection_fill: Color32::from_rgb(70, 150, 95),
            grid_line: Color32::from_rgb(60, 60, 60),
            text_primary: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(170, 170, 170),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Apply this theme to an egui context
    pub fn apply_to_context(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.window_fill = self.app_background;
        visuals.panel_fill = self.app_background;
        visuals.selection.bg_fill = self.selection_fill;

        ctx.set_visuals(visuals);
    }
}
