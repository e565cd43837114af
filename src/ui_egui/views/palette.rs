use crate::ui_egui::theme::GridTheme;
use egui::Color32;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

#[derive(Clone, Copy)]
pub(crate) struct GridPalette {
    pub open_bg: Color32,
    pub closed_bg: Color32,
    pub booking_fill: Color32,
    pub booking_accent: Color32,
    pub blocked_fill: Color32,
    pub blocked_accent: Color32,
    pub selection_fill: Color32,
    pub selection_border: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub hover_overlay: Color32,
    pub fill_text: Color32,
    pub time_text: Color32,
    pub header_text: Color32,
}

impl GridPalette {
    pub fn from_theme(theme: &GridTheme) -> Self {
        let shade = if theme.is_dark { Color32::WHITE } else { Color32::BLACK };
        Self {
            open_bg: theme.open_background,
            closed_bg: theme.closed_background,
            booking_fill: theme.booking_fill,
            booking_accent: blend(theme.booking_fill, shade, 0.3),
            blocked_fill: theme.blocked_fill,
            blocked_accent: blend(theme.blocked_fill, shade, 0.3),
            selection_fill: with_alpha(theme.selection_fill, if theme.is_dark { 150 } else { 110 }),
            selection_border: theme.selection_fill,
            hour_line: blend(theme.grid_line, shade, 0.15),
            slot_line: with_alpha(theme.grid_line, 140),
            hover_overlay: with_alpha(theme.selection_fill, 40),
            fill_text: Color32::WHITE,
            time_text: theme.text_secondary,
            header_text: theme.text_primary,
        }
    }
}
