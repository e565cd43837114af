//! Short-lived feedback messages ("Booking saved", "3 bookings trimmed").

use egui::{Color32, Context, Pos2, RichText};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const FADE_OUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

impl ToastLevel {
    fn icon(self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Info => "ℹ",
            ToastLevel::Error => "✗",
        }
    }

    fn colors(self, is_dark: bool) -> (Color32, Color32) {
        match (self, is_dark) {
            (ToastLevel::Success, true) => (Color32::from_rgb(30, 70, 40), Color32::from_rgb(100, 220, 120)),
            (ToastLevel::Success, false) => (Color32::from_rgb(220, 255, 220), Color32::from_rgb(30, 120, 50)),
            (ToastLevel::Info, true) => (Color32::from_rgb(30, 50, 80), Color32::from_rgb(100, 180, 255)),
            (ToastLevel::Info, false) => (Color32::from_rgb(220, 235, 255), Color32::from_rgb(30, 80, 150)),
            (ToastLevel::Error, true) => (Color32::from_rgb(80, 30, 30), Color32::from_rgb(255, 120, 120)),
            (ToastLevel::Error, false) => (Color32::from_rgb(255, 220, 220), Color32::from_rgb(180, 40, 40)),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    level: ToastLevel,
    created_at: Instant,
}

impl Toast {
    /// 1.0 while fresh, fading to 0.0 over the last half second.
    fn opacity(&self) -> f32 {
        let elapsed = self.created_at.elapsed();
        if elapsed >= TOAST_LIFETIME {
            return 0.0;
        }
        let remaining = TOAST_LIFETIME - elapsed;
        if remaining < FADE_OUT {
            remaining.as_secs_f32() / FADE_OUT.as_secs_f32()
        } else {
            1.0
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toasts.push(Toast {
            message: message.into(),
            level,
            created_at: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.add(message, ToastLevel::Success);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.add(message, ToastLevel::Info);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(message, ToastLevel::Error);
    }

    pub fn render(&mut self, ctx: &Context, is_dark: bool) {
        self.toasts.retain(|toast| toast.opacity() > 0.0);
        if self.toasts.is_empty() {
            return;
        }
        ctx.request_repaint();

        let screen = ctx.screen_rect();
        let width = 320.0;
        let height = 40.0;

        for (index, toast) in self.toasts.iter().enumerate() {
            let opacity = toast.opacity();
            let pos = Pos2::new(
                screen.right() - width - 10.0,
                screen.bottom() - 10.0 - (index as f32 + 1.0) * (height + 5.0),
            );
            let (background, text) = toast.level.colors(is_dark);

            egui::Area::new(egui::Id::new(("toast", index)))
                .fixed_pos(pos)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(background.gamma_multiply(0.9 * opacity))
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_min_width(width - 24.0);
                            let color = text.gamma_multiply(opacity);
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(toast.level.icon()).color(color).strong());
                                ui.label(RichText::new(&toast.message).color(color));
                            });
                        });
                });
        }
    }
}
