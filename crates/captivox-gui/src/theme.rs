use egui::{Color32, Stroke};

// Light palette; the canvas itself is always white
const PANEL: Color32 = Color32::from_rgb(246, 246, 244);
const FAINT: Color32 = Color32::from_rgb(232, 232, 228);
const WIDGET: Color32 = Color32::from_rgb(220, 222, 226);
const HOVER: Color32 = Color32::from_rgb(200, 214, 200);
const BORDER: Color32 = Color32::from_rgb(170, 174, 180);
const TEXT: Color32 = Color32::from_rgb(34, 36, 40);
const ACCENT: Color32 = Color32::from_rgb(0, 150, 0);
const ACCENT_ALT: Color32 = Color32::from_rgb(0, 0, 180);
const WARN: Color32 = Color32::from_rgb(196, 120, 0);
const ERROR: Color32 = Color32::from_rgb(200, 40, 40);

static INIT: std::sync::Once = std::sync::Once::new();

/// Apply the light theme to the egui context. Only the first call has an
/// effect.
pub fn apply(ctx: &egui::Context) {
    INIT.call_once(|| ctx.set_visuals(visuals()));
}

pub fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();

    visuals.panel_fill = PANEL;
    visuals.window_fill = PANEL;
    visuals.faint_bg_color = FAINT;
    visuals.extreme_bg_color = Color32::WHITE;

    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.hyperlink_color = ACCENT_ALT;
    visuals.warn_fg_color = WARN;
    visuals.error_fg_color = ERROR;

    visuals.widgets.inactive.bg_fill = WIDGET;
    visuals.widgets.inactive.weak_bg_fill = WIDGET;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT);

    visuals.widgets.hovered.bg_fill = HOVER;
    visuals.widgets.hovered.weak_bg_fill = HOVER;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);

    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);

    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT);
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, FAINT);

    visuals.window_stroke = Stroke::new(1.0, BORDER);
    visuals
}
