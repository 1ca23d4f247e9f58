use captivox_core::clock::INTERVAL_RANGE;
use captivox_core::params::{
    ANGLE_FACTOR_RANGE, DOT_SIZE_RANGE, HALFMAX_RANGE, MULTIPLIER_RANGE, NUM_DOTS_RANGE,
    SPEED_MULT_RANGE,
};
use captivox_core::{AnimationClock, AnimationParameters, Hsv, ParamUpdate};
use crossbeam::channel::Sender;
use std::ops::RangeInclusive;

/// Actions from the control panel that the host has to carry out itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    None,
    Export,
}

fn slider(
    ui: &mut egui::Ui,
    tx: &Sender<ParamUpdate>,
    label: &str,
    current: u32,
    range: RangeInclusive<u32>,
    update: fn(u32) -> ParamUpdate,
) {
    let mut value = current;
    if ui.add(egui::Slider::new(&mut value, range).text(label)).changed() {
        let _ = tx.try_send(update(value));
    }
}

fn checkbox(
    ui: &mut egui::Ui,
    tx: &Sender<ParamUpdate>,
    label: &str,
    current: bool,
    update: fn(bool) -> ParamUpdate,
) {
    let mut value = current;
    if ui.checkbox(&mut value, label).changed() {
        let _ = tx.try_send(update(value));
    }
}

fn color_button(
    ui: &mut egui::Ui,
    tx: &Sender<ParamUpdate>,
    label: &str,
    current: Hsv,
    update: fn(Hsv) -> ParamUpdate,
) {
    ui.horizontal(|ui| {
        let mut rgb = current.to_rgb8();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            let [r, g, b] = rgb;
            let _ = tx.try_send(update(Hsv::from_rgb8(r, g, b)));
        }
        ui.label(label);
    });
}

/// Draw every animation control. Edits are sent as [`ParamUpdate`]s and
/// applied by the owner of the animation.
pub fn draw_controls(
    ui: &mut egui::Ui,
    params: &AnimationParameters,
    clock: &AnimationClock,
    tx: &Sender<ParamUpdate>,
    exporting: bool,
) -> ControlAction {
    let mut action = ControlAction::None;

    ui.heading("Pattern");
    ui.separator();
    slider(ui, tx, "Angle factor", params.angle_factor, ANGLE_FACTOR_RANGE, ParamUpdate::AngleFactor);
    slider(ui, tx, "Dots", params.num_dots, NUM_DOTS_RANGE, ParamUpdate::NumDots);
    slider(ui, tx, "Dot size", params.dot_size, DOT_SIZE_RANGE, ParamUpdate::DotSize);
    slider(ui, tx, "X multiplier", params.x_multiplier, MULTIPLIER_RANGE, ParamUpdate::XMultiplier);
    slider(ui, tx, "Y multiplier", params.y_multiplier, MULTIPLIER_RANGE, ParamUpdate::YMultiplier);
    slider(ui, tx, "Half max", params.halfmax, HALFMAX_RANGE, ParamUpdate::Halfmax);

    ui.add_space(8.0);
    ui.heading("Motion");
    ui.separator();
    slider(ui, tx, "Speed", params.speed_mult, SPEED_MULT_RANGE, ParamUpdate::SpeedMult);
    slider(ui, tx, "Delay (ms)", clock.interval_ms(), INTERVAL_RANGE, ParamUpdate::Interval);
    match clock.fps() {
        Some(fps) => ui.label(format!("Frame {} at {:.1} fps", clock.frame_no(), fps)),
        None => ui.label(format!("Paused at frame {}", clock.frame_no())),
    };

    ui.add_space(8.0);
    ui.heading("Drawing");
    ui.separator();
    checkbox(ui, tx, "Join end dots", params.join_end_dots, ParamUpdate::JoinEndDots);
    checkbox(ui, tx, "Draw axes", params.draw_axes, ParamUpdate::DrawAxes);
    checkbox(ui, tx, "Draw lines", params.draw_lines, ParamUpdate::DrawLines);
    ui.add_enabled_ui(params.draw_lines, |ui| {
        checkbox(ui, tx, "Connect lines", params.connect_lines, ParamUpdate::ConnectLines);
    });
    color_button(ui, tx, "Start color", params.color_start, ParamUpdate::ColorStart);
    color_button(ui, tx, "End color", params.color_end, ParamUpdate::ColorEnd);

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Reset").clicked() {
            let _ = tx.try_send(ParamUpdate::ResetDefaults);
        }
        if ui.add_enabled(!exporting, egui::Button::new("Export...")).clicked() {
            action = ControlAction::Export;
        }
    });

    action
}
