use captivox_core::{Animation, AnimationEvent, ParamUpdate, Viewport};
use captivox_export::{
    CancelToken, ExportConfig, ExportProgress, ExportSession, ExportStep,
};
use captivox_gui::dialogs::{self, Notice};
use captivox_gui::{canvas, controls, menu_bar, theme, ControlAction, MenuAction, MenuState};
use crossbeam::channel::{self, Receiver, Sender};
use eframe::egui;
use std::time::{Duration, Instant};

/// Time spent encoding per UI frame while an export runs.
const EXPORT_BUDGET: Duration = Duration::from_millis(30);

struct ActiveExport {
    session: ExportSession,
    progress: ExportProgress,
}

/// Main application state
pub struct CaptivoxApp {
    animation: Animation,
    update_tx: Sender<ParamUpdate>,
    update_rx: Receiver<ParamUpdate>,
    events: Receiver<AnimationEvent>,
    displayed_frame: u64,
    viewport: Viewport,
    export: Option<ActiveExport>,
    notice: Option<Notice>,
    menu: MenuState,
}

impl CaptivoxApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut animation: Animation) -> Self {
        theme::apply(&cc.egui_ctx);
        let (update_tx, update_rx) = channel::unbounded();
        let events = animation.subscribe();
        let displayed_frame = animation.clock().frame_no();
        Self {
            animation,
            update_tx,
            update_rx,
            events,
            displayed_frame,
            viewport: Viewport::new(400.0, 400.0),
            export: None,
            notice: None,
            menu: MenuState::default(),
        }
    }

    fn apply_updates(&mut self) {
        while let Ok(update) = self.update_rx.try_recv() {
            if let Err(e) = self.animation.apply(update) {
                log::warn!("rejected {:?}: {}", update, e);
                self.notice = Some(Notice::error("Invalid value", e.to_string()));
            }
        }
    }

    fn handle_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                AnimationEvent::Redraw { frame_no } => self.displayed_frame = frame_no,
                AnimationEvent::StateChanged(state) => log::info!("animation {:?}", state),
                AnimationEvent::Changed(_) => {}
            }
        }
    }

    fn start_export(&mut self) {
        let Some(path) = dialogs::pick_export_path() else {
            log::info!("export cancelled: no file chosen");
            self.notice = Some(Notice::export_not_chosen());
            return;
        };
        let config = ExportConfig::new(self.viewport.width as u32, self.viewport.height as u32);
        match ExportSession::start(
            path,
            self.animation.params(),
            self.animation.clock(),
            config,
            CancelToken::new(),
        ) {
            Ok(session) => {
                let progress = session.progress();
                self.export = Some(ActiveExport { session, progress });
            }
            Err(e) => {
                if !e.is_informational() {
                    log::error!("export not started: {}", e);
                }
                self.notice = Some(Notice::from_export_error(&e));
            }
        }
    }

    /// Encode frames for up to [`EXPORT_BUDGET`], keeping the UI responsive.
    fn step_export(&mut self) {
        let Some(active) = self.export.as_mut() else {
            return;
        };
        let started = Instant::now();
        while started.elapsed() < EXPORT_BUDGET {
            match active.session.step() {
                Ok(ExportStep::Frame(progress)) => active.progress = progress,
                Ok(ExportStep::Done(outcome)) => {
                    self.notice = Some(Notice::from_export_outcome(&outcome));
                    self.export = None;
                    return;
                }
                Err(e) => {
                    self.notice = Some(Notice::from_export_error(&e));
                    self.export = None;
                    return;
                }
            }
        }
    }

    fn handle_menu(&mut self, action: MenuAction, ctx: &egui::Context) {
        match action {
            MenuAction::None => {}
            MenuAction::Export => self.start_export(),
            MenuAction::ResetDefaults => {
                let _ = self.update_tx.try_send(ParamUpdate::ResetDefaults);
            }
            MenuAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}

impl eframe::App for CaptivoxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_updates();
        let now = Instant::now();
        // The animation holds still while an export renders its own frames
        if self.export.is_none() {
            self.animation.tick(now);
        }
        self.handle_events();
        self.step_export();

        let exporting = self.export.is_some();

        let mut menu_action = menu_bar::shortcut_action(ctx, exporting);
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            let action = menu_bar::draw_menu_bar(ui, &mut self.menu, exporting);
            if action != MenuAction::None {
                menu_action = action;
            }
        });

        let mut control_action = ControlAction::None;
        egui::SidePanel::right("controls")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    control_action = controls::draw_controls(
                        ui,
                        self.animation.params(),
                        self.animation.clock(),
                        &self.update_tx,
                        exporting,
                    );
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport = canvas::draw_canvas(ui, &self.animation, self.displayed_frame);
            });

        if let Some(active) = &self.export {
            if dialogs::draw_export_progress(ctx, &active.progress) {
                active.session.cancel_token().cancel();
            }
        }
        dialogs::draw_notice(ctx, &mut self.notice);
        dialogs::draw_about_dialog(ctx, &mut self.menu.show_about);

        if control_action == ControlAction::Export {
            menu_action = MenuAction::Export;
        }
        self.handle_menu(menu_action, ctx);

        if self.export.is_some() || !self.update_rx.is_empty() {
            ctx.request_repaint();
        } else if let Some(wait) = self.animation.clock().until_next_tick(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
