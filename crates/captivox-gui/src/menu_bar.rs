/// Tracks which dialogs are currently open.
#[derive(Default)]
pub struct MenuState {
    pub show_about: bool,
}

/// Actions returned from the menu bar that require processing by the caller.
#[derive(Debug, PartialEq)]
pub enum MenuAction {
    None,
    Export,
    ResetDefaults,
    Quit,
}

/// Draw the menu bar inside a `TopBottomPanel`.
pub fn draw_menu_bar(ui: &mut egui::Ui, state: &mut MenuState, exporting: bool) -> MenuAction {
    let mut action = MenuAction::None;

    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui
                .add_enabled(!exporting, egui::Button::new("Export...").shortcut_text("Ctrl+E"))
                .clicked()
            {
                action = MenuAction::Export;
                ui.close_menu();
            }
            if ui.button("Reset to Defaults").clicked() {
                action = MenuAction::ResetDefaults;
                ui.close_menu();
            }
            ui.separator();
            if ui.add(egui::Button::new("Quit").shortcut_text("Ctrl+Q")).clicked() {
                action = MenuAction::Quit;
                ui.close_menu();
            }
        });

        ui.menu_button("Help", |ui| {
            if ui.button("About captivox").clicked() {
                state.show_about = true;
                ui.close_menu();
            }
        });
    });

    action
}

/// Keyboard equivalents of the menu entries.
pub fn shortcut_action(ctx: &egui::Context, exporting: bool) -> MenuAction {
    ctx.input(|i| {
        if i.modifiers.command && i.key_pressed(egui::Key::E) && !exporting {
            MenuAction::Export
        } else if i.modifiers.command && i.key_pressed(egui::Key::Q) {
            MenuAction::Quit
        } else {
            MenuAction::None
        }
    })
}
