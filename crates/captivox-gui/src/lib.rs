//! egui front end: canvas painter, control panel, menus and dialogs.

pub mod canvas;
pub mod controls;
pub mod dialogs;
pub mod menu_bar;
pub mod theme;

pub use canvas::{draw_canvas, primitive_to_shape};
pub use controls::{draw_controls, ControlAction};
pub use dialogs::{Notice, NoticeLevel};
pub use menu_bar::{MenuAction, MenuState};
