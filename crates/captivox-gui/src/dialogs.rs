use captivox_export::{ExportError, ExportOutcome, ExportProgress};
use std::path::PathBuf;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown in a modal-style window until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, title: title.into(), message: message.into() }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, title: title.into(), message: message.into() }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, title: title.into(), message: message.into() }
    }

    /// Describe a failed export. Missing encoders and a paused animation
    /// are not failures of the program.
    pub fn from_export_error(err: &ExportError) -> Self {
        match err {
            ExportError::Unavailable(..) => Self::info("Export unavailable", err.to_string()),
            ExportError::Paused => Self::warning("Animation paused", err.to_string()),
            _ => Self::error("Export failed", err.to_string()),
        }
    }

    /// The save dialog was dismissed without choosing a file.
    pub fn export_not_chosen() -> Self {
        Self::info("Export cancelled", "No export file given.")
    }

    pub fn from_export_outcome(outcome: &ExportOutcome) -> Self {
        match outcome {
            ExportOutcome::Finished { path, frames } => Self::info(
                "Export finished",
                format!("{} frames saved to {}", frames, path.display()),
            ),
            ExportOutcome::Cancelled => {
                Self::info("Export cancelled", "The partial file was removed.")
            }
        }
    }
}

/// Draw `notice` if set, clearing it when the user closes the window.
pub fn draw_notice(ctx: &egui::Context, notice: &mut Option<Notice>) {
    let Some(current) = notice.as_ref() else {
        return;
    };
    let mut open = true;
    let mut dismissed = false;
    let color = match current.level {
        NoticeLevel::Info => ctx.style().visuals.text_color(),
        NoticeLevel::Warning => ctx.style().visuals.warn_fg_color,
        NoticeLevel::Error => ctx.style().visuals.error_fg_color,
    };
    egui::Window::new(current.title.as_str())
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(current.message.as_str()).color(color));
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    if !open || dismissed {
        *notice = None;
    }
}

/// Draw the export progress window. Returns true when Cancel was pressed.
pub fn draw_export_progress(ctx: &egui::Context, progress: &ExportProgress) -> bool {
    let mut cancel = false;
    egui::Window::new("Exporting")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Frame {} of {}", progress.done, progress.total));
            ui.add(egui::ProgressBar::new(progress.fraction()).show_percentage());
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });
    cancel
}

/// Draw the About dialog window.
pub fn draw_about_dialog(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("About captivox")
        .open(open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("captivox");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(8.0);
                ui.label("Animated dot pattern generator");
                ui.label("Export to .mp4 (with the video feature) or .gif.");
                ui.add_space(8.0);
                ui.label("License: GPL-3.0");
            });
        });
}

const DEFAULT_EXPORT_NAME: &str = "captivox.mp4";

/// Ask the user where to save an export.
///
/// Returns `None` if the dialog was dismissed.
#[cfg(feature = "file-dialog")]
pub fn pick_export_path() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export animation")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("MP4 video", &["mp4"])
        .add_filter("Animated GIF", &["gif"])
        .save_file()
}

/// Without native dialogs, export into the working directory.
#[cfg(not(feature = "file-dialog"))]
pub fn pick_export_path() -> Option<PathBuf> {
    let dir = std::env::current_dir().ok()?;
    Some(dir.join(DEFAULT_EXPORT_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_levels() {
        let unavailable = ExportError::Unavailable("MP4", "no encoder");
        assert_eq!(Notice::from_export_error(&unavailable).level, NoticeLevel::Info);
        assert_eq!(Notice::from_export_error(&ExportError::Paused).level, NoticeLevel::Warning);
        let failed = ExportError::Encoder("disk full".to_string());
        let notice = Notice::from_export_error(&failed);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("disk full"));
    }

    #[test]
    fn test_dismissed_save_dialog_is_informational() {
        let notice = Notice::export_not_chosen();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.title, "Export cancelled");
        assert!(notice.message.contains("No export file"));
    }

    #[test]
    fn test_finished_outcome_mentions_path() {
        let outcome = ExportOutcome::Finished { path: PathBuf::from("out.gif"), frames: 11 };
        let notice = Notice::from_export_outcome(&outcome);
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(notice.message.contains("11 frames"));
        assert!(notice.message.contains("out.gif"));
    }
}
