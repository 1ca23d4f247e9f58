use crate::encoder::{open_encoder, EncoderConfig, ExportFormat, FrameEncoder, DEFAULT_BITRATE};
use crate::error::ExportError;
use crate::raster::Canvas;
use captivox_core::{AnimationClock, AnimationParameters};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Output size of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
    pub bitrate: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            bitrate: DEFAULT_BITRATE,
        }
    }
}

impl ExportConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    /// Frame size rounded down to even numbers, as 4:2:0 video requires.
    pub fn frame_size(&self) -> (u32, u32) {
        ((self.width & !1).max(2), (self.height & !1).max(2))
    }
}

/// Cooperative cancellation flag shared between the export loop and
/// whatever UI offers a cancel action.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// Animation frame just encoded, starting at 1.
    pub frame_no: u64,
    /// Frames encoded so far.
    pub done: u64,
    pub total: u64,
}

impl ExportProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.done as f32 / self.total as f32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Finished { path: PathBuf, frames: u64 },
    /// Stopped by the user. The partial file has been removed.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStep {
    Frame(ExportProgress),
    Done(ExportOutcome),
}

/// Append `.mp4` to a path chosen without an extension.
pub fn normalize_export_path(path: impl Into<PathBuf>) -> PathBuf {
    let mut path = path.into();
    if path.extension().is_none() {
        path.set_extension("mp4");
    }
    path
}

/// An export in progress, advanced one frame per [`step`](Self::step).
///
/// Frames `1..=2 * halfmax + 1` are rendered in order on the caller's
/// thread. The cancel token is checked before each frame. The caller's clock
/// is not touched: the session counts frames on its own.
pub struct ExportSession {
    encoder: Box<dyn FrameEncoder>,
    path: PathBuf,
    params: AnimationParameters,
    canvas: Canvas,
    next_frame: u64,
    total: u64,
    cancel: CancelToken,
    outcome: Option<ExportOutcome>,
}

impl ExportSession {
    /// Validate the request and open the encoder for `path`.
    pub fn start(
        path: impl Into<PathBuf>,
        params: &AnimationParameters,
        clock: &AnimationClock,
        config: ExportConfig,
        cancel: CancelToken,
    ) -> Result<Self, ExportError> {
        let path = normalize_export_path(path);
        check_request(params, clock)?;
        let format = ExportFormat::from_path(&path)?;
        if !format.is_available() {
            log::info!("{} export requested but not compiled in", format.name());
        }

        let (width, height) = config.frame_size();
        let encoder = open_encoder(
            format,
            EncoderConfig {
                output_path: path.clone(),
                width,
                height,
                interval_ms: clock.interval_ms(),
                bitrate: config.bitrate,
            },
        )?;
        log::info!(
            "exporting {} frames at {:.1} fps to {:?}",
            params.export_frame_count(),
            clock.fps().unwrap_or_default(),
            path
        );
        Ok(Self::with_encoder(encoder, path, params, config, cancel))
    }

    /// Build a session around an already opened encoder.
    pub fn with_encoder(
        encoder: Box<dyn FrameEncoder>,
        path: impl Into<PathBuf>,
        params: &AnimationParameters,
        config: ExportConfig,
        cancel: CancelToken,
    ) -> Self {
        let (width, height) = config.frame_size();
        Self {
            encoder,
            path: path.into(),
            params: *params,
            canvas: Canvas::new(width, height),
            next_frame: 1,
            total: params.export_frame_count(),
            cancel,
            outcome: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn progress(&self) -> ExportProgress {
        let done = self.next_frame - 1;
        ExportProgress {
            frame_no: done,
            done,
            total: self.total,
        }
    }

    /// Render and encode the next frame, or wrap up.
    ///
    /// On error or cancellation the encoder is aborted and the partial file
    /// deleted. Once done, further calls return the same outcome.
    pub fn step(&mut self) -> Result<ExportStep, ExportError> {
        if let Some(outcome) = &self.outcome {
            return Ok(ExportStep::Done(outcome.clone()));
        }

        if self.cancel.is_cancelled() {
            log::info!("export to {:?} cancelled at frame {}", self.path, self.next_frame);
            self.discard();
            return Ok(self.complete(ExportOutcome::Cancelled));
        }

        if self.next_frame > self.total {
            if let Err(e) = self.encoder.finish() {
                self.discard();
                return Err(e);
            }
            log::info!("export finished: {} frames saved to {:?}", self.total, self.path);
            let outcome = ExportOutcome::Finished {
                path: self.path.clone(),
                frames: self.total,
            };
            return Ok(self.complete(outcome));
        }

        let frame_no = self.next_frame;
        if let Err(e) = self.encode(frame_no) {
            log::error!("export to {:?} failed at frame {}: {}", self.path, frame_no, e);
            self.discard();
            return Err(e);
        }
        self.next_frame += 1;
        Ok(ExportStep::Frame(ExportProgress {
            frame_no,
            done: frame_no,
            total: self.total,
        }))
    }

    fn encode(&mut self, frame_no: u64) -> Result<(), ExportError> {
        let image = self.canvas.render(&self.params, frame_no)?;
        self.encoder.push_frame(image)
    }

    fn complete(&mut self, outcome: ExportOutcome) -> ExportStep {
        self.outcome = Some(outcome.clone());
        ExportStep::Done(outcome)
    }

    fn discard(&mut self) {
        self.encoder.abort();
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("removed partial export {:?}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("could not remove partial export {:?}: {}", self.path, e),
        }
        // Never report a finished export after discarding
        self.next_frame = self.total + 1;
    }
}

fn check_request(params: &AnimationParameters, clock: &AnimationClock) -> Result<(), ExportError> {
    params.validate()?;
    if !clock.is_running() {
        log::warn!("export refused: animation is paused");
        return Err(ExportError::Paused);
    }
    Ok(())
}

/// Run a whole export synchronously.
///
/// `on_progress` is called after every encoded frame; setting `cancel` from
/// it (or from anywhere else) stops the export before the next frame.
pub fn export(
    path: impl Into<PathBuf>,
    params: &AnimationParameters,
    clock: &AnimationClock,
    config: ExportConfig,
    cancel: CancelToken,
    on_progress: impl FnMut(ExportProgress),
) -> Result<ExportOutcome, ExportError> {
    let session = ExportSession::start(path, params, clock, config, cancel)?;
    run_to_completion(session, on_progress)
}

/// Drive `session` until it finishes or is cancelled.
pub fn run_to_completion(
    mut session: ExportSession,
    mut on_progress: impl FnMut(ExportProgress),
) -> Result<ExportOutcome, ExportError> {
    loop {
        match session.step()? {
            ExportStep::Frame(progress) => on_progress(progress),
            ExportStep::Done(outcome) => return Ok(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_export_path() {
        assert_eq!(normalize_export_path("out"), PathBuf::from("out.mp4"));
        assert_eq!(normalize_export_path("out.gif"), PathBuf::from("out.gif"));
        assert_eq!(normalize_export_path("dir/out.mp4"), PathBuf::from("dir/out.mp4"));
    }

    #[test]
    fn test_frame_size_even() {
        assert_eq!(ExportConfig::new(401, 299).frame_size(), (400, 298));
        assert_eq!(ExportConfig::new(1, 0).frame_size(), (2, 2));
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        assert!(token.is_cancelled());
    }
}
