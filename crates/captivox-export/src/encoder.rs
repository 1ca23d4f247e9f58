use crate::error::ExportError;
use crate::gif_encoder::GifEncoder;
use crate::recorder::Mp4Recorder;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Sink for rendered frames, in strictly increasing frame order.
pub trait FrameEncoder {
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<(), ExportError>;

    /// Flush everything and close the output file.
    fn finish(&mut self) -> Result<(), ExportError>;

    /// Stop without finalizing. The output file is closed but may be
    /// incomplete; the caller removes it.
    fn abort(&mut self) {}
}

/// Container chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Mp4,
    Gif,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" => Ok(ExportFormat::Mp4),
            "gif" => Ok(ExportFormat::Gif),
            _ => Err(ExportError::UnsupportedFormat(ext)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "MP4",
            ExportFormat::Gif => "GIF",
        }
    }

    /// Whether an encoder for this format was compiled in.
    pub fn is_available(&self) -> bool {
        match self {
            ExportFormat::Mp4 => cfg!(feature = "video"),
            ExportFormat::Gif => true,
        }
    }
}

/// Everything an encoder needs to open its output.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Delay between frames, so that `fps = 1000 / interval_ms`.
    pub interval_ms: u32,
    /// Target bitrate for lossy video formats, in bits per second.
    pub bitrate: usize,
}

pub const DEFAULT_BITRATE: usize = 4_000_000;

/// Open the encoder matching `format`.
pub fn open_encoder(
    format: ExportFormat,
    config: EncoderConfig,
) -> Result<Box<dyn FrameEncoder>, ExportError> {
    match format {
        ExportFormat::Mp4 => Ok(Box::new(Mp4Recorder::start(config)?)),
        ExportFormat::Gif => Ok(Box::new(GifEncoder::create(&config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/b.mp4")).unwrap(), ExportFormat::Mp4);
        assert_eq!(ExportFormat::from_path(Path::new("b.GIF")).unwrap(), ExportFormat::Gif);
        assert!(matches!(
            ExportFormat::from_path(Path::new("b.avi")),
            Err(ExportError::UnsupportedFormat(ext)) if ext == "avi"
        ));
    }

    #[test]
    fn test_gif_always_available() {
        assert!(ExportFormat::Gif.is_available());
        assert_eq!(ExportFormat::Mp4.is_available(), cfg!(feature = "video"));
    }
}
