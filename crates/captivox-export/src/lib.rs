//! Offline rendering of animation frames and export to video files.
//!
//! Frames are rasterized on the CPU into [`image::RgbaImage`] buffers and
//! handed to a [`FrameEncoder`]. GIF output is always available; MP4 needs
//! the `video` feature (ffmpeg).

pub mod encoder;
pub mod error;
pub mod export;
pub mod gif_encoder;
pub mod raster;
pub mod recorder;

pub use encoder::{open_encoder, EncoderConfig, ExportFormat, FrameEncoder, DEFAULT_BITRATE};
pub use error::ExportError;
pub use export::{
    export, normalize_export_path, run_to_completion, CancelToken, ExportConfig, ExportOutcome,
    ExportProgress, ExportSession, ExportStep,
};
pub use gif_encoder::GifEncoder;
pub use raster::{render_frame, Canvas};
pub use recorder::Mp4Recorder;
