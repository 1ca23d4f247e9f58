use crate::encoder::{EncoderConfig, FrameEncoder};
use crate::error::ExportError;
use image::RgbaImage;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Quantization effort passed to the GIF palette builder (1 best, 30 fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Looping animated GIF writer.
pub struct GifEncoder {
    encoder: Option<gif::Encoder<BufWriter<File>>>,
    width: u16,
    height: u16,
    /// Frame delay in hundredths of a second.
    delay: u16,
}

impl GifEncoder {
    pub fn create(config: &EncoderConfig) -> Result<Self, ExportError> {
        let width = gif_dimension(config.width)?;
        let height = gif_dimension(config.height)?;

        let file = File::create(&config.output_path)?;
        let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
            .map_err(|e| ExportError::Encoder(format!("failed to start GIF: {e}")))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| ExportError::Encoder(format!("failed to set GIF looping: {e}")))?;

        Ok(Self {
            encoder: Some(encoder),
            width,
            height,
            delay: delay_centiseconds(config.interval_ms),
        })
    }
}

fn gif_dimension(value: u32) -> Result<u16, ExportError> {
    match u16::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ExportError::Encoder(format!("GIF dimension {value} out of range"))),
    }
}

fn delay_centiseconds(interval_ms: u32) -> u16 {
    ((interval_ms as f64 / 10.0).round() as u16).max(1)
}

impl FrameEncoder for GifEncoder {
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<(), ExportError> {
        if frame.width() != self.width as u32 || frame.height() != self.height as u32 {
            return Err(ExportError::Encoder(format!(
                "frame is {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| ExportError::Encoder("GIF encoder already closed".to_string()))?;

        let mut pixels = frame.as_raw().clone();
        let mut gif_frame = gif::Frame::from_rgba_speed(self.width, self.height, &mut pixels, QUANTIZE_SPEED);
        gif_frame.delay = self.delay;
        encoder
            .write_frame(&gif_frame)
            .map_err(|e| ExportError::Encoder(format!("failed to write GIF frame: {e}")))
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        if let Some(encoder) = self.encoder.take() {
            let mut writer = encoder.into_inner()?;
            writer.flush()?;
        }
        Ok(())
    }

    fn abort(&mut self) {
        self.encoder.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_rounding() {
        assert_eq!(delay_centiseconds(35), 4);
        assert_eq!(delay_centiseconds(100), 10);
        assert_eq!(delay_centiseconds(1), 1);
    }

    #[test]
    fn test_dimension_limits() {
        assert!(gif_dimension(0).is_err());
        assert!(gif_dimension(70_000).is_err());
        assert_eq!(gif_dimension(400).unwrap(), 400);
    }
}
