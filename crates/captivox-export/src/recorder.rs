use crate::encoder::{EncoderConfig, FrameEncoder};
use crate::error::ExportError;
use image::RgbaImage;
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};

/// A single rendered frame handed to the encoder thread.
pub struct CapturedFrame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// H.264 MP4 writer backed by ffmpeg.
///
/// Frames are encoded on a helper thread fed through a small bounded
/// channel, so rendering the next frame overlaps with encoding the last.
pub struct Mp4Recorder {
    frame_tx: Option<SyncSender<CapturedFrame>>,
    thread: Option<JoinHandle<Result<(), String>>>,
}

impl Mp4Recorder {
    /// Start a recording session. Spawns the encoder thread.
    pub fn start(config: EncoderConfig) -> Result<Self, ExportError> {
        if !cfg!(feature = "video") {
            return Err(ExportError::Unavailable(
                "MP4",
                "rebuild with the `video` feature (ffmpeg) or export a .gif",
            ));
        }

        let (tx, rx) = mpsc::sync_channel::<CapturedFrame>(4);

        let thread = thread::Builder::new()
            .name("captivox-recorder".to_string())
            .spawn(move || encode_loop(config, rx))?;

        Ok(Self {
            frame_tx: Some(tx),
            thread: Some(thread),
        })
    }

    fn join(&mut self) -> Result<(), ExportError> {
        // Dropping the sender tells the encoder thread to flush and finish
        self.frame_tx.take();
        match self.thread.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ExportError::Encoder("recorder thread panicked".to_string()))?
                .map_err(ExportError::Encoder),
            None => Ok(()),
        }
    }
}

impl FrameEncoder for Mp4Recorder {
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<(), ExportError> {
        let tx = self
            .frame_tx
            .as_ref()
            .ok_or_else(|| ExportError::Encoder("recorder already stopped".to_string()))?;
        let captured = CapturedFrame {
            pixels: frame.as_raw().clone(),
            width: frame.width(),
            height: frame.height(),
        };
        if tx.send(captured).is_err() {
            // The encoder thread exited early; surface its error
            self.join()?;
            return Err(ExportError::Encoder("recorder stopped unexpectedly".to_string()));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.join()
    }

    fn abort(&mut self) {
        if let Err(e) = self.join() {
            log::debug!("recorder error while aborting: {}", e);
        }
    }
}

impl Drop for Mp4Recorder {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.abort();
        }
    }
}

#[cfg(feature = "video")]
fn encode_loop(config: EncoderConfig, rx: mpsc::Receiver<CapturedFrame>) -> Result<(), String> {
    use ffmpeg_next::{codec, format, software, Rational};

    ffmpeg_next::init().map_err(|e| format!("ffmpeg init failed: {}", e))?;

    let mut octx = format::output(&config.output_path)
        .map_err(|e| format!("Failed to create output context: {}", e))?;
    let global_header = octx.format().flags().contains(format::Flags::GLOBAL_HEADER);

    let h264 = ffmpeg_next::encoder::find(codec::Id::H264)
        .ok_or_else(|| "H264 codec not found".to_string())?;

    // One tick of the animation clock per frame
    let interval = config.interval_ms.max(1) as i32;
    let encoder_time_base = Rational::new(interval, 1000);

    let (mut encoder, stream_index) = {
        let mut ost = octx
            .add_stream(h264)
            .map_err(|e| format!("Failed to add stream: {}", e))?;

        let mut encoder = codec::context::Context::new_with_codec(h264)
            .encoder()
            .video()
            .map_err(|e| format!("Failed to get video encoder: {}", e))?;
        encoder.set_width(config.width);
        encoder.set_height(config.height);
        encoder.set_format(format::Pixel::YUV420P);
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(Rational::new(1000, interval)));
        encoder.set_bit_rate(config.bitrate);
        if global_header {
            encoder.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder
            .open_as(h264)
            .map_err(|e| format!("Failed to open encoder: {}", e))?;
        ost.set_parameters(&encoder);
        ost.set_time_base(encoder_time_base);
        ost.set_avg_frame_rate(Rational::new(1000, interval));
        (encoder, ost.index())
    };

    octx.write_header()
        .map_err(|e| format!("Failed to write header: {}", e))?;
    // The muxer may pick its own timescale while writing the header
    let stream_time_base = octx
        .stream(stream_index)
        .map(|s| s.time_base())
        .ok_or_else(|| "output stream missing after header".to_string())?;

    let mut sws_ctx = software::scaling::Context::get(
        format::Pixel::RGBA,
        config.width,
        config.height,
        format::Pixel::YUV420P,
        config.width,
        config.height,
        software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| format!("Failed to create scaler: {}", e))?;

    let mut frame_idx: i64 = 0;

    while let Ok(captured) = rx.recv() {
        let mut src_frame =
            ffmpeg_next::frame::Video::new(format::Pixel::RGBA, captured.width, captured.height);
        // Frame rows may be padded past width * 4
        let stride = src_frame.stride(0);
        let row_len = captured.width as usize * 4;
        for (row, src) in captured.pixels.chunks_exact(row_len).enumerate() {
            let start = row * stride;
            src_frame.data_mut(0)[start..start + row_len].copy_from_slice(src);
        }

        let mut dst_frame =
            ffmpeg_next::frame::Video::new(format::Pixel::YUV420P, config.width, config.height);

        sws_ctx
            .run(&src_frame, &mut dst_frame)
            .map_err(|e| format!("Scaling failed: {}", e))?;

        dst_frame.set_pts(Some(frame_idx));
        frame_idx += 1;

        encoder
            .send_frame(&dst_frame)
            .map_err(|e| format!("Send frame failed: {}", e))?;
        write_packets(&mut encoder, &mut octx, stream_index, encoder_time_base, stream_time_base)?;
    }

    // Flush encoder
    encoder
        .send_eof()
        .map_err(|e| format!("Send EOF failed: {}", e))?;
    write_packets(&mut encoder, &mut octx, stream_index, encoder_time_base, stream_time_base)?;

    octx.write_trailer()
        .map_err(|e| format!("Failed to write trailer: {}", e))?;

    log::info!("{} frames encoded to {:?}", frame_idx, config.output_path);
    Ok(())
}

/// Drain encoded packets into the muxer, converting timestamps from the
/// encoder's time base to the stream's.
#[cfg(feature = "video")]
fn write_packets(
    encoder: &mut ffmpeg_next::encoder::video::Encoder,
    octx: &mut ffmpeg_next::format::context::Output,
    stream_index: usize,
    encoder_time_base: ffmpeg_next::Rational,
    stream_time_base: ffmpeg_next::Rational,
) -> Result<(), String> {
    let mut packet = ffmpeg_next::Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(encoder_time_base, stream_time_base);
        packet
            .write_interleaved(octx)
            .map_err(|e| format!("Write packet failed: {}", e))?;
    }
    Ok(())
}

#[cfg(not(feature = "video"))]
fn encode_loop(_config: EncoderConfig, _rx: mpsc::Receiver<CapturedFrame>) -> Result<(), String> {
    Err("MP4 recording requires the 'video' feature (ffmpeg-next)".to_string())
}

#[cfg(all(test, not(feature = "video")))]
mod tests {
    use super::*;

    #[test]
    fn test_mp4_unavailable_without_video_feature() {
        let config = EncoderConfig {
            output_path: std::env::temp_dir().join("captivox-never-written.mp4"),
            width: 16,
            height: 16,
            interval_ms: 35,
            bitrate: crate::encoder::DEFAULT_BITRATE,
        };
        let err = Mp4Recorder::start(config).err().expect("start must fail");
        assert!(err.is_informational());
    }
}
