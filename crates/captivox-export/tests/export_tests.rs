use captivox_core::{AnimationClock, AnimationParameters};
use captivox_export::{
    export, render_frame, CancelToken, ExportConfig, ExportError, ExportOutcome, ExportSession,
    ExportStep, FrameEncoder,
};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ── Helpers ──────────────────────────────────────────────────────

#[derive(Default)]
struct Recorded {
    frames: Vec<RgbaImage>,
    finished: bool,
    aborted: bool,
}

/// Encoder that remembers what it was given and writes a placeholder file.
struct RecordingEncoder {
    log: Arc<Mutex<Recorded>>,
}

impl RecordingEncoder {
    fn create(path: &PathBuf) -> (Box<dyn FrameEncoder>, Arc<Mutex<Recorded>>) {
        std::fs::write(path, b"partial").unwrap();
        let log = Arc::new(Mutex::new(Recorded::default()));
        (Box::new(Self { log: log.clone() }), log)
    }
}

impl FrameEncoder for RecordingEncoder {
    fn push_frame(&mut self, frame: &RgbaImage) -> Result<(), ExportError> {
        self.log.lock().unwrap().frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.log.lock().unwrap().finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.log.lock().unwrap().aborted = true;
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("captivox-{}-{}", std::process::id(), name))
}

fn small_params() -> AnimationParameters {
    AnimationParameters {
        halfmax: 5,
        num_dots: 6,
        ..Default::default()
    }
}

/// Same cycle length, but with enough motion that every frame differs.
fn moving_params() -> AnimationParameters {
    AnimationParameters {
        x_multiplier: 10,
        y_multiplier: 10,
        ..small_params()
    }
}

// ── 1. Frame sequence ────────────────────────────────────────────

#[test]
fn test_exports_one_full_cycle() {
    let path = temp_path("cycle.bin");
    let (encoder, log) = RecordingEncoder::create(&path);
    let params = moving_params();
    let mut session = ExportSession::with_encoder(
        encoder,
        &path,
        &params,
        ExportConfig::new(240, 200),
        CancelToken::new(),
    );

    let mut frame_numbers = Vec::new();
    let outcome = loop {
        match session.step().unwrap() {
            ExportStep::Frame(progress) => {
                assert_eq!(progress.total, 11);
                frame_numbers.push(progress.frame_no);
            }
            ExportStep::Done(outcome) => break outcome,
        }
    };

    assert_eq!(frame_numbers, (1..=11).collect::<Vec<u64>>());
    assert_eq!(outcome, ExportOutcome::Finished { path: path.clone(), frames: 11 });

    let log = log.lock().unwrap();
    assert_eq!(log.frames.len(), 11);
    for (frame_no, frame) in (1..=11).zip(&log.frames) {
        let expected = render_frame(&params, frame_no, 240, 200).unwrap();
        assert!(*frame == expected, "encoded frame {} differs from a direct render", frame_no);
    }
    // Consecutive frames really move
    assert!(log.frames.windows(2).all(|pair| pair[0] != pair[1]));
    assert!(log.finished);
    assert!(!log.aborted);
    drop(log);

    // Stepping a finished session keeps reporting the same outcome
    assert_eq!(session.step().unwrap(), ExportStep::Done(outcome));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_odd_dimensions_rounded_to_even() {
    let path = temp_path("odd.bin");
    let (encoder, log) = RecordingEncoder::create(&path);
    let mut session = ExportSession::with_encoder(
        encoder,
        &path,
        &small_params(),
        ExportConfig::new(101, 77),
        CancelToken::new(),
    );
    assert!(matches!(session.step().unwrap(), ExportStep::Frame(_)));
    let log = log.lock().unwrap();
    assert_eq!(log.frames.len(), 1);
    assert_eq!(log.frames[0].dimensions(), (100, 76));
    drop(log);
    drop(session);
    let _ = std::fs::remove_file(&path);
}

// ── 2. Cancellation ──────────────────────────────────────────────

#[test]
fn test_cancel_removes_partial_file() {
    let path = temp_path("cancel.bin");
    let (encoder, log) = RecordingEncoder::create(&path);
    let cancel = CancelToken::new();
    let mut session = ExportSession::with_encoder(
        encoder,
        &path,
        &small_params(),
        ExportConfig::new(32, 32),
        cancel.clone(),
    );

    let mut encoded = 0;
    let outcome = loop {
        match session.step().unwrap() {
            ExportStep::Frame(progress) => {
                encoded += 1;
                if progress.done == 3 {
                    cancel.cancel();
                }
            }
            ExportStep::Done(outcome) => break outcome,
        }
    };

    assert_eq!(outcome, ExportOutcome::Cancelled);
    assert_eq!(encoded, 3);
    assert!(!path.exists());
    let log = log.lock().unwrap();
    assert_eq!(log.frames.len(), 3);
    assert!(log.aborted);
    assert!(!log.finished);
}

// ── 3. Refused requests ──────────────────────────────────────────

#[test]
fn test_paused_export_refused() {
    let path = temp_path("paused.gif");
    let clock = AnimationClock::new(0, 3);
    let result = export(
        &path,
        &small_params(),
        &clock,
        ExportConfig::default(),
        CancelToken::new(),
        |_| {},
    );
    assert!(matches!(result, Err(ExportError::Paused)));
    assert!(!path.exists());

    let frozen = AnimationClock::new(35, 0);
    let result = export(
        &path,
        &small_params(),
        &frozen,
        ExportConfig::default(),
        CancelToken::new(),
        |_| {},
    );
    assert!(matches!(result, Err(ExportError::Paused)));
}

#[test]
fn test_invalid_parameters_refused() {
    let params = AnimationParameters { num_dots: 1, ..Default::default() };
    let result = export(
        temp_path("invalid.gif"),
        &params,
        &AnimationClock::default(),
        ExportConfig::default(),
        CancelToken::new(),
        |_| {},
    );
    assert!(matches!(result, Err(ExportError::InvalidParameters(_))));
}

#[test]
fn test_unknown_extension_refused() {
    let result = export(
        temp_path("movie.avi"),
        &small_params(),
        &AnimationClock::default(),
        ExportConfig::default(),
        CancelToken::new(),
        |_| {},
    );
    assert!(matches!(result, Err(ExportError::UnsupportedFormat(ext)) if ext == "avi"));
}

#[cfg(not(feature = "video"))]
#[test]
fn test_mp4_unavailable_is_informational() {
    // No extension means MP4
    let path = temp_path("movie");
    let err = export(
        &path,
        &small_params(),
        &AnimationClock::default(),
        ExportConfig::default(),
        CancelToken::new(),
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, ExportError::Unavailable("MP4", _)));
    assert!(err.is_informational());
    assert!(!path.with_extension("mp4").exists());
}

// ── 4. GIF output ────────────────────────────────────────────────

#[test]
fn test_gif_export_writes_every_frame() {
    let path = temp_path("cycle.gif");
    let clock = AnimationClock::default();
    let mut progress_calls = 0;
    let outcome = export(
        &path,
        &small_params(),
        &clock,
        ExportConfig::new(40, 40),
        CancelToken::new(),
        |_| progress_calls += 1,
    )
    .unwrap();

    assert_eq!(outcome, ExportOutcome::Finished { path: path.clone(), frames: 11 });
    assert_eq!(progress_calls, 11);
    // The caller's clock is untouched
    assert_eq!(clock.frame_no(), 1);

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!((decoder.width(), decoder.height()), (40, 40));

    let mut frames = 0;
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        // 35 ms per tick rounds to 4 hundredths of a second
        assert_eq!(frame.delay, 4);
        frames += 1;
    }
    assert_eq!(frames, 11);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_gif_cancel_removes_file() {
    let path = temp_path("cancelled.gif");
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let outcome = export(
        &path,
        &small_params(),
        &AnimationClock::default(),
        ExportConfig::new(24, 24),
        cancel,
        |progress| {
            if progress.done == 2 {
                trigger.cancel();
            }
        },
    )
    .unwrap();
    assert_eq!(outcome, ExportOutcome::Cancelled);
    assert!(!path.exists());
}

#[cfg(feature = "video")]
#[test]
fn test_mp4_plays_at_clock_rate() {
    let path = temp_path("rate.mp4");
    // 40 ms per tick is 25 fps
    let clock = AnimationClock::new(40, 3);
    let outcome = export(
        &path,
        &small_params(),
        &clock,
        ExportConfig::new(64, 64),
        CancelToken::new(),
        |_| {},
    )
    .unwrap();
    assert_eq!(outcome, ExportOutcome::Finished { path: path.clone(), frames: 11 });

    ffmpeg_next::init().unwrap();
    let input = ffmpeg_next::format::input(&path).unwrap();
    let stream = input.streams().best(ffmpeg_next::media::Type::Video).unwrap();
    let fps = f64::from(stream.avg_frame_rate());
    assert!((fps - 25.0).abs() < 0.01, "stream plays at {fps} fps");
    let seconds = stream.duration() as f64 * f64::from(stream.time_base());
    assert!((seconds - 0.44).abs() < 0.05, "stream lasts {seconds} s");
    assert_eq!(stream.frames(), 11);

    drop(input);
    std::fs::remove_file(&path).unwrap();
}
