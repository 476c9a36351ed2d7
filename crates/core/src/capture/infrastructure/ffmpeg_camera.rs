use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;

use crate::capture::domain::camera::{Camera, CameraError, CameraStream, StreamConstraints};
use crate::shared::frame::Frame;

/// Where an ffmpeg-backed camera reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FfmpegSource {
    /// A capture device, opened through the platform's input device format.
    Device(String),
    /// A video file, played in real time and looped.
    File(PathBuf),
}

/// Live camera (or looping video file) decoded by ffmpeg.
///
/// Decoding runs on a grabber thread that owns the ffmpeg contexts and keeps
/// only the newest frame, so a slow consumer always sees a fresh picture.
pub struct FfmpegCamera {
    source: FfmpegSource,
}

impl FfmpegCamera {
    pub fn new(source: FfmpegSource) -> Self {
        Self { source }
    }

    pub fn device(name: impl Into<String>) -> Self {
        Self::new(FfmpegSource::Device(name.into()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FfmpegSource::File(path.into()))
    }
}

/// The capture device a bare `maskguard demo` opens on this platform.
pub fn default_device() -> &'static str {
    if cfg!(target_os = "macos") {
        "0"
    } else if cfg!(target_os = "windows") {
        "video=Integrated Camera"
    } else {
        "/dev/video0"
    }
}

fn device_format_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "avfoundation"
    } else if cfg!(target_os = "windows") {
        "dshow"
    } else {
        "v4l2"
    }
}

impl Camera for FfmpegCamera {
    fn acquire(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        ffmpeg_next::init().map_err(|e| CameraError::Unavailable(e.to_string()))?;
        log::debug!(
            "Requesting {:?}-facing stream at {}x{} from {}",
            constraints.facing,
            constraints.ideal_width,
            constraints.ideal_height,
            self.describe()
        );

        let latest = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = bounded::<Result<(), CameraError>>(1);

        let source = self.source.clone();
        let constraints = *constraints;
        let grabber_latest = Arc::clone(&latest);
        let grabber_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("camera-grabber".into())
            .spawn(move || {
                grab_frames(&source, &constraints, &grabber_latest, &grabber_stop, ready_tx)
            })
            .map_err(|e| CameraError::Unavailable(format!("failed to spawn grabber: {e}")))?;

        let opened = ready_rx
            .recv()
            .unwrap_or_else(|_| Err(CameraError::Unavailable("grabber thread exited".into())));
        if let Err(e) = opened {
            let _ = handle.join();
            return Err(e);
        }

        log::info!("Camera opened: {}", self.describe());
        Ok(Box::new(FfmpegStream {
            latest,
            stop,
            handle: Some(handle),
        }))
    }

    fn describe(&self) -> String {
        match &self.source {
            FfmpegSource::Device(name) => format!("{}:{name}", device_format_name()),
            FfmpegSource::File(path) => format!("file:{}", path.display()),
        }
    }
}

struct FfmpegStream {
    latest: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CameraStream for FfmpegStream {
    fn latest_frame(&mut self) -> Result<Frame, CameraError> {
        if self.handle.is_none() {
            return Err(CameraError::Unavailable("stream released".into()));
        }
        let latest = self
            .latest
            .lock()
            .map_err(|_| CameraError::Read("frame buffer poisoned".into()))?;
        latest.clone().ok_or(CameraError::NoFrame)
    }

    fn release(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Camera grabber thread panicked");
            }
            log::info!("Camera released");
        }
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// Grabber thread body. Reports the open result once through `ready`, then
/// decodes until asked to stop (or, for devices, until the device ends).
fn grab_frames(
    source: &FfmpegSource,
    constraints: &StreamConstraints,
    latest: &Mutex<Option<Frame>>,
    stop: &AtomicBool,
    ready: crossbeam_channel::Sender<Result<(), CameraError>>,
) {
    let mut ready = Some(ready);
    let mut sequence = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let mut input = match open_input(source, constraints) {
            Ok(input) => input,
            Err(e) => match ready.take() {
                Some(tx) => {
                    let _ = tx.send(Err(e));
                    return;
                }
                None => {
                    log::warn!("Camera reopen failed: {e}");
                    return;
                }
            },
        };
        if let Some(tx) = ready.take() {
            let _ = tx.send(Ok(()));
        }

        if let Err(e) = input.decode_into(latest, stop, &mut sequence) {
            log::warn!("Camera decode stopped: {e}");
            return;
        }
        if matches!(source, FfmpegSource::Device(_)) {
            log::info!("Camera device ended the stream");
            return;
        }
        log::debug!("Video source reached end, looping");
    }
}

struct OpenInput {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    /// Set for files so playback runs in real time instead of as fast as
    /// the decoder can go.
    frame_interval: Option<Duration>,
}

fn open_input(
    source: &FfmpegSource,
    constraints: &StreamConstraints,
) -> Result<OpenInput, CameraError> {
    let (ictx, realtime) = match source {
        FfmpegSource::File(path) => {
            let ictx = ffmpeg_next::format::input(path)
                .map_err(|e| map_open_error(&path.display().to_string(), e))?;
            (ictx, false)
        }
        FfmpegSource::Device(name) => (open_device(name, constraints)?, true),
    };

    let stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or_else(|| CameraError::Unavailable("no video stream found".into()))?;
    let stream_index = stream.index();
    let rate = stream.rate();
    let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
        .map_err(|e| CameraError::Unavailable(e.to_string()))?;
    let decoder = codec_ctx
        .decoder()
        .video()
        .map_err(|e| CameraError::Unavailable(e.to_string()))?;

    let (width, height) = (decoder.width(), decoder.height());
    let scaler = ffmpeg_next::software::scaling::Context::get(
        decoder.format(),
        width,
        height,
        ffmpeg_next::format::Pixel::RGB24,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| CameraError::Unavailable(e.to_string()))?;

    let frame_interval = if realtime || rate.numerator() <= 0 || rate.denominator() <= 0 {
        None
    } else {
        Some(Duration::from_secs_f64(
            rate.denominator() as f64 / rate.numerator() as f64,
        ))
    };

    Ok(OpenInput {
        ictx,
        decoder,
        scaler,
        stream_index,
        width,
        height,
        frame_interval,
    })
}

/// Opens a capture device, first asking for the ideal size and then taking
/// whatever the device offers.
fn open_device(
    name: &str,
    constraints: &StreamConstraints,
) -> Result<ffmpeg_next::format::context::Input, CameraError> {
    ffmpeg_next::device::register_all();
    let wanted = device_format_name();
    let format = ffmpeg_next::device::input::video()
        .find(|f| f.name() == wanted)
        .map(ffmpeg_next::format::format::Format::Input)
        .ok_or_else(|| CameraError::Unavailable(format!("ffmpeg lacks the {wanted} input")))?;

    let mut sized = ffmpeg_next::Dictionary::new();
    sized.set(
        "video_size",
        &format!("{}x{}", constraints.ideal_width, constraints.ideal_height),
    );

    let attempt = |options| ffmpeg_next::format::open_with(name, &format, options);
    let ctx = match attempt(sized) {
        Ok(ctx) => ctx,
        Err(first) => {
            log::debug!("Device rejected ideal size ({first}), retrying with defaults");
            attempt(ffmpeg_next::Dictionary::new()).map_err(|e| map_open_error(name, e))?
        }
    };

    match ctx {
        ffmpeg_next::format::context::Context::Input(input) => Ok(input),
        ffmpeg_next::format::context::Context::Output(_) => Err(CameraError::Unavailable(
            format!("{name} opened as an output"),
        )),
    }
}

fn map_open_error(name: &str, e: ffmpeg_next::Error) -> CameraError {
    let denied = matches!(
        e,
        ffmpeg_next::Error::Other { errno }
            if std::io::Error::from_raw_os_error(errno).kind() == std::io::ErrorKind::PermissionDenied
    );
    if denied {
        CameraError::PermissionDenied(format!("{name}: {e}"))
    } else {
        CameraError::Unavailable(format!("{name}: {e}"))
    }
}

impl OpenInput {
    /// Decodes until end of input or `stop`, publishing each frame.
    fn decode_into(
        &mut self,
        latest: &Mutex<Option<Frame>>,
        stop: &AtomicBool,
        sequence: &mut u64,
    ) -> Result<(), CameraError> {
        let mut next_due = Instant::now();
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        let mut rgb = ffmpeg_next::util::frame::video::Video::empty();

        for (stream, packet) in self.ictx.packets() {
            if stop.load(Ordering::Relaxed) {
                return Ok(());
            }
            if stream.index() != self.stream_index {
                continue;
            }
            if self.decoder.send_packet(&packet).is_err() {
                continue;
            }
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                self.scaler
                    .run(&decoded, &mut rgb)
                    .map_err(|e| CameraError::Read(e.to_string()))?;
                let pixels = packed_rgb(&rgb, self.width, self.height);
                let frame = Frame::new(pixels, self.width, self.height, *sequence);
                *sequence += 1;

                if let Some(interval) = self.frame_interval {
                    next_due += interval;
                    let now = Instant::now();
                    if next_due > now {
                        std::thread::sleep(next_due - now);
                    } else {
                        next_due = now;
                    }
                }
                match latest.lock() {
                    Ok(mut slot) => *slot = Some(frame),
                    Err(_) => return Err(CameraError::Read("frame buffer poisoned".into())),
                }
            }
        }
        Ok(())
    }
}

/// Copies an RGB24 ffmpeg frame into a tightly packed buffer (rows may carry
/// stride padding).
fn packed_rgb(rgb: &ffmpeg_next::util::frame::video::Video, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb.stride(0);
    let data = rgb.data(0);
    let row_bytes = width as usize * Frame::CHANNELS;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn create_test_video(path: &Path, num_frames: usize, width: u32, height: u32) {
        ffmpeg_next::init().unwrap();
        let fps = 25;
        let mut octx = ffmpeg_next::format::output(path).unwrap();
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
        let mut ost = octx.add_stream(Some(codec)).unwrap();
        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }
        let mut encoder = encoder_ctx
            .open_with(ffmpeg_next::Dictionary::new())
            .unwrap();
        ost.set_parameters(&encoder);
        octx.write_header().unwrap();
        let ost_time_base = octx.stream(0).unwrap().time_base();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::format::Pixel::YUV420P,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .unwrap();

        for i in 0..num_frames {
            let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
            );
            let stride = rgb_frame.stride(0);
            let data = rgb_frame.data_mut(0);
            for row in 0..height as usize {
                for col in 0..width as usize * 3 {
                    data[row * stride + col] = (i * 30 % 256) as u8;
                }
            }
            let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
            scaler.run(&rgb_frame, &mut yuv_frame).unwrap();
            yuv_frame.set_pts(Some(i as i64));
            encoder.send_frame(&yuv_frame).unwrap();
            let mut encoded = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut encoded).is_ok() {
                encoded.set_stream(0);
                encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
                encoded.write_interleaved(&mut octx).unwrap();
            }
        }
        encoder.send_eof().unwrap();
        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(ffmpeg_next::Rational(1, fps), ost_time_base);
            encoded.write_interleaved(&mut octx).unwrap();
        }
        octx.write_trailer().unwrap();
    }

    #[test]
    fn test_file_source_publishes_frames_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        create_test_video(&path, 10, 160, 120);

        let camera = FfmpegCamera::file(&path);
        let mut stream = camera.acquire(&StreamConstraints::default()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let frame = loop {
            match stream.latest_frame() {
                Ok(frame) => break frame,
                Err(CameraError::NoFrame) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(10))
                }
                Err(e) => panic!("no frame: {e}"),
            }
        };
        assert_eq!((frame.width(), frame.height()), (160, 120));
        assert_eq!(frame.data().len(), 160 * 120 * 3);

        stream.release();
        stream.release();
        assert!(stream.latest_frame().is_err());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = FfmpegCamera::file("/nonexistent/clip.mp4")
            .acquire(&StreamConstraints::default())
            .err()
            .unwrap();
        assert!(matches!(err, CameraError::Unavailable(_)));
    }

    #[test]
    fn test_describe_names_the_source() {
        assert_eq!(
            FfmpegCamera::file("/tmp/a.mp4").describe(),
            "file:/tmp/a.mp4"
        );
        assert!(FfmpegCamera::device("/dev/video3")
            .describe()
            .ends_with(":/dev/video3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_errno_maps_to_denied() {
        let err = map_open_error("/dev/video0", ffmpeg_next::Error::Other { errno: 13 });
        assert!(matches!(err, CameraError::PermissionDenied(_)));
        let err = map_open_error("/dev/video0", ffmpeg_next::Error::Other { errno: 2 });
        assert!(matches!(err, CameraError::Unavailable(_)));
    }
}
