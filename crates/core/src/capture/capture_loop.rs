use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::capture::capture_logger::{CaptureLogger, NullCaptureLogger, TickEvent};
use crate::capture::domain::camera::{Camera, CameraError, CameraStream, StreamConstraints};
use crate::capture::domain::frame_encoder::FrameEncoder;
use crate::capture::domain::single_flight::SingleFlightSlot;
use crate::capture::infrastructure::jpeg_frame_encoder::JpegFrameEncoder;
use crate::detection::domain::mask_classifier::MaskClassifier;
use crate::feedback::domain::feedback_entry::FeedbackSnapshot;
use crate::overlay::domain::overlay_surface::OverlaySurface;
use crate::overlay::domain::text_measurer::{EstimatedTextMeasurer, TextMeasurer};
use crate::overlay::overlay_renderer;
use crate::shared::detection_result::DetectionResult;
use crate::shared::encoded_frame::EncodedFrame;
use crate::shared::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    NotStreaming,
    /// A classification is still in flight; this tick is dropped.
    SkippedBusy,
    Dispatched,
    /// No frame could be grabbed or encoded; nothing was sent.
    CaptureFailed,
}

/// A classification outcome tagged with the loop generation it was
/// dispatched under, together with the frame it was computed from.
struct Completed {
    generation: u64,
    frame: EncodedFrame,
    result: DetectionResult,
    classify_ms: f64,
}

/// Periodic capture → classify → overlay loop with single-flight dispatch.
///
/// The owner drives it: `tick()` on a fixed timer, `drain_results()` (or
/// `wait_for_result()`) on its own thread to apply finished classifications.
/// Each dispatched tick classifies on a short-lived worker thread that holds
/// the single-flight guard, so at most one call is ever outstanding and late
/// ticks are dropped rather than queued.
///
/// `stop()` bumps the generation; anything that completes afterwards for an
/// earlier generation is discarded without touching the overlay.
pub struct CaptureLoop {
    camera: Box<dyn Camera>,
    classifier: Arc<dyn MaskClassifier>,
    encoder: Box<dyn FrameEncoder>,
    surface: Box<dyn OverlaySurface>,
    measurer: Box<dyn TextMeasurer>,
    logger: Box<dyn CaptureLogger>,
    constraints: StreamConstraints,
    stream: Option<Box<dyn CameraStream>>,
    slot: SingleFlightSlot,
    generation: u64,
    results_tx: Sender<Completed>,
    results_rx: Receiver<Completed>,
    last_frame: Option<EncodedFrame>,
    last_result: Option<DetectionResult>,
    error: Option<String>,
}

impl CaptureLoop {
    pub fn new(
        camera: Box<dyn Camera>,
        classifier: Arc<dyn MaskClassifier>,
        surface: Box<dyn OverlaySurface>,
    ) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self {
            camera,
            classifier,
            encoder: Box::new(JpegFrameEncoder::default()),
            surface,
            measurer: Box::new(EstimatedTextMeasurer),
            logger: Box::new(NullCaptureLogger),
            constraints: StreamConstraints::default(),
            stream: None,
            slot: SingleFlightSlot::new(),
            generation: 0,
            results_tx,
            results_rx,
            last_frame: None,
            last_result: None,
            error: None,
        }
    }

    pub fn with_encoder(mut self, encoder: Box<dyn FrameEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn CaptureLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_constraints(mut self, constraints: StreamConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Swaps the frame source. Only takes effect on the next `start()`.
    pub fn set_camera(&mut self, camera: Box<dyn Camera>) {
        self.camera = camera;
    }

    pub fn state(&self) -> CaptureState {
        if self.stream.is_some() {
            CaptureState::Streaming
        } else {
            CaptureState::Idle
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.slot.is_busy()
    }

    /// The encoded frame behind the current result (what the classifier saw).
    /// A frame still being classified does not replace it until its result
    /// is applied.
    pub fn last_frame(&self) -> Option<&EncodedFrame> {
        self.last_frame.as_ref()
    }

    pub fn last_result(&self) -> Option<&DetectionResult> {
        self.last_result.as_ref()
    }

    /// The most recent user-visible camera error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn logger(&self) -> &dyn CaptureLogger {
        self.logger.as_ref()
    }

    /// Opens the camera. A no-op while already streaming.
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.stream.is_some() {
            return Ok(());
        }
        match self.camera.acquire(&self.constraints) {
            Ok(stream) => {
                log::info!("Capture started on {}", self.camera.describe());
                self.stream = Some(stream);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Camera acquisition failed: {e}");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Releases the camera, forgets the last result and frame, and clears
    /// the overlay. In-flight results from before the stop are discarded.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            log::info!("Capture stopped");
        }
        self.generation += 1;
        self.last_result = None;
        self.last_frame = None;
        self.surface.clear();
    }

    /// One timer tick: grab, encode and dispatch a frame if the slot is free.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(stream) = self.stream.as_mut() else {
            return TickOutcome::NotStreaming;
        };
        let Some(guard) = self.slot.try_acquire() else {
            self.logger.event(TickEvent::Skipped);
            return TickOutcome::SkippedBusy;
        };

        let t0 = Instant::now();
        let frame = match stream.latest_frame() {
            Ok(frame) => frame,
            Err(CameraError::NoFrame) => {
                log::debug!("Camera has no frame yet, skipping tick");
                return TickOutcome::CaptureFailed;
            }
            Err(e) => {
                log::warn!("Frame capture failed: {e}");
                return TickOutcome::CaptureFailed;
            }
        };
        self.logger.timing("capture", elapsed_ms(t0));

        let t1 = Instant::now();
        let encoded = match self.encoder.encode(&frame) {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("Frame encoding failed: {e}");
                return TickOutcome::CaptureFailed;
            }
        };
        self.logger.timing("encode", elapsed_ms(t1));

        let classifier = Arc::clone(&self.classifier);
        let tx = self.results_tx.clone();
        let generation = self.generation;
        let spawned = std::thread::Builder::new()
            .name("classify".into())
            .spawn(move || {
                let start = Instant::now();
                let result = classifier.classify(&encoded);
                let classify_ms = elapsed_ms(start);
                // Free the slot before reporting so a caller that saw the
                // result can dispatch again straight away.
                drop(guard);
                let _ = tx.send(Completed {
                    generation,
                    frame: encoded,
                    result,
                    classify_ms,
                });
            });
        if let Err(e) = spawned {
            log::warn!("Failed to spawn classification worker: {e}");
            return TickOutcome::CaptureFailed;
        }

        self.logger.event(TickEvent::Dispatched);
        log::debug!("Dispatched frame {} for classification", frame.sequence());
        TickOutcome::Dispatched
    }

    /// Applies every result that has arrived. Returns the last one applied.
    pub fn drain_results(&mut self) -> Option<DetectionResult> {
        let mut applied = None;
        while let Ok(completed) = self.results_rx.try_recv() {
            if let Some(result) = self.apply(completed) {
                applied = Some(result);
            }
        }
        applied
    }

    /// Blocks until the next result arrives (or `timeout`), then applies it.
    /// Returns `None` on timeout or when that result was stale.
    pub fn wait_for_result(&mut self, timeout: Duration) -> Option<DetectionResult> {
        match self.results_rx.recv_timeout(timeout) {
            Ok(completed) => self.apply(completed),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// A fresh frame for on-screen preview, straight from the stream.
    pub fn preview_frame(&mut self) -> Option<Frame> {
        self.stream.as_mut()?.latest_frame().ok()
    }

    /// The frame and verdict a user flag would refer to. Only available when
    /// the last result actually found faces.
    pub fn feedback_snapshot(&self) -> Option<FeedbackSnapshot> {
        let frame = self.last_frame.as_ref()?;
        let result = self.last_result.as_ref().filter(|r| r.has_faces())?;
        Some(FeedbackSnapshot {
            image: frame.clone(),
            detected_status: result.status_summary(),
        })
    }

    fn apply(&mut self, completed: Completed) -> Option<DetectionResult> {
        if completed.generation != self.generation || self.stream.is_none() {
            self.logger.event(TickEvent::Discarded);
            log::debug!("Discarding result from a stopped capture session");
            return None;
        }
        self.logger.timing("classify", completed.classify_ms);

        let (width, height) = self.surface.size();
        let commands =
            overlay_renderer::render(&completed.result, width, height, self.measurer.as_ref());
        self.surface.present(commands);
        self.last_frame = Some(completed.frame);
        self.last_result = Some(completed.result.clone());
        Some(completed.result)
    }
}

impl Drop for CaptureLoop {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
