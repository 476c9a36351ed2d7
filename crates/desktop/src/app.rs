use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use iced::widget::{column, image, opaque, scrollable, stack};
use iced::{Element, Font, Length, Subscription, Task, Theme};

use maskguard_core::capture::capture_loop::{CaptureLoop, TickOutcome};
use maskguard_core::capture::infrastructure::camera_factory::create_camera_with_dwell;
use maskguard_core::detection::infrastructure::gemini_classifier::{
    GeminiClassifier, GeminiConfig,
};
use maskguard_core::feedback::domain::feedback_entry::{Correction, FeedbackEntry};
use maskguard_core::feedback::domain::feedback_store::FeedbackStore;
use maskguard_core::feedback::feedback_log::FeedbackLog;
use maskguard_core::feedback::infrastructure::json_file_store::JsonFileFeedbackStore;
use maskguard_core::feedback::infrastructure::memory_feedback_store::MemoryFeedbackStore;
use maskguard_core::overlay::infrastructure::recording_surface::RecordingSurface;
use maskguard_core::session::credential_gate::CredentialGate;
use maskguard_core::session::domain::credential_store::CredentialStore;
use maskguard_core::session::engine_session::{EngineSession, SessionEvent};
use maskguard_core::session::infrastructure::file_credential_store::FileCredentialStore;
use maskguard_core::session::infrastructure::memory_credential_store::MemoryCredentialStore;
use maskguard_core::shared::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH, POLL_INTERVAL};

use crate::sections::{self, carousel};
use crate::settings::{Appearance, Settings};
use crate::theme;

pub const DOCS_URL: &str = "https://ai.google.dev";
pub const FLAG_NOTICE: &str = "Thank you! This incident has been flagged for review.";
const REAUTHORIZE_MESSAGE: &str =
    "The vision engine no longer accepts the selected key. Select a key to continue.";

/// How often results, preview frames and session events are picked up.
const RESULT_POLL: Duration = Duration::from_millis(100);
const CAROUSEL_INTERVAL: Duration = Duration::from_secs(5);
const NOTICE_DURATION: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Buttons that animate on hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    Activate,
    HeroDemo,
    StartCamera,
    StopCamera,
    FlagPositive,
    FlagNegative,
    CtaStart,
    CtaReview,
    ClearAll,
}

#[derive(Debug, Clone)]
pub enum Message {
    KeyInputChanged(String),
    ActivateEngine,
    Tick,
    Poll,
    StartCamera,
    StopCamera,
    Flag(Correction),
    OpenAdmin,
    CloseAdmin,
    RequestClearAll,
    ConfirmClearAll,
    CancelClearAll,
    CarouselAdvance,
    CarouselSelect(usize),
    Hovered(Hover, bool),
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    OpenUrl(&'static str),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    pub settings: Settings,
    session: Arc<EngineSession>,
    session_events: Receiver<SessionEvent>,
    gate: CredentialGate,
    key_input: String,
    gate_error: Option<String>,
    capture: CaptureLoop,
    overlay: RecordingSurface,
    preview: Option<image::Handle>,
    feedback: FeedbackLog,
    thumbnails: HashMap<String, image::Handle>,
    notice_until: Option<Instant>,
    admin_open: bool,
    confirm_clear: bool,
    slide: usize,
    hovered: Option<Hover>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let session = EngineSession::new();
        let session_events = session.subscribe();

        let credentials: Arc<dyn CredentialStore> = match FileCredentialStore::default_location()
        {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!("{e}; the selected key will not be remembered");
                Arc::new(MemoryCredentialStore::new(None))
            }
        };
        let gate = CredentialGate::new(Arc::clone(&credentials), Arc::clone(&session));
        gate.check_on_startup();

        let config = GeminiConfig {
            model: settings.model.clone(),
            ..GeminiConfig::default()
        };
        let classifier = Arc::new(GeminiClassifier::new(
            config,
            credentials,
            Arc::clone(&session),
        ));

        let overlay = RecordingSurface::new(CAPTURE_WIDTH, CAPTURE_HEIGHT);
        let camera = create_camera_with_dwell(&settings.camera_source(), POLL_INTERVAL);
        let capture = CaptureLoop::new(camera, classifier, Box::new(overlay.clone()));

        let store: Box<dyn FeedbackStore> = match JsonFileFeedbackStore::default_location() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; feedback will only be kept for this run");
                Box::new(MemoryFeedbackStore::new())
            }
        };

        let mut app = Self {
            settings,
            session,
            session_events,
            gate,
            key_input: String::new(),
            gate_error: None,
            capture,
            overlay,
            preview: None,
            feedback: FeedbackLog::restore(store),
            thumbnails: HashMap::new(),
            notice_until: None,
            admin_open: false,
            confirm_clear: false,
            slide: 0,
            hovered: None,
        };
        app.refresh_thumbnails();
        (app, Task::none())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::KeyInputChanged(key) => {
                self.key_input = key;
                self.gate_error = None;
            }
            Message::ActivateEngine => match self.gate.select(self.key_input.trim()) {
                Ok(()) => {
                    self.key_input.clear();
                    self.gate_error = None;
                }
                Err(e) => {
                    log::warn!("Engine activation failed: {e}");
                    self.gate_error = Some(format!("Could not activate the engine: {e}"));
                }
            },
            Message::Tick => {
                if self.session.is_ready() {
                    if let TickOutcome::SkippedBusy = self.capture.tick() {
                        log::debug!("Previous frame still being analyzed");
                    }
                }
            }
            Message::Poll => self.poll(),
            Message::StartCamera => {
                // The failure text is kept by the capture loop and shown in
                // the demo panel.
                let _ = self.capture.start();
            }
            Message::StopCamera => {
                self.capture.stop();
                self.preview = None;
            }
            Message::Flag(correction) => {
                let snapshot = self.capture.feedback_snapshot();
                if self.feedback.record(snapshot, correction).is_some() {
                    self.refresh_thumbnails();
                    self.notice_until = Some(Instant::now() + NOTICE_DURATION);
                }
            }
            Message::OpenAdmin => {
                self.admin_open = true;
                self.confirm_clear = false;
            }
            Message::CloseAdmin => {
                self.admin_open = false;
                self.confirm_clear = false;
            }
            Message::RequestClearAll => {
                self.confirm_clear = true;
            }
            Message::ConfirmClearAll => {
                self.confirm_clear = false;
                if self.feedback.clear_all(|| true) {
                    self.thumbnails.clear();
                }
            }
            Message::CancelClearAll => {
                self.confirm_clear = false;
            }
            Message::CarouselAdvance => {
                self.slide = carousel::next_slide(self.slide);
            }
            Message::CarouselSelect(index) => {
                self.slide = index % carousel::SLIDES.len();
            }
            Message::Hovered(target, entered) => {
                self.hovered = hover_after(self.hovered, target, entered);
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::OpenUrl(url) => {
                if let Err(e) = open::that(url) {
                    log::warn!("Could not open {url}: {e}");
                }
            }
        }
        Task::none()
    }

    fn poll(&mut self) {
        // Invalidation only brings back the gate. The stream keeps running
        // and ticks pause until a key is selected again.
        while let Ok(event) = self.session_events.try_recv() {
            if event == SessionEvent::Invalidated {
                self.admin_open = false;
                self.gate_error = Some(REAUTHORIZE_MESSAGE.to_string());
            }
        }

        self.capture.drain_results();

        if self.capture.is_streaming() {
            if let Some(frame) = self.capture.preview_frame() {
                self.preview = Some(image::Handle::from_rgba(
                    frame.width(),
                    frame.height(),
                    frame.to_rgba(),
                ));
            }
        }

        if self
            .notice_until
            .is_some_and(|until| Instant::now() >= until)
        {
            self.notice_until = None;
        }
    }

    fn refresh_thumbnails(&mut self) {
        let entries = self.feedback.entries();
        self.thumbnails.retain(|id, _| entries.iter().any(|e| &e.id == id));
        for entry in entries {
            if self.thumbnails.contains_key(&entry.id) {
                continue;
            }
            match entry.image_bytes() {
                Ok(bytes) => {
                    self.thumbnails
                        .insert(entry.id.clone(), image::Handle::from_bytes(bytes));
                }
                Err(e) => log::warn!("Feedback entry {} has an unreadable image: {e}", entry.id),
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;

        if !self.session.is_ready() {
            return sections::gate::view(
                fs,
                &self.key_input,
                self.gate_error.as_deref(),
                self.hovered,
            );
        }

        let result = self.capture.last_result();
        let demo = sections::demo_panel::DemoState {
            streaming: self.capture.is_streaming(),
            processing: self.capture.is_processing(),
            preview: self.preview.as_ref(),
            overlay: &self.overlay,
            error: self.capture.error(),
            can_flag: result.is_some_and(|r| r.has_faces()),
            status: result.map(|r| r.status_summary()),
            notice: self.notice_until.map(|_| FLAG_NOTICE),
        };

        let page = column![
            sections::navbar::view(fs, self.feedback.len()),
            sections::hero::view(fs, self.hovered),
            sections::features::view(fs),
            sections::demo_panel::view(fs, demo, self.hovered),
            sections::carousel::view(fs, self.slide),
            sections::call_to_action::view(fs, self.hovered),
            sections::footer::view(fs, &self.settings),
        ]
        .spacing(0)
        .width(Length::Fill);

        let landing: Element<'_, Message> = scrollable(page).height(Length::Fill).into();

        if self.admin_open {
            let dashboard = sections::admin::view(
                fs,
                self.feedback.entries(),
                &self.thumbnails,
                self.confirm_clear,
                self.hovered,
            );
            stack![landing, opaque(dashboard)].into()
        } else {
            landing
        }
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![iced::time::every(RESULT_POLL).map(|_| Message::Poll)];
        if self.session.is_ready() {
            subscriptions
                .push(iced::time::every(CAROUSEL_INTERVAL).map(|_| Message::CarouselAdvance));
        }
        if self.capture.is_streaming() {
            subscriptions.push(iced::time::every(POLL_INTERVAL).map(|_| Message::Tick));
        }
        Subscription::batch(subscriptions)
    }
}

/// Tracks the one hovered button. Leaving a button only clears the state
/// when that button was the hovered one, so enter/exit races between
/// neighbours do not wipe the newer hover.
fn hover_after(current: Option<Hover>, target: Hover, entered: bool) -> Option<Hover> {
    if entered {
        Some(target)
    } else if current == Some(target) {
        None
    } else {
        current
    }
}

/// Sentence shown under each reviewed entry.
pub fn disagreement_line(entry: &FeedbackEntry) -> String {
    format!(
        "AI identified as {}, but user disagreed.",
        entry.detected_status
    )
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

pub fn bold() -> Font {
    Font {
        weight: iced::font::Weight::Bold,
        ..Font::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskguard_core::feedback::domain::feedback_entry::FeedbackSnapshot;
    use maskguard_core::shared::encoded_frame::EncodedFrame;
    use rstest::rstest;

    #[rstest]
    #[case(None, Hover::StartCamera, true, Some(Hover::StartCamera))]
    #[case(Some(Hover::StartCamera), Hover::StartCamera, false, None)]
    #[case(Some(Hover::StopCamera), Hover::StartCamera, false, Some(Hover::StopCamera))]
    #[case(Some(Hover::HeroDemo), Hover::CtaStart, true, Some(Hover::CtaStart))]
    fn test_hover_tracking(
        #[case] current: Option<Hover>,
        #[case] target: Hover,
        #[case] entered: bool,
        #[case] expected: Option<Hover>,
    ) {
        assert_eq!(hover_after(current, target, entered), expected);
    }

    #[test]
    fn test_disagreement_line_names_detected_status() {
        let entry = FeedbackEntry::from_snapshot(
            FeedbackSnapshot {
                image: EncodedFrame::from_base64("AAAA", 1, 1),
                detected_status: "Mask".into(),
            },
            Correction::FalsePositive,
        );
        assert_eq!(
            disagreement_line(&entry),
            "AI identified as Mask, but user disagreed."
        );
    }

    #[rstest]
    #[case(16.0, 1.0, 16.0)]
    #[case(16.0, 1.25, 20.0)]
    #[case(13.0, 0.8, 10.0)]
    fn test_scaled_rounds(#[case] base: f32, #[case] scale: f32, #[case] expected: f32) {
        assert_eq!(scaled(base, scale), expected);
    }
}
