use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossbeam_channel::{select, tick, Receiver, TryRecvError};

use maskguard_core::capture::capture_logger::StdoutCaptureLogger;
use maskguard_core::capture::capture_loop::{CaptureLoop, TickOutcome};
use maskguard_core::capture::domain::camera::{Camera, StreamConstraints};
use maskguard_core::capture::domain::frame_encoder::FrameEncoder;
use maskguard_core::capture::infrastructure::camera_factory::create_camera;
use maskguard_core::capture::infrastructure::ffmpeg_camera::default_device;
use maskguard_core::capture::infrastructure::image_folder_camera::ImageFolderCamera;
use maskguard_core::capture::infrastructure::jpeg_frame_encoder::JpegFrameEncoder;
use maskguard_core::detection::domain::mask_classifier::MaskClassifier;
use maskguard_core::detection::infrastructure::gemini_classifier::{
    GeminiClassifier, GeminiConfig,
};
use maskguard_core::detection::infrastructure::replay_classifier::ReplayClassifier;
use maskguard_core::feedback::domain::feedback_entry::Correction;
use maskguard_core::feedback::feedback_log::FeedbackLog;
use maskguard_core::feedback::infrastructure::json_file_store::JsonFileFeedbackStore;
use maskguard_core::overlay::domain::text_measurer::EstimatedTextMeasurer;
use maskguard_core::overlay::infrastructure::recording_surface::RecordingSurface;
use maskguard_core::overlay::infrastructure::snapshot_writer::SnapshotWriter;
use maskguard_core::overlay::overlay_renderer;
use maskguard_core::session::credential_gate::CredentialGate;
use maskguard_core::session::engine_session::{EngineSession, SessionEvent};
use maskguard_core::session::infrastructure::file_credential_store::FileCredentialStore;
use maskguard_core::shared::constants::{
    CAPTURE_HEIGHT, CAPTURE_WIDTH, DEFAULT_ENDPOINT, DEFAULT_MODEL, POLL_INTERVAL,
};
use maskguard_core::shared::detection_result::DetectionResult;

/// How often pending results are applied between capture ticks.
const RESULT_POLL: Duration = Duration::from_millis(100);
/// Upper bound on waiting for the final in-flight result before exiting.
const FINAL_RESULT_WAIT: Duration = Duration::from_secs(60);

/// Live mask-compliance detection backed by a hosted vision model.
#[derive(Parser)]
#[command(name = "maskguard", version)]
struct Cli {
    /// Vision model name.
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the vision model API.
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a vision engine API key (or confirm one is available).
    Activate {
        /// Key to store. Read from stdin when omitted and none is stored.
        #[arg(long)]
        key: Option<String>,
    },
    /// Run the live capture loop against a camera, video file or image folder.
    Demo {
        /// Camera device, video file or image folder (default: system camera).
        #[arg(long)]
        camera: Option<String>,

        /// Stop after this many dispatched frames.
        #[arg(long)]
        ticks: Option<usize>,

        /// Write an annotated image per result into this directory.
        #[arg(long)]
        snapshots: Option<PathBuf>,

        /// Replay recorded results from a JSON file instead of calling the model.
        #[arg(long)]
        replay: Option<PathBuf>,
    },
    /// Classify a single image and optionally write it with boxes drawn.
    Classify {
        /// Input image file.
        image: PathBuf,

        /// Annotated output image.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Review or clear flagged misclassifications.
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },
}

#[derive(Subcommand)]
enum FeedbackAction {
    /// List flagged entries, newest first.
    List,
    /// Delete every entry.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Write every flagged frame as a JPEG into a directory.
    Export { dir: PathBuf },
}

/// Lines typed during `demo`.
enum DemoInput {
    Flag(Correction),
    Quit,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = GeminiConfig {
        endpoint: cli.endpoint,
        model: cli.model,
        ..GeminiConfig::default()
    };

    match cli.command {
        Command::Activate { key } => run_activate(key),
        Command::Demo {
            camera,
            ticks,
            snapshots,
            replay,
        } => run_demo(config, camera, ticks, snapshots, replay),
        Command::Classify { image, output } => run_classify(config, &image, output.as_deref()),
        Command::Feedback { action } => run_feedback(action),
    }
}

fn run_activate(key: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(FileCredentialStore::default_location()?);
    let gate = CredentialGate::new(store.clone(), EngineSession::new());

    let key = match key {
        Some(key) => key,
        None if gate.check_on_startup() => {
            println!("Vision engine credential available.");
            return Ok(());
        }
        None => prompt("Enter vision engine API key: ")?,
    };

    gate.select(&key)?;
    println!("Vision engine activated. Key stored in {}", store.path().display());
    Ok(())
}

fn run_demo(
    config: GeminiConfig,
    camera: Option<String>,
    ticks: Option<usize>,
    snapshots: Option<PathBuf>,
    replay: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = EngineSession::new();
    let classifier: Arc<dyn MaskClassifier> = match replay {
        Some(path) => {
            log::info!("Replaying results from {}", path.display());
            session.activate();
            Arc::new(ReplayClassifier::from_file(&path)?)
        }
        None => build_classifier(config, &session)?,
    };
    let session_events = session.subscribe();

    let source = camera.unwrap_or_else(|| default_device().to_string());
    let surface = RecordingSurface::new(CAPTURE_WIDTH, CAPTURE_HEIGHT);
    let mut capture = CaptureLoop::new(
        create_camera(&source),
        classifier,
        Box::new(surface.clone()),
    )
    .with_logger(Box::new(StdoutCaptureLogger::new()));
    if let Err(e) = capture.start() {
        return Err(e.user_message().into());
    }

    let mut feedback =
        FeedbackLog::restore(Box::new(JsonFileFeedbackStore::default_location()?));
    let writer = SnapshotWriter::new();
    let input = spawn_stdin_reader();
    let mut stdin_open = true;
    let ticker = tick(POLL_INTERVAL);
    let mut dispatched = 0usize;

    println!("Streaming from {source}. Type p (false positive), n (false negative) or q (quit).");
    loop {
        select! {
            recv(ticker) -> _ => {
                if ticks.is_some_and(|limit| dispatched >= limit) {
                    if !capture.is_processing() {
                        break;
                    }
                } else if capture.tick() == TickOutcome::Dispatched {
                    dispatched += 1;
                }
            }
            recv(session_events) -> event => {
                if let Ok(SessionEvent::Invalidated) = event {
                    eprintln!("Vision engine session expired. Run `maskguard activate` to select a key.");
                    break;
                }
            }
            default(RESULT_POLL) => {}
        }

        if let Some(result) = capture.drain_results() {
            report(&result, dispatched);
            save_snapshot(&writer, &surface, &capture, snapshots.as_deref(), dispatched);
        }

        while stdin_open {
            match input.try_recv() {
                Ok(DemoInput::Flag(correction)) => {
                    match feedback.record(capture.feedback_snapshot(), correction) {
                        Some(_) => println!("Thank you! This incident has been flagged for review."),
                        None => println!("Nothing to flag yet: wait for a result with detected faces."),
                    }
                }
                Ok(DemoInput::Quit) => {
                    capture.stop();
                    capture.logger().summary();
                    return Ok(());
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => stdin_open = false,
            }
        }
    }

    if capture.is_processing() && session.is_ready() {
        if let Some(result) = capture.wait_for_result(FINAL_RESULT_WAIT) {
            report(&result, dispatched);
            save_snapshot(&writer, &surface, &capture, snapshots.as_deref(), dispatched);
        }
    }
    capture.stop();
    capture.logger().summary();
    Ok(())
}

fn run_classify(
    config: GeminiConfig,
    image: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = EngineSession::new();
    let classifier = build_classifier(config, &session)?;

    let mut stream = ImageFolderCamera::new(image).acquire(&StreamConstraints::default())?;
    let frame = stream.latest_frame()?;
    stream.release();

    let encoded = JpegFrameEncoder::default().encode(&frame)?;
    let result = classifier.classify(&encoded);
    report(&result, 1);
    if !session.is_ready() {
        return Err("vision engine session expired, run `maskguard activate`".into());
    }

    if let Some(output) = output {
        let commands =
            overlay_renderer::render(&result, frame.width(), frame.height(), &EstimatedTextMeasurer);
        SnapshotWriter::new().write(output, &frame, &commands)?;
        log::info!("Output written to {}", output.display());
    }
    Ok(())
}

fn run_feedback(action: FeedbackAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileFeedbackStore::default_location()?;
    log::debug!("Feedback log at {}", store.path().display());
    let mut feedback = FeedbackLog::restore(Box::new(store));

    match action {
        FeedbackAction::List => {
            if feedback.is_empty() {
                println!("No flagged incidents yet.");
            }
            for entry in feedback.entries() {
                println!(
                    "{}  {}  [{}]  AI identified as {} but user disagreed",
                    entry.recorded_at(),
                    entry.id,
                    entry.user_correction.label(),
                    entry.detected_status
                );
            }
        }
        FeedbackAction::Clear { yes } => {
            let count = feedback.len();
            let cleared = feedback.clear_all(|| {
                yes || prompt("Are you sure you want to clear all logged feedback? [y/N] ")
                    .map(|answer| answer.eq_ignore_ascii_case("y"))
                    .unwrap_or(false)
            });
            if cleared {
                println!("Cleared {count} entries.");
            } else {
                println!("Nothing cleared.");
            }
        }
        FeedbackAction::Export { dir } => {
            let written = feedback.export_images(&dir)?;
            println!("Exported {} image(s) to {}", written.len(), dir.display());
        }
    }
    Ok(())
}

/// Remote classifier behind the credential gate. Fails when no key is set.
fn build_classifier(
    config: GeminiConfig,
    session: &Arc<EngineSession>,
) -> Result<Arc<dyn MaskClassifier>, Box<dyn std::error::Error>> {
    let store = Arc::new(FileCredentialStore::default_location()?);
    let gate = CredentialGate::new(store.clone(), Arc::clone(session));
    if !gate.check_on_startup() {
        return Err(
            "No vision engine credential. Run `maskguard activate` or set GEMINI_API_KEY.".into(),
        );
    }
    log::info!("Using model {} at {}", config.model, config.endpoint);
    Ok(Arc::new(GeminiClassifier::new(
        config,
        store,
        Arc::clone(session),
    )))
}

fn report(result: &DetectionResult, tick: usize) {
    if let Some(message) = &result.message {
        println!("[{tick}] {message}");
    } else if result.faces.is_empty() {
        println!("[{tick}] No faces detected");
    } else {
        for face in &result.faces {
            let b = face.bbox;
            println!(
                "[{tick}] {} at [{}, {}, {}, {}]",
                face.label(),
                b.ymin,
                b.xmin,
                b.ymax,
                b.xmax
            );
        }
    }
}

fn save_snapshot(
    writer: &SnapshotWriter,
    surface: &RecordingSurface,
    capture: &CaptureLoop,
    dir: Option<&Path>,
    tick: usize,
) {
    let (Some(dir), Some(frame)) = (dir, capture.last_frame()) else {
        return;
    };
    let path = dir.join(format!("tick_{tick:05}.png"));
    if let Err(e) = writer.write_encoded(&path, frame, &surface.commands()) {
        log::warn!("Failed to write snapshot {}: {e}", path.display());
    }
}

fn spawn_stdin_reader() -> Receiver<DemoInput> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let input = match line.trim() {
                "p" => DemoInput::Flag(Correction::FalsePositive),
                "n" => DemoInput::Flag(Correction::FalseNegative),
                "q" => DemoInput::Quit,
                "" => continue,
                other => {
                    eprintln!("Unknown command '{other}': use p, n or q");
                    continue;
                }
            };
            if tx.send(input).is_err() {
                break;
            }
        }
    });
    rx
}

fn prompt(question: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("{question}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.model.trim().is_empty() {
        return Err("Model name must not be empty".into());
    }
    if !cli.endpoint.starts_with("http://") && !cli.endpoint.starts_with("https://") {
        return Err(format!("Endpoint must be an http(s) URL, got '{}'", cli.endpoint).into());
    }
    match &cli.command {
        Command::Demo { ticks, replay, .. } => {
            if *ticks == Some(0) {
                return Err("--ticks must be at least 1".into());
            }
            if let Some(path) = replay {
                if !path.exists() {
                    return Err(format!("Replay file not found: {}", path.display()).into());
                }
            }
        }
        Command::Classify { image, .. } => {
            if !image.exists() {
                return Err(format!("Input file not found: {}", image.display()).into());
            }
        }
        Command::Activate { key: Some(key) } if key.trim().is_empty() => {
            return Err("--key must not be empty".into());
        }
        _ => {}
    }
    Ok(())
}
