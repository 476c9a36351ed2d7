use std::time::Duration;

/// Cadence of the capture loop timer.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Side length of the virtual canvas that remote bounding boxes are expressed in.
pub const NORMALIZED_SCALE: f64 = 1000.0;

/// Capture raster: every frame is scaled to this size before encoding.
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

pub const JPEG_QUALITY: u8 = 80;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

pub const DETECTION_PROMPT: &str = "COMPUTER VISION TASK: Analyze this surveillance frame. \
Detect all faces and identify if they are wearing a safety mask correctly ('Mask') or not \
('No Mask'). Provide normalized bounding boxes [ymin, xmin, ymax, xmax] from 0-1000. \
Output JSON ONLY.";

pub const DISCONNECT_MESSAGE: &str = "Vision engine disconnected. Check connection.";
pub const CAMERA_DENIED_MESSAGE: &str = "Camera access denied. Please enable permissions.";

/// Substring of the remote error raised when the configured key no longer resolves.
pub const AUTH_INVALIDATION_MARKER: &str = "entity was not found";

pub const CREDENTIAL_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

pub const APP_DIR_NAME: &str = "MaskGuard";
pub const FEEDBACK_FILE_NAME: &str = "maskguard_feedback.json";
pub const CREDENTIAL_FILE_NAME: &str = "credential";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Box and label colors (`#22c55e` / `#ef4444`).
pub const MASK_COLOR: [u8; 3] = [0x22, 0xc5, 0x5e];
pub const NO_MASK_COLOR: [u8; 3] = [0xef, 0x44, 0x44];
