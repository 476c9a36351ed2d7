use std::sync::Arc;

use thiserror::Error;

use crate::detection::domain::mask_classifier::MaskClassifier;
use crate::detection::infrastructure::gemini_protocol::{
    parse_faces, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse,
};
use crate::session::domain::credential_store::CredentialStore;
use crate::session::engine_session::EngineSession;
use crate::shared::constants::{
    AUTH_INVALIDATION_MARKER, DEFAULT_ENDPOINT, DEFAULT_MODEL, DETECTION_PROMPT,
    DISCONNECT_MESSAGE,
};
use crate::shared::detection_result::DetectionResult;
use crate::shared::encoded_frame::EncodedFrame;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("no vision engine credential selected")]
    MissingCredential,
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("vision engine returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClassifierError {
    /// True when the remote side says the configured key or session no
    /// longer exists, which only re-authorization can fix.
    pub fn is_auth_invalidation(&self) -> bool {
        self.to_string()
            .to_lowercase()
            .contains(AUTH_INVALIDATION_MARKER)
    }
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub prompt: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DETECTION_PROMPT.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Classifies frames with a hosted Gemini vision model.
///
/// Builds a fresh HTTP client and re-reads the credential on every call, so a
/// newly selected key is used by the very next tick. Never retries.
pub struct GeminiClassifier {
    config: GeminiConfig,
    credentials: Arc<dyn CredentialStore>,
    session: Arc<EngineSession>,
}

impl GeminiClassifier {
    pub fn new(
        config: GeminiConfig,
        credentials: Arc<dyn CredentialStore>,
        session: Arc<EngineSession>,
    ) -> Self {
        Self {
            config,
            credentials,
            session,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn request(&self, frame: &EncodedFrame) -> Result<DetectionResult, ClassifierError> {
        let key = self
            .credentials
            .load()
            .ok_or(ClassifierError::MissingCredential)?;
        let url = self.config.url();
        let body = GenerateContentRequest::for_frame(frame, &self.config.prompt);

        let client = build_client(&url).map_err(|e| ClassifierError::Transport {
            url: url.clone(),
            source: e,
        })?;
        let response = client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .map_err(|e| ClassifierError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        let bytes = response.bytes().map_err(|e| ClassifierError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = serde_json::from_slice::<GenerateContentResponse>(&bytes)
            .ok()
            .and_then(|r| r.text())
            .unwrap_or_else(|| r#"{"faces": []}"#.to_string());

        Ok(DetectionResult::new(parse_faces(&text)))
    }
}

/// Loopback endpoints (local proxies, test doubles) bypass any system proxy.
fn build_client(url: &str) -> Result<reqwest::blocking::Client, reqwest::Error> {
    let builder = reqwest::blocking::Client::builder();
    let loopback = reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "127.0.0.1" || h == "localhost" || h == "[::1]"))
        .unwrap_or(false);
    if loopback {
        builder.no_proxy().build()
    } else {
        builder.build()
    }
}

impl MaskClassifier for GeminiClassifier {
    fn classify(&self, frame: &EncodedFrame) -> DetectionResult {
        match self.request(frame) {
            Ok(result) => {
                log::debug!("Classifier returned {} face(s)", result.faces.len());
                result
            }
            Err(e) => {
                log::error!("Vision engine error: {e}");
                if e.is_auth_invalidation() {
                    self.session.invalidate();
                }
                DetectionResult::failed(DISCONNECT_MESSAGE)
            }
        }
    }
}
