pub mod gemini_classifier;
pub mod gemini_protocol;
pub mod replay_classifier;
