//! Wire types for the `generateContent` REST call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::shared::detection_result::{BoundingBox, FaceDetection, MaskStatus};
use crate::shared::encoded_frame::EncodedFrame;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl GenerateContentRequest {
    /// Inline JPEG first, then the instruction, with strict JSON output.
    pub fn for_frame(frame: &EncodedFrame, prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: frame.as_base64().to_string(),
                        },
                    },
                    Part::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: faces_schema(),
            },
        }
    }
}

/// Output schema: every face must carry a status, a confidence and an
/// integer box with all four edges.
pub fn faces_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "faces": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "status": { "type": "STRING" },
                        "confidence": { "type": "NUMBER" },
                        "box": {
                            "type": "OBJECT",
                            "properties": {
                                "ymin": { "type": "INTEGER" },
                                "xmin": { "type": "INTEGER" },
                                "ymax": { "type": "INTEGER" },
                                "xmax": { "type": "INTEGER" }
                            },
                            "required": ["ymin", "xmin", "ymax", "xmax"]
                        }
                    },
                    "required": ["status", "confidence", "box"]
                }
            }
        },
        "required": ["faces"]
    })
}

#[derive(Deserialize, Debug, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, with all its text parts concatenated.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Deserialize, Debug)]
pub struct ErrorEnvelope {
    pub error: ApiError,
}

#[derive(Deserialize, Debug)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize, Debug)]
struct RawFaces {
    faces: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct RawFace {
    #[serde(default)]
    status: String,
    #[serde(default)]
    confidence: f64,
    #[serde(rename = "box")]
    bbox: BoundingBox,
}

/// Parses the model's structured text into faces.
///
/// Anything unparseable, or a payload without a `faces` array, is an empty
/// list rather than an error. A malformed entry is dropped on its own.
pub fn parse_faces(text: &str) -> Vec<FaceDetection> {
    match serde_json::from_str::<RawFaces>(text) {
        Ok(raw) => raw
            .faces
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<RawFace>(entry) {
                Ok(f) => Some(FaceDetection {
                    status: MaskStatus::from_remote(&f.status),
                    confidence: f.confidence.clamp(0.0, 1.0),
                    bbox: f.bbox,
                }),
                Err(e) => {
                    log::warn!("Skipping malformed face #{i} in classifier payload: {e}");
                    None
                }
            })
            .collect(),
        Err(e) => {
            log::warn!("Unusable classifier payload, treating as no faces: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_request_puts_image_before_prompt() {
        let frame = EncodedFrame::from_base64("QUJD", 640, 480);
        let body = serde_json::to_value(GenerateContentRequest::for_frame(&frame, "find faces"))
            .unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert_eq!(parts[1]["text"], "find faces");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_schema_requires_all_box_edges() {
        let schema = faces_schema();
        let face = &schema["properties"]["faces"]["items"];
        assert_eq!(face["required"], json!(["status", "confidence", "box"]));
        assert_eq!(
            face["properties"]["box"]["required"],
            json!(["ymin", "xmin", "ymax", "xmax"])
        );
        assert_eq!(face["properties"]["box"]["properties"]["xmin"]["type"], "INTEGER");
        assert_eq!(schema["required"], json!(["faces"]));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"faces\"" }, { "text": ": []}" }] } }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"faces\": []}"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_parse_faces_maps_status_and_box() {
        let faces = parse_faces(
            r#"{"faces":[
                {"status":"Mask","confidence":0.93,"box":{"ymin":100,"xmin":200,"ymax":400,"xmax":500}},
                {"status":"No Mask","confidence":0.6,"box":{"ymin":1,"xmin":2,"ymax":3,"xmax":4}}
            ]}"#,
        );
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].status, MaskStatus::Mask);
        assert_relative_eq!(faces[0].confidence, 0.93);
        assert_eq!(faces[0].bbox, BoundingBox::new(100, 200, 400, 500));
        assert_eq!(faces[1].status, MaskStatus::NoMask);
    }

    #[test]
    fn test_parse_faces_unexpected_status_is_no_mask() {
        let faces = parse_faces(
            r#"{"faces":[{"status":"Partially","confidence":0.5,"box":{"ymin":0,"xmin":0,"ymax":1,"xmax":1}}]}"#,
        );
        assert_eq!(faces[0].status, MaskStatus::NoMask);
    }

    #[test]
    fn test_parse_faces_clamps_confidence() {
        let faces = parse_faces(
            r#"{"faces":[{"status":"Mask","confidence":1.7,"box":{"ymin":0,"xmin":0,"ymax":1,"xmax":1}}]}"#,
        );
        assert_relative_eq!(faces[0].confidence, 1.0);
    }

    #[test]
    fn test_parse_faces_skips_only_the_malformed_entry() {
        let faces = parse_faces(
            r#"{"faces":[
                {"status":"Mask","confidence":null,"box":{"ymin":0,"xmin":0,"ymax":1,"xmax":1}},
                {"status":"No Mask","confidence":0.8,"box":{"ymin":10,"xmin":20,"ymax":30,"xmax":40}},
                {"status":"Mask","confidence":0.7,"box":{"ymin":1.5,"xmin":0,"ymax":2,"xmax":2}}
            ]}"#,
        );
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].status, MaskStatus::NoMask);
        assert_eq!(faces[0].bbox, BoundingBox::new(10, 20, 30, 40));
    }

    #[rstest]
    #[case::not_json("definitely not json")]
    #[case::missing_faces(r#"{"people": []}"#)]
    #[case::faces_not_array(r#"{"faces": 3}"#)]
    #[case::empty("")]
    fn test_parse_faces_defaults_to_empty(#[case] text: &str) {
        assert!(parse_faces(text).is_empty());
    }

    #[test]
    fn test_error_envelope_parses() {
        let env: ErrorEnvelope = serde_json::from_str(
            r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#,
        )
        .unwrap();
        assert_eq!(env.error.code, 404);
        assert_eq!(env.error.status, "NOT_FOUND");
        assert!(env.error.message.contains("entity was not found"));
    }
}
