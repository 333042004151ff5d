//! Upstream response shapes and image extraction.
//!
//! The image APIs have carried the generated bytes under several layouts
//! over time. Every layout we know about is a field of [`RawResponse`];
//! [`RawResponse::shapes`] lists the ones present in a fixed priority order
//! and [`extract_image`] takes the first shape that yields a non-empty
//! payload. A response carrying none of the known fields is rejected.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use genimage_mcp_common::error::Error;
use serde::Deserialize;

/// Field names of the known shapes, in extraction order.
pub const KNOWN_SHAPES: &[&str] = &["images", "image", "generatedImages", "predictions", "candidates"];

/// Upstream response, deserialized leniently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    /// `{"images": [...]}`
    pub images: Option<Vec<ImagePayload>>,
    /// `{"image": {...}}`
    pub image: Option<ImagePayload>,
    /// `{"generatedImages": [{"image": {"imageBytes": ...}}]}`
    #[serde(alias = "generated_images")]
    pub generated_images: Option<Vec<ImagePayload>>,
    /// Imagen `predict`: `{"predictions": [{"bytesBase64Encoded": ...}]}`
    pub predictions: Option<Vec<ImagePayload>>,
    /// Gemini `generateContent`: `{"candidates": [{"content": {"parts": [...]}}]}`
    pub candidates: Option<Vec<Candidate>>,
    /// Gemini prompt feedback, present when the prompt itself was blocked
    #[serde(alias = "prompt_feedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// An image object. Each upstream variant names the byte field differently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub data: Option<String>,
    #[serde(alias = "image_bytes")]
    pub image_bytes: Option<String>,
    #[serde(alias = "bytes_base64_encoded")]
    pub bytes_base64_encoded: Option<String>,
    /// Wrapper objects nest the actual image one level down.
    pub image: Option<Box<ImagePayload>>,
    #[serde(alias = "mime_type")]
    pub mime_type: Option<String>,
    /// Imagen reports why an image was filtered instead of returning it.
    #[serde(alias = "rai_filtered_reason")]
    pub rai_filtered_reason: Option<String>,
}

impl ImagePayload {
    /// First non-empty encoded byte field: `data`, `imageBytes`,
    /// `bytesBase64Encoded`, then the nested `image`.
    fn encoded_bytes(&self) -> Option<(&str, Option<&str>)> {
        [&self.data, &self.image_bytes, &self.bytes_base64_encoded]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(|s| (s, self.mime_type.as_deref()))
            .or_else(|| {
                self.image.as_deref().and_then(|inner| {
                    inner
                        .encoded_bytes()
                        .map(|(data, mime)| (data, mime.or(self.mime_type.as_deref())))
                })
            })
    }

    fn filtered_reason(&self) -> Option<&str> {
        self.rai_filtered_reason
            .as_deref()
            .or_else(|| self.image.as_deref().and_then(|i| i.filtered_reason()))
    }
}

/// Gemini response candidate.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(alias = "finish_reason")]
    pub finish_reason: Option<String>,
}

/// Gemini candidate content.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Gemini content part: text, inline data, or something we ignore.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    #[serde(alias = "inline_data")]
    pub inline_data: Option<ImagePayload>,
}

/// Gemini prompt feedback.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(alias = "block_reason")]
    pub block_reason: Option<String>,
}

/// One known layout found in a response.
#[derive(Debug, Clone, Copy)]
pub enum ResponseShape<'a> {
    Images(&'a [ImagePayload]),
    Image(&'a ImagePayload),
    GeneratedImages(&'a [ImagePayload]),
    Predictions(&'a [ImagePayload]),
    Candidates(&'a [Candidate]),
}

impl<'a> ResponseShape<'a> {
    /// Field name of this shape.
    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::Images(_) => "images",
            ResponseShape::Image(_) => "image",
            ResponseShape::GeneratedImages(_) => "generatedImages",
            ResponseShape::Predictions(_) => "predictions",
            ResponseShape::Candidates(_) => "candidates",
        }
    }

    /// Image payloads carried by this shape, in response order.
    fn payloads(&self) -> Vec<&'a ImagePayload> {
        match *self {
            ResponseShape::Images(list)
            | ResponseShape::GeneratedImages(list)
            | ResponseShape::Predictions(list) => list.iter().collect(),
            ResponseShape::Image(payload) => vec![payload],
            ResponseShape::Candidates(candidates) => candidates
                .iter()
                .filter_map(|c| c.content.as_ref())
                .flat_map(|content| content.parts.iter())
                .filter_map(|part| part.inline_data.as_ref())
                .collect(),
        }
    }
}

impl RawResponse {
    /// Known shapes present in this response, in extraction order.
    pub fn shapes(&self) -> Vec<ResponseShape<'_>> {
        let mut shapes = Vec::new();
        if let Some(images) = &self.images {
            shapes.push(ResponseShape::Images(images));
        }
        if let Some(image) = &self.image {
            shapes.push(ResponseShape::Image(image));
        }
        if let Some(generated) = &self.generated_images {
            shapes.push(ResponseShape::GeneratedImages(generated));
        }
        if let Some(predictions) = &self.predictions {
            shapes.push(ResponseShape::Predictions(predictions));
        }
        if let Some(candidates) = &self.candidates {
            shapes.push(ResponseShape::Candidates(candidates));
        }
        shapes
    }

    /// Text fragments the model returned alongside (or instead of) an image.
    pub fn text_fragments(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .flatten()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Explain why no image came back, from whatever the upstream reported.
    fn no_image_reason(&self) -> String {
        let mut reasons = Vec::new();

        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            reasons.push(format!("prompt blocked ({})", reason));
        }

        let filtered: Vec<&str> = self
            .shapes()
            .iter()
            .flat_map(|s| s.payloads())
            .filter_map(|p| p.filtered_reason())
            .collect();
        if !filtered.is_empty() {
            reasons.push(format!("filtered: {}", filtered.join("; ")));
        }

        for reason in self.candidates.iter().flatten().filter_map(|c| c.finish_reason.as_deref()) {
            if reason != "STOP" {
                reasons.push(format!("finish reason {}", reason));
            }
        }

        let text = self.text_fragments();
        if !text.is_empty() {
            reasons.push(format!("model replied with text only: {}", text.join(" ")));
        }

        if reasons.is_empty() {
            "the response contained no image data".to_string()
        } else {
            format!("the response contained no image data ({})", reasons.join(", "))
        }
    }
}

/// Image bytes pulled out of a response.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// Raw (base64-decoded) image bytes
    pub bytes: Vec<u8>,
    /// MIME type reported by the upstream, if any
    pub mime_type: Option<String>,
    /// Shape the bytes were found under
    pub shape: &'static str,
}

/// Extract the first available image from a response.
///
/// # Errors
/// - `Error::NoImage` if no known shape is present, or none carries bytes
/// - `Error::Decode` if the selected payload is not valid base64
pub fn extract_image(response: &RawResponse) -> Result<ExtractedImage, Error> {
    let shapes = response.shapes();
    if shapes.is_empty() {
        return Err(Error::no_image(format!(
            "unrecognized response shape, expected one of: {}",
            KNOWN_SHAPES.join(", ")
        )));
    }

    for shape in &shapes {
        for payload in shape.payloads() {
            let Some((encoded, mime_type)) = payload.encoded_bytes() else {
                continue;
            };
            let bytes = BASE64
                .decode(encoded)
                .map_err(|e| Error::decode(format!("invalid base64 in '{}' payload: {}", shape.name(), e)))?;
            if bytes.is_empty() {
                continue;
            }
            return Ok(ExtractedImage {
                bytes,
                mime_type: mime_type.map(str::to_string),
                shape: shape.name(),
            });
        }
    }

    Err(Error::no_image(response.no_image_reason()))
}
