use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Most images accepted in a single submission
pub const MAX_IMAGES: usize = 5;

/// Largest accepted image, measured on the decoded bytes
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Shown when a request lacks a destination or anything to profile
pub const MISSING_INPUT_MESSAGE: &str =
    "Please provide a profile description or upload images, and specify a city.";

/// Media type descriptor carried alongside each uploaded image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// One uploaded image, held as a data URL (`data:<mime>;base64,<payload>`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file: FileInfo,
    pub base64: String,
}

impl ImageAttachment {
    /// Encodes raw image bytes into a data URL attachment
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            file: FileInfo {
                mime_type: mime_type.to_string(),
            },
            base64: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.file.mime_type
    }

    pub fn is_image(&self) -> bool {
        is_image_type(&self.file.mime_type)
    }

    /// The base64 payload with any `data:...,` header removed
    pub fn payload(&self) -> &str {
        self.base64
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or(&self.base64)
    }

    /// Size of the image once the payload is decoded
    pub fn decoded_len(&self) -> Result<usize, base64::DecodeError> {
        STANDARD.decode(self.payload()).map(|bytes| bytes.len())
    }
}

/// True for any `image/*` media type
pub fn is_image_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Payload sent by the composer to the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub images: Vec<ImageAttachment>,
}

impl RecommendationRequest {
    /// A request needs a destination plus a profile text or at least one image
    pub fn is_complete(&self) -> bool {
        let has_subject = !self.profile.trim().is_empty() || !self.images.is_empty();
        has_subject && !self.city.trim().is_empty()
    }
}

/// One generated suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub explanation: String,
    pub activity: String,
}

/// JSON object the model is instructed to produce
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
}
