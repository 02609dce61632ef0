pub mod gemini;
pub mod recommendation;

pub use gemini::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Part,
};
pub use recommendation::{
    is_image_type, FileInfo, ImageAttachment, Recommendation, RecommendationRequest,
    RecommendationSet, MAX_IMAGES, MAX_IMAGE_BYTES, MISSING_INPUT_MESSAGE,
};
