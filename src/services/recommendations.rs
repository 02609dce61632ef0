use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData,
        Part, Recommendation, RecommendationRequest, RecommendationSet, MAX_IMAGES,
        MAX_IMAGE_BYTES, MISSING_INPUT_MESSAGE,
    },
    services::{prompt, providers::GenerativeProvider},
};

/// Generates travel recommendations for one composer submission
///
/// Checks the provider is configured, validates the request, sends a single
/// multimodal prompt and returns the decoded recommendations array. An empty
/// array from the model is passed through unchanged.
pub async fn get_recommendations(
    provider: Arc<dyn GenerativeProvider>,
    request: RecommendationRequest,
) -> AppResult<Vec<Recommendation>> {
    provider.ensure_configured()?;
    validate_request(&request)?;

    let payload = build_payload(&request);
    let response = provider.generate_content(&payload).await?;
    let recommendations = parse_recommendations(&response)?;

    tracing::info!(
        provider = provider.name(),
        count = recommendations.len(),
        "Recommendations generated"
    );

    Ok(recommendations)
}

/// Rejects requests the model cannot act on before any upstream call
pub fn validate_request(request: &RecommendationRequest) -> AppResult<()> {
    if !request.is_complete() {
        return Err(AppError::InvalidInput(MISSING_INPUT_MESSAGE.to_string()));
    }

    if request.images.len() > MAX_IMAGES {
        return Err(AppError::InvalidInput(format!(
            "You can upload a maximum of {} images.",
            MAX_IMAGES
        )));
    }

    for (position, image) in request.images.iter().enumerate() {
        let number = position + 1;

        if !image.is_image() {
            return Err(AppError::InvalidInput(format!(
                "Attachment {} is not an image (type \"{}\")",
                number,
                image.mime_type()
            )));
        }

        let size = image.decoded_len().map_err(|_| {
            AppError::InvalidInput(format!("Attachment {} is not valid base64", number))
        })?;

        if size > MAX_IMAGE_BYTES {
            return Err(AppError::InvalidInput(format!(
                "Attachment {} exceeds the {} MB limit",
                number,
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }
    }

    Ok(())
}

/// Prompt text first, then one inline part per image in upload order
pub fn build_payload(request: &RecommendationRequest) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(request.images.len() + 1);
    parts.push(Part::Text {
        text: prompt::recommendation_prompt(&request.city, &request.profile),
    });
    parts.extend(request.images.iter().map(|image| Part::InlineData {
        inline_data: InlineData {
            mime_type: image.mime_type().to_string(),
            data: image.payload().to_string(),
        },
    }));

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "explanation": { "type": "STRING" },
                        "activity": { "type": "STRING" }
                    },
                    "required": ["title", "explanation", "activity"]
                }
            }
        },
        "required": ["recommendations"]
    })
}

/// Pulls the JSON payload out of the first candidate's first text part
pub fn parse_recommendations(
    response: &GenerateContentResponse,
) -> AppResult<Vec<Recommendation>> {
    let text = response.first_text().ok_or_else(|| {
        AppError::InvalidResponse("no text in the first candidate".to_string())
    })?;

    let set: RecommendationSet = serde_json::from_str(text).map_err(|e| {
        tracing::warn!(error = %e, "Model output did not match the recommendations schema");
        AppError::InvalidResponse(format!("generated text is not the expected JSON ({})", e))
    })?;

    Ok(set.recommendations)
}
