//! AI product-description handler (admin).
//!
//! The image is uploaded to the media host first so the completion
//! provider fetches it by URL instead of receiving the raw payload.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::media::DESCRIPTIONS_FOLDER;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDescriptionRequest {
    #[serde(default)]
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateDescriptionResponse {
    pub description: String,
}

/// `POST /api/generate-description` - marketing copy for a product image.
pub async fn generate(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<GenerateDescriptionRequest>,
) -> Result<Json<GenerateDescriptionResponse>> {
    if body.image_base64.is_empty() {
        return Err(AppError::BadRequest("Image data is required".to_string()));
    }

    let uploaded = state
        .media()
        .upload_base64(&body.image_base64, DESCRIPTIONS_FOLDER)
        .await?;

    let description = state.ai().describe_image(&uploaded.secure_url).await?;

    Ok(Json(GenerateDescriptionResponse { description }))
}
