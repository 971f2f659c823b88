//! Image upload and lookup handlers over the image bucket.

use crate::{
    errors::{AppError, ErrorKind},
    models::image::{
        ImageCreatedResponse, ImageUrlResponse, allowed_extension, content_type_for,
    },
    services::multipart::extract_file,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Request, State},
};
use tracing::{error, warn};

/// `GET /api/image`
///
/// Object store failures answer 404, like the other image routes.
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let urls = state
        .images
        .list_all(&state.image_bucket)
        .await
        .map_err(|_| AppError::new(ErrorKind::ObjectStore, "Could not find images"))?;

    Ok(Json(urls))
}

/// `GET /api/image/{image_name}`
///
/// Only answers with a URL for objects that actually exist.
pub async fn get_image_url(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> Result<Json<ImageUrlResponse>, AppError> {
    match state.images.exists(&state.image_bucket, &image_name).await {
        Ok(true) => Ok(Json(ImageUrlResponse {
            url: state.images.url_for(&state.image_bucket, &image_name),
        })),
        Ok(false) => Err(AppError::not_found(format!(
            "Could not find image with provided \"{}\"",
            image_name
        ))),
        Err(err) => {
            error!(error = %err, "Could not retrieve image");
            Err(AppError::store("Could not retrieve image"))
        }
    }
}

/// `POST /api/image`
///
/// Accepts a base64-encoded multipart body and stores its first file.
/// Files that are not jpg/jpeg/png are rejected before anything is written.
pub async fn create_image(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ImageCreatedResponse>, AppError> {
    let file = extract_file(request).await.map_err(|err| {
        warn!(error = %err, "rejected image upload");
        AppError::invalid_input("Invalid multipart body")
    })?;

    let Some(ext) = allowed_extension(&file.filename) else {
        warn!("rejected image upload {}: unsupported extension", file.filename);
        return Err(AppError::new(
            ErrorKind::InvalidFileType,
            "Invalid file extension",
        ));
    };

    let url = state
        .images
        .write(
            file.data,
            &file.filename,
            content_type_for(&ext),
            &state.image_bucket,
        )
        .await
        .map_err(|_| AppError::new(ErrorKind::ObjectStore, "Could not create image"))?;

    Ok(Json(ImageCreatedResponse {
        url,
        message: "The image is created",
    }))
}
