//! Image response bodies and upload rules.

use serde::Serialize;

/// Extensions accepted by `POST /api/image`, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Serialize, Debug)]
pub struct ImageUrlResponse {
    pub url: String,
}

#[derive(Serialize, Debug)]
pub struct ImageCreatedResponse {
    pub url: String,
    pub message: &'static str,
}

/// The lowercase extension of `filename` when it is an accepted image type.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Content type stored alongside an uploaded image.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
