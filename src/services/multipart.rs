//! Pulls a single uploaded file out of a base64-encoded multipart body.
//!
//! Upload bodies reach us base64-encoded (the gateway in front of the API
//! encodes binary payloads). The encoded body is read through axum's `Bytes`
//! extractor so the route's `DefaultBodyLimit` applies, and the decoded bytes
//! are handed to the multipart parser with the original headers and extensions.

use axum::{
    body::Body,
    extract::{
        FromRequest, Multipart, Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::BytesRejection,
    },
    http::header,
};
use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read request body: {0}")]
    Read(#[from] BytesRejection),
    #[error("request body is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("invalid multipart request: {0}")]
    Rejected(#[from] MultipartRejection),
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("multipart body contains no file part")]
    NoFile,
}

/// Standard alphabet, padding optional. Gateways differ on whether they pad.
const UPLOAD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The first file part of an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Decode `request`'s base64 body and return its first file part.
pub async fn extract_file(request: Request) -> Result<UploadedFile, ExtractError> {
    let mut headers = request.headers().clone();
    let extensions = request.extensions().clone();
    let encoded = Bytes::from_request(request, &()).await?;
    // Line-wrapped (MIME style) bodies carry CRLFs between chunks.
    let compact: Vec<u8> = encoded
        .iter()
        .copied()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    let decoded = UPLOAD_BASE64.decode(compact)?;

    headers.remove(header::CONTENT_LENGTH);
    let mut request = Request::new(Body::from(decoded));
    *request.headers_mut() = headers;
    *request.extensions_mut() = extensions;
    let mut multipart = Multipart::from_request(request, &()).await?;

    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;
        return Ok(UploadedFile { filename, data });
    }

    Err(ExtractError::NoFile)
}
