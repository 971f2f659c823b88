//! HTTP handlers, one module per resource.

pub mod burger_handlers;
pub mod health_handlers;
pub mod image_handlers;
pub mod order_handlers;

use crate::{
    errors::AppError,
    services::table_store::{Document, StoreError, from_document},
};
use serde::de::DeserializeOwned;
use tracing::error;

/// Log a table store failure and turn it into the route's fixed 500 message.
fn store_failure(message: &'static str, err: StoreError) -> AppError {
    error!(error = %err, "{}", message);
    AppError::store(message)
}

/// Decode stored documents into records; a malformed row fails the request.
fn decode_all<T: DeserializeOwned>(
    documents: Vec<Document>,
    message: &'static str,
) -> Result<Vec<T>, AppError> {
    documents
        .into_iter()
        .map(from_document)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|err| store_failure(message, err))
}

fn decode_one<T: DeserializeOwned>(
    document: Document,
    message: &'static str,
) -> Result<T, AppError> {
    from_document(document).map_err(|err| store_failure(message, err))
}
