//! Shared state handed to every handler.

use std::sync::Arc;

use crate::services::{object_store::ImageStore, table_store::TableStore};

/// Store handles plus the names of the tables and bucket they address.
///
/// Built once at start-up; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<dyn TableStore>,
    pub images: ImageStore,
    pub burger_table: String,
    pub order_table: String,
    pub image_bucket: String,
}
