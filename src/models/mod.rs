//! Records stored by the API and the request/response bodies around them.
//!
//! Records serialize in `camelCase`, which is also the attribute naming used
//! in the tables, so a record and its stored item share one shape.

pub mod burger;
pub mod image;
pub mod order;

use chrono::Utc;
use serde::Serialize;

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Body returned by create/delete routes.
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }

    pub fn with_id(message: &'static str, id: impl Into<String>) -> Self {
        Self {
            message,
            id: Some(id.into()),
        }
    }
}
