//! Order records and their request bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A customer order, as stored in the order table.
///
/// `order` is kept opaque: it usually lists burger ids and quantities, but
/// nothing checks those ids against the burger table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Random (v4) identifier, assigned on creation.
    pub id: String,
    pub customer: String,
    pub order: Value,
    pub total_cost: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /api/order`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: String,
    pub order: Value,
    pub total_cost: f64,
    #[serde(default)]
    pub comment: String,
    pub address: String,
}

/// Body of `PUT /api/order/{id}`. The address is not updatable.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub customer: String,
    pub order: Value,
    pub total_cost: f64,
    #[serde(default)]
    pub comment: String,
}

impl Order {
    pub fn create(req: CreateOrderRequest, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer: req.customer,
            order: req.order,
            total_cost: req.total_cost,
            comment: req.comment,
            address: req.address,
            created_at: now,
            updated_at: now,
        }
    }
}
