//! Order CRUD handlers over the order table.

use super::{decode_all, decode_one, store_failure};
use crate::{
    errors::AppError,
    models::{
        MessageResponse, now_millis,
        order::{CreateOrderRequest, Order, UpdateOrderRequest},
    },
    services::table_store::{StoreError, UpdateExpression, to_document},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::info;

/// `GET /api/order`
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    const FAILURE: &str = "Could not retrieve orders";

    let documents = state
        .tables
        .scan(&state.order_table)
        .await
        .map_err(|err| store_failure(FAILURE, err))?;

    Ok(Json(decode_all(documents, FAILURE)?))
}

/// `GET /api/order/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    const FAILURE: &str = "Could not retrieve order";

    let document = state
        .tables
        .get(&state.order_table, &id)
        .await
        .map_err(|err| store_failure(FAILURE, err))?
        .ok_or_else(|| {
            AppError::not_found(format!("Could not find order with provided \"{}\"", id))
        })?;

    Ok(Json(decode_one(document, FAILURE)?))
}

/// `POST /api/order`
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    const FAILURE: &str = "Could not create order";

    let Json(req) = payload?;
    let order = Order::create(req, now_millis());
    let document = to_document(&order).map_err(|err| store_failure(FAILURE, err))?;

    state
        .tables
        .put(&state.order_table, document)
        .await
        .map_err(|err| store_failure(FAILURE, err))?;

    info!("created order {} for {}", order.id, order.customer);
    Ok(Json(MessageResponse::with_id("The order is created", order.id)))
}

/// `PUT /api/order/{id}`
///
/// Overwrites customer, order, totalCost and comment; the delivery address
/// is fixed once the order is placed.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    const FAILURE: &str = "Could not update order";

    let Json(req) = payload?;
    let update = UpdateExpression::new()
        .set("comment", req.comment)
        .set("customer", req.customer)
        .set("order", req.order)
        .set("totalCost", req.total_cost)
        .set("updatedAt", now_millis());

    match state.tables.update(&state.order_table, &id, &update).await {
        Ok(document) => Ok(Json(decode_one(document, FAILURE)?)),
        Err(StoreError::NotFound { .. }) => Err(AppError::not_found(format!(
            "Could not update order with {}",
            id
        ))),
        Err(err) => Err(store_failure(FAILURE, err)),
    }
}

/// `DELETE /api/order/{id}`
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    match state.tables.delete(&state.order_table, &id).await {
        Ok(()) => {
            info!("deleted order {}", id);
            Ok(Json(MessageResponse::new("The order is deleted")))
        }
        Err(StoreError::NotFound { .. }) => Err(AppError::not_found(format!(
            "Could not delete order with {}",
            id
        ))),
        Err(err) => Err(store_failure("Could not delete order", err)),
    }
}
