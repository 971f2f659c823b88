//! Burger CRUD handlers over the burger table.

use super::{decode_all, decode_one, store_failure};
use crate::{
    errors::AppError,
    models::{
        MessageResponse,
        burger::{Burger, CreateBurgerRequest, UpdateBurgerRequest, normalize_ingredients},
        now_millis,
    },
    services::table_store::{StoreError, UpdateExpression, to_document},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::info;

/// `GET /api/burger`
pub async fn list_burgers(State(state): State<AppState>) -> Result<Json<Vec<Burger>>, AppError> {
    const FAILURE: &str = "Could not retrieve burgers";

    let documents = state
        .tables
        .scan(&state.burger_table)
        .await
        .map_err(|err| store_failure(FAILURE, err))?;

    Ok(Json(decode_all(documents, FAILURE)?))
}

/// `GET /api/burger/{id}`
pub async fn get_burger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Burger>, AppError> {
    const FAILURE: &str = "Could not retrieve burger";

    let document = state
        .tables
        .get(&state.burger_table, &id)
        .await
        .map_err(|err| store_failure(FAILURE, err))?
        .ok_or_else(|| {
            AppError::not_found(format!("Could not find burger with provided \"{}\"", id))
        })?;

    Ok(Json(decode_one(document, FAILURE)?))
}

/// `POST /api/burger`
///
/// Responds with a confirmation and the generated id, not the full record.
pub async fn create_burger(
    State(state): State<AppState>,
    payload: Result<Json<CreateBurgerRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    const FAILURE: &str = "Could not create burger";

    let Json(req) = payload?;
    let burger = Burger::create(req, now_millis());
    let document = to_document(&burger).map_err(|err| store_failure(FAILURE, err))?;

    state
        .tables
        .put(&state.burger_table, document)
        .await
        .map_err(|err| store_failure(FAILURE, err))?;

    info!("created burger {}", burger.id);
    Ok(Json(MessageResponse::with_id(
        "The burger is created",
        burger.id,
    )))
}

/// `PUT /api/burger/{id}`
///
/// Overwrites name, price, ingredients and image, and bumps `updatedAt`.
/// Never creates a burger that does not exist yet.
pub async fn update_burger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBurgerRequest>, JsonRejection>,
) -> Result<Json<Burger>, AppError> {
    const FAILURE: &str = "Could not update burger";

    let Json(req) = payload?;
    let update = UpdateExpression::new()
        .set("name", req.name)
        .set("price", req.price)
        .set("ingredients", normalize_ingredients(&req.ingredients))
        .set("image", req.image)
        .set("updatedAt", now_millis());

    match state.tables.update(&state.burger_table, &id, &update).await {
        Ok(document) => Ok(Json(decode_one(document, FAILURE)?)),
        Err(StoreError::NotFound { .. }) => Err(AppError::not_found(format!(
            "Could not update burger with {}",
            id
        ))),
        Err(err) => Err(store_failure(FAILURE, err)),
    }
}

/// `DELETE /api/burger/{id}`
pub async fn delete_burger(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    match state.tables.delete(&state.burger_table, &id).await {
        Ok(()) => {
            info!("deleted burger {}", id);
            Ok(Json(MessageResponse::new("The burger is deleted")))
        }
        Err(StoreError::NotFound { .. }) => Err(AppError::not_found(format!(
            "Could not delete burger with {}",
            id
        ))),
        Err(err) => Err(store_failure("Could not delete burger", err)),
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{
        FailingTableStore, empty_request, json_request, router_with, send, test_app,
    };
    use crate::services::{memory::MemoryObjectStore, table_store::TableStore};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    async fn create_classic(router: &axum::Router) -> String {
        let (status, body) = send(
            router,
            json_request(
                "POST",
                "/api/burger",
                json!({"name": "Classic", "price": 5.99, "ingredients": "beef, lettuce ,tomato"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "The burger is created");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn created_burger_has_normalized_ingredients() {
        let app = test_app();
        let id = create_classic(&app.router).await;

        let uri = format!("/api/burger/{id}");
        let (status, burger) = send(&app.router, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(burger["id"], id.as_str());
        assert_eq!(burger["name"], "Classic");
        assert_eq!(burger["price"], 5.99);
        assert_eq!(burger["ingredients"], json!(["beef", "lettuce", "tomato"]));
        assert_eq!(burger["image"], "");
        assert_eq!(burger["createdAt"], burger["updatedAt"]);
    }

    #[tokio::test]
    async fn list_is_stable_across_repeated_reads() {
        let app = test_app();
        create_classic(&app.router).await;
        create_classic(&app.router).await;

        let (status, first) = send(&app.router, empty_request("GET", "/api/burger")).await;
        let (_, second) = send(&app.router, empty_request("GET", "/api/burger")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first.as_array().unwrap().len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_is_stable_across_repeated_reads() {
        let app = test_app();
        let id = create_classic(&app.router).await;
        let uri = format!("/api/burger/{id}");

        let (status, first) = send(&app.router, empty_request("GET", &uri)).await;
        let (_, second) = send(&app.router, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_table_lists_as_empty_array() {
        let app = test_app();
        let (status, body) = send(&app.router, empty_request("GET", "/api/burger")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn missing_burger_is_not_found() {
        let app = test_app();
        let (status, body) = send(&app.router, empty_request("GET", "/api/burger/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Could not find burger with provided \"nope\"");
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_returns_attributes() {
        let app = test_app();
        let id = create_classic(&app.router).await;

        let (status, body) = send(
            &app.router,
            json_request(
                "PUT",
                &format!("/api/burger/{id}"),
                json!({
                    "name": "Double",
                    "price": 7.5,
                    "ingredients": "beef,beef, cheese",
                    "image": "x.png"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["name"], "Double");
        assert_eq!(body["ingredients"], json!(["beef", "beef", "cheese"]));
        assert_eq!(body["image"], "x.png");
        assert!(body["updatedAt"].as_i64() >= body["createdAt"].as_i64());
    }

    #[tokio::test]
    async fn update_of_missing_burger_does_not_create_it() {
        let app = test_app();
        let (status, body) = send(
            &app.router,
            json_request(
                "PUT",
                "/api/burger/ghost",
                json!({"name": "Ghost", "price": 1.0, "ingredients": "air"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Could not update burger with ghost");
        assert!(app.tables.get("burgers", "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_is_not_found() {
        let app = test_app();
        let id = create_classic(&app.router).await;
        let uri = format!("/api/burger/{id}");

        let (status, body) = send(&app.router, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "The burger is deleted");

        let (status, body) = send(&app.router, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], format!("Could not delete burger with {id}"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_client_error() {
        let app = test_app();
        let (status, body) = send(
            &app.router,
            json_request("POST", "/api/burger", json!({"name": "NoPrice"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
        assert!(app.tables.scan("burgers").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_internal_errors_without_detail() {
        let app = test_app();
        let router = router_with(
            &app.config,
            Arc::new(FailingTableStore),
            Arc::new(MemoryObjectStore::new()),
        );

        let (status, body) = send(&router, empty_request("GET", "/api/burger")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Could not retrieve burgers"}));

        let (status, body) = send(
            &router,
            json_request(
                "POST",
                "/api/burger",
                json!({"name": "Classic", "price": 5.99, "ingredients": "beef"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Could not create burger"}));

        let (status, body) = send(&router, empty_request("DELETE", "/api/burger/x")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Could not delete burger"}));
    }
}
