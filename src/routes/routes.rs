//! Defines routes for the burger, order and image resources.
//!
//! ## Structure
//! - **Burgers**
//!   - `GET    /api/burger` — list every burger
//!   - `POST   /api/burger` — create a burger
//!   - `GET    /api/burger/{id}` — fetch one burger
//!   - `PUT    /api/burger/{id}` — overwrite a burger
//!   - `DELETE /api/burger/{id}` — delete a burger
//!
//! - **Orders**: the same five routes under `/api/order`.
//!
//! - **Images**
//!   - `GET    /api/image` — list public URLs of every image
//!   - `POST   /api/image` — upload one image (base64-encoded multipart body)
//!   - `GET    /api/image/{image_name}` — public URL of an existing image

use crate::{
    config::AppConfig,
    handlers::{
        burger_handlers::{create_burger, delete_burger, get_burger, list_burgers, update_burger},
        health_handlers::{healthz, readyz},
        image_handlers::{create_image, get_image_url, list_images},
        order_handlers::{create_order, delete_order, get_order, list_orders, update_order},
    },
    state::AppState,
};
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the router for every API route.
///
/// CORS admits only the configured origin and the four CRUD methods, and
/// echoes back whatever request headers a preflight asks for.
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes(config: &AppConfig) -> Result<Router<AppState>> {
    let origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("invalid CORS origin `{}`", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    let router = Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Burgers
        .route("/api/burger", get(list_burgers).post(create_burger))
        .route(
            "/api/burger/{id}",
            get(get_burger).put(update_burger).delete(delete_burger),
        )
        // Orders
        .route("/api/order", get(list_orders).post(create_order))
        .route(
            "/api/order/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        // Images
        .route(
            "/api/image",
            get(list_images)
                .post(create_image)
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/api/image/{image_name}", get(get_image_url))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{send, test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn preflight_admits_configured_origin() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/burger")
                    .header(header::ORIGIN, "http://localhost:4000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:4000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "1800");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        for method in ["GET", "PUT", "POST", "DELETE"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
    }

    #[tokio::test]
    async fn preflight_echoes_requested_headers() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/image")
                    .header(header::ORIGIN, "http://localhost:4000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(
                        header::ACCESS_CONTROL_REQUEST_HEADERS,
                        "content-type,x-requested-with",
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type,x-requested-with"
        );
    }

    #[tokio::test]
    async fn other_origins_get_no_cors_headers() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/burger")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = test_app();
        let (status, _) = send(
            &app.router,
            Request::builder()
                .uri("/api/drinks")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
