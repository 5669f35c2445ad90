mod categories;
mod checkout;
mod products;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use minishop_core::Catalog;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

/// The enriched catalog, shared read-only across all requests.
pub type AppState = Arc<Catalog>;

/// Error served to clients as `{"message": ...}`.
///
/// The code never reaches the wire; it only selects the status.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "validation_error",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = if allowed_origin == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(allowed_origin.parse()?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Assemble the application router.
///
/// # Errors
///
/// Fails if `allowed_origin` is not a valid header value.
pub fn build_app(
    state: AppState,
    allowed_origin: &str,
    rate_limit: RateLimitState,
) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/checkout", post(checkout::submit_checkout))
        .route("/api/health", get(health))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));

    Ok(Router::new()
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors(allowed_origin)?)
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state))
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

#[must_use]
pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
