//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::require_jwt;
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login,
        handlers::get_record,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::RecordResponse,
        crate::api::types::HealthResponse,
        crate::error::ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "records", description = "Medical record lookup"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Historial Gateway API",
        version = "0.1.0",
        description = "Medical-record lookup API demonstrating Insecure Direct Object Reference",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes requiring a bearer token
    let record_routes = Router::new()
        .route("/api/historiales/:id", get(handlers::get_record))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_manager.clone(),
            require_jwt,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/health", get(handlers::health_check));

    Router::new()
        .merge(record_routes)
        .merge(public_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
