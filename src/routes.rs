// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, like, product},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (products, likes, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store handle, config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let product_routes = Router::new()
        .route("/", get(product::list_products))
        .route("/{id}", get(product::get_product));

    let like_routes = Router::new()
        .route("/api/like", post(like::like_product))
        .route("/api/liked-products/{user_id}", get(like::get_liked_products));

    // No authentication layer: admin routes are open, as the like routes are.
    let admin_routes = Router::new()
        .route("/reset-likes-by-user", post(admin::reset_likes_by_user))
        .route("/reset-likes-by-product", post(admin::reset_likes_by_product))
        .route("/reconcile-likes", post(admin::reconcile_likes))
        .route("/likes", delete(admin::delete_like))
        .route("/likes/all", delete(admin::delete_all_likes));

    Router::new()
        .nest("/api/products", product_routes)
        .merge(like_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// `*` allows any origin; otherwise only the listed, parseable origins.
fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}
