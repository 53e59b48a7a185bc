mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use backlog_core::BacklogService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(service: BacklogService) -> Router {
    let api = Router::new()
        // Workspace
        .route("/workspace", get(handlers::get_workspace).put(handlers::switch_workspace))
        .route("/refresh", post(handlers::invalidate_all))
        // Products
        .route("/products", get(handlers::list_products))
        .route("/products/{product}/items", get(handlers::list_items))
        .route("/products/{product}/items/{id}", get(handlers::get_item))
        .route("/products/{product}/tree", get(handlers::get_tree))
        .route("/products/{product}/kanban", get(handlers::get_kanban))
        .route("/products/{product}/refresh", post(handlers::refresh_product))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
