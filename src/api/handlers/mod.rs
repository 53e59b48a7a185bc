use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use backlog_core::models::*;
use backlog_core::{BacklogError, BacklogService};
use serde::{Deserialize, Serialize};

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Cache errors are all caused by the request itself.
fn request_error(e: BacklogError) -> (StatusCode, String) {
    let msg = e.to_string();
    tracing::warn!("Rejected request: {}", msg);
    (StatusCode::BAD_REQUEST, msg)
}

/// Run a blocking cache call off the async runtime.
async fn run_blocking<T, F>(service: BacklogService, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(BacklogService) -> backlog_core::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(service))
        .await
        .map_err(internal_error)?
        .map_err(request_error)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Workspace
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchWorkspaceInput {
    pub path: String,
}

pub async fn get_workspace(State(service): State<BacklogService>) -> ApiResult<Json<WorkspaceInfo>> {
    run_blocking(service, |s| Ok(s.workspace_info())).await.map(Json)
}

pub async fn switch_workspace(
    State(service): State<BacklogService>,
    Json(input): Json<SwitchWorkspaceInput>,
) -> ApiResult<Json<WorkspaceInfo>> {
    run_blocking(service, move |s| s.switch_workspace(&input.path))
        .await
        .map(Json)
}

pub async fn invalidate_all(State(service): State<BacklogService>) -> ApiResult<StatusCode> {
    run_blocking(service, |s| {
        s.invalidate_all();
        Ok(())
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Products
// ============================================================

/// Query parameters accepted by every product read.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
}

pub async fn list_products(State(service): State<BacklogService>) -> ApiResult<Json<Vec<String>>> {
    run_blocking(service, |s| Ok(s.list_products())).await.map(Json)
}

pub async fn list_items(
    State(service): State<BacklogService>,
    Path(product): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<ItemListing>> {
    run_blocking(service, move |s| s.list_items(&product, query.refresh))
        .await
        .map(Json)
}

pub async fn get_item(
    State(service): State<BacklogService>,
    Path((product, id)): Path<(String, String)>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<ItemDetail>> {
    run_blocking(service, move |s| s.get_item(&product, &id, query.refresh))
        .await?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Item not found".to_string()))
}

pub async fn get_tree(
    State(service): State<BacklogService>,
    Path(product): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<TreeView>> {
    run_blocking(service, move |s| s.build_tree(&product, query.refresh))
        .await
        .map(Json)
}

pub async fn get_kanban(
    State(service): State<BacklogService>,
    Path(product): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<Json<KanbanView>> {
    run_blocking(service, move |s| s.build_kanban(&product, query.refresh))
        .await
        .map(Json)
}

pub async fn refresh_product(
    State(service): State<BacklogService>,
    Path(product): Path<String>,
) -> ApiResult<Json<ItemListing>> {
    run_blocking(service, move |s| s.refresh(&product))
        .await
        .map(Json)
}
