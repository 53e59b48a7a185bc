use std::fs;
use std::path::Path;

use axum::http::StatusCode;
use axum_test::TestServer;
use backlog_core::models::*;
use backlog_core::BacklogService;
use backlog_view::api::create_router;
use serde_json::json;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("path has a parent")).expect("Failed to create dirs");
    fs::write(path, content).expect("Failed to write file");
}

fn work_item(id: &str, state: &str, parent: Option<&str>) -> String {
    let parent = parent.map(|p| format!("parent: {p}\n")).unwrap_or_default();
    format!("---\nid: {id}\ntitle: Item {id}\nstate: {state}\n{parent}---\n")
}

fn setup() -> (TempDir, TestServer) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir.path();
    write(root, "products/app/items/epic/0000/E-1.md", &work_item("E-1", "InProgress", None));
    write(root, "products/app/items/task/0000/T-1.md", &work_item("T-1", "ready", Some("E-1")));
    write(root, "products/app/items/task/0000/T-2.md", &work_item("T-2", "weird-state", Some("E-404")));

    let app = create_router(BacklogService::new(root));
    let server = TestServer::new(app).expect("Failed to create test server");
    (dir, server)
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn lists_products() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/products").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<String>>(), vec!["app"]);
    }

    #[tokio::test]
    async fn lists_items_in_discovery_order() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/products/app/items").await;
        response.assert_status_ok();

        let listing: ItemListing = response.json();
        assert_eq!(listing.product, "app");
        let ids: Vec<_> = listing.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["E-1", "T-1", "T-2"]);
        assert!(listing.items.iter().all(|i| i.content.is_none()));
    }

    #[tokio::test]
    async fn serializes_item_fields() {
        let (_dir, server) = setup();
        let body: serde_json::Value = server.get("/api/v1/products/app/items").await.json();
        let first = &body["items"][0];

        assert_eq!(first["type"], "Epic");
        assert_eq!(first["source_kind"], "work_item");
        assert!(first["parent"].is_null());
        assert!(first["created"].is_null());
        assert!(first["parse_error"].is_null());
        assert!(first.get("content").is_none());
    }

    #[tokio::test]
    async fn rejects_invalid_product_name() {
        let (_dir, server) = setup();
        server
            .get("/api/v1/products/bad%21name/items")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_product_is_empty_with_warning() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/products/ghost/items").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["warnings"][0]["kind"], "missing_product_root");
    }
}

mod items {
    use super::*;

    #[tokio::test]
    async fn returns_item_with_content() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/products/app/items/T-1").await;
        response.assert_status_ok();

        let detail: ItemDetail = response.json();
        assert_eq!(detail.item.id, "T-1");
        assert_eq!(detail.item.parent.as_deref(), Some("E-1"));
        assert!(detail.item.content.is_some());
        assert_eq!(detail.duplicates.len(), 1);
    }

    #[tokio::test]
    async fn returns_404_for_unknown_id() {
        let (_dir, server) = setup();
        server
            .get("/api/v1/products/app/items/NOPE-1")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn refresh_query_picks_up_new_files() {
        let (dir, server) = setup();
        write(dir.path(), "products/app/items/task/0001/T-3.md", &work_item("T-3", "Done", None));

        let response = server
            .get("/api/v1/products/app/items/T-3")
            .add_query_param("refresh", true)
            .await;
        response.assert_status_ok();
    }
}

mod views {
    use super::*;

    #[tokio::test]
    async fn builds_tree_with_orphan_warning() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/products/app/tree").await;
        response.assert_status_ok();

        let tree: TreeView = response.json();
        let roots: Vec<_> = tree.roots.iter().map(|n| n.item.id.as_str()).collect();
        assert_eq!(roots, vec!["E-1", "T-2"]);
        assert_eq!(tree.roots[0].children[0].item.id, "T-1");
        assert!(tree.warnings.contains(&Warning::OrphanParent {
            id: "T-2".into(),
            parent: "E-404".into(),
        }));
    }

    #[tokio::test]
    async fn tree_nodes_flatten_item_fields() {
        let (_dir, server) = setup();
        let body: serde_json::Value = server.get("/api/v1/products/app/tree").await.json();
        assert_eq!(body["roots"][0]["id"], "E-1");
        assert_eq!(body["roots"][0]["children"][0]["id"], "T-1");
    }

    #[tokio::test]
    async fn builds_kanban_in_lane_order() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/products/app/kanban").await;
        response.assert_status_ok();

        let board: KanbanView = response.json();
        let lanes: Vec<_> = board.lanes.iter().map(|l| l.lane).collect();
        assert_eq!(lanes, Lane::ALL.to_vec());
        assert_eq!(board.lane(Lane::InProgress)[0].id, "E-1");
        assert_eq!(board.lane(Lane::Ready)[0].id, "T-1");
        assert_eq!(board.lane(Lane::Other)[0].id, "T-2");
    }
}

mod workspace {
    use super::*;

    #[tokio::test]
    async fn reports_current_workspace() {
        let (_dir, server) = setup();
        let response = server.get("/api/v1/workspace").await;
        response.assert_status_ok();

        let info: WorkspaceInfo = response.json();
        assert!(info.exists);
        assert!(info.valid);
    }

    #[tokio::test]
    async fn switches_to_another_backlog() {
        let (_dir, server) = setup();
        let other = TempDir::new().expect("Failed to create temp dir");
        write(other.path(), "products/next/items/task/0000/N-1.md", &work_item("N-1", "Ready", None));

        let response = server
            .put("/api/v1/workspace")
            .json(&json!({ "path": other.path().join("products").display().to_string() }))
            .await;
        response.assert_status_ok();
        assert!(response.json::<WorkspaceInfo>().valid);

        let products: Vec<String> = server.get("/api/v1/products").await.json();
        assert_eq!(products, vec!["next"]);
    }

    #[tokio::test]
    async fn rejects_unusable_path_and_keeps_workspace() {
        let (dir, server) = setup();
        let before: WorkspaceInfo = server.get("/api/v1/workspace").await.json();

        server
            .put("/api/v1/workspace")
            .json(&json!({ "path": dir.path().join("missing").display().to_string() }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put("/api/v1/workspace")
            .json(&json!({ "path": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let after: WorkspaceInfo = server.get("/api/v1/workspace").await.json();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn refresh_endpoints() {
        let (_dir, server) = setup();

        let listing: ItemListing = server.post("/api/v1/products/app/refresh").await.json();
        assert_eq!(listing.items.len(), 3);

        server
            .post("/api/v1/refresh")
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
