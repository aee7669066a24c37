use archgraph_api::{create_router, AppState};
use archgraph_core::{ArchGraphConfig, ConfigManager};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const PREFIX: &str = "/api/projections/modules";

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Three top-level modules; domain reaches into infrastructure.
fn fixture_project() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "src/domain/user.ts",
        "import { Db } from '../infrastructure/db';\nexport class User {}\n",
    );
    write(root, "src/infrastructure/db.ts", "export class Db {}\n");
    write(
        root,
        "src/application/service.ts",
        "import { User } from '../domain/user';\nexport const svc = () => new User();\n",
    );
    write(root, "src/domain/user.test.ts", "import { User } from './user';\n");
    dir
}

fn test_server() -> TestServer {
    let config = Arc::new(ConfigManager::from_config(ArchGraphConfig::default()).expect("config"));
    let state = AppState::new(config).expect("app state");
    TestServer::new(create_router(state)).unwrap()
}

fn root_of(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

async fn analyze(server: &TestServer, dir: &TempDir) -> Value {
    let resp = server
        .post(&format!("{}/analyze", PREFIX))
        .json(&json!({ "rootPath": root_of(dir) }))
        .await;
    assert_eq!(resp.status_code(), 200);
    resp.json()
}

fn assert_error(resp: &axum_test::TestResponse, status: u16, code: &str) {
    assert_eq!(resp.status_code(), status);
    let body: Value = resp.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], code);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = test_server();
    let resp = server.get("/health").await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert!(body["version"].is_string());
    assert!(body.get("success").is_none());
}

#[tokio::test]
async fn analyze_returns_enveloped_record() {
    let server = test_server();
    let dir = fixture_project();
    let body = analyze(&server, &dir).await;

    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert!(data["analysisId"].as_str().unwrap().starts_with("analysis-"));
    assert_eq!(data["rootPath"], root_of(&dir));
    assert_eq!(data["summary"]["totalModules"], 3);
    assert_eq!(data["summary"]["totalFiles"], 3);
    assert_eq!(data["summary"]["totalDependencies"], 2);
    assert_eq!(data["summary"]["circularDependencies"], 0);
    assert_eq!(data["summary"]["architectureScore"], 100);
    assert_eq!(data["modules"].as_array().unwrap().len(), 3);
    assert!(data.get("projection").is_none());
}

#[tokio::test]
async fn analyze_honours_request_config() {
    let server = test_server();
    let dir = fixture_project();
    let resp = server
        .post(&format!("{}/analyze", PREFIX))
        .json(&json!({
            "rootPath": root_of(&dir),
            "config": { "aggregationLevel": "file", "includeTests": true }
        }))
        .await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["data"]["summary"]["totalModules"], 4);
}

#[tokio::test]
async fn analyze_rejects_bad_input() {
    let server = test_server();
    let url = format!("{}/analyze", PREFIX);

    let missing = server.post(&url).json(&json!({})).await;
    assert_error(&missing, 400, "VALIDATION_ERROR");
    let body: Value = missing.json();
    assert_eq!(body["error"]["message"], "rootPath is required");

    let relative = server.post(&url).json(&json!({ "rootPath": "relative/path" })).await;
    assert_error(&relative, 400, "VALIDATION_ERROR");
    let body: Value = relative.json();
    assert_eq!(body["error"]["message"], "rootPath must be absolute");

    let malformed = server
        .post(&url)
        .text("{not json")
        .content_type("application/json")
        .await;
    assert_error(&malformed, 400, "VALIDATION_ERROR");
}

#[tokio::test]
async fn analyze_of_missing_directory_is_analysis_error() {
    let server = test_server();
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("does-not-exist");
    let resp = server
        .post(&format!("{}/analyze", PREFIX))
        .json(&json!({ "rootPath": gone.to_string_lossy() }))
        .await;
    assert_error(&resp, 500, "ANALYSIS_ERROR");

    let list: Value = server.get(PREFIX).await.json();
    assert_eq!(list["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn get_returns_cached_record() {
    let server = test_server();
    let dir = fixture_project();
    let created = analyze(&server, &dir).await;
    let id = created["data"]["analysisId"].as_str().unwrap();

    let resp = server.get(&format!("{}/{}", PREFIX, id)).await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["data"], created["data"]);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let server = test_server();

    let get = server.get(&format!("{}/analysis-0", PREFIX)).await;
    assert_error(&get, 404, "NOT_FOUND");

    let export = server.get(&format!("{}/analysis-0/export", PREFIX)).await;
    assert_error(&export, 404, "NOT_FOUND");

    let delete = server.delete(&format!("{}/analysis-0", PREFIX)).await;
    assert_error(&delete, 404, "NOT_FOUND");
}

#[tokio::test]
async fn export_bogus_format_is_validation_error() {
    let server = test_server();
    let dir = fixture_project();
    let created = analyze(&server, &dir).await;
    let id = created["data"]["analysisId"].as_str().unwrap();

    let resp = server
        .get(&format!("{}/{}/export", PREFIX, id))
        .add_query_param("format", "bogus")
        .await;
    assert_error(&resp, 400, "VALIDATION_ERROR");
    let body: Value = resp.json();
    assert!(body.get("data").is_none());

    // Format is checked before the lookup.
    let unknown = server
        .get(&format!("{}/analysis-0/export", PREFIX))
        .add_query_param("format", "bogus")
        .await;
    assert_error(&unknown, 400, "VALIDATION_ERROR");

    let layout = server
        .get(&format!("{}/{}/export", PREFIX, id))
        .add_query_param("layout", "diagonal")
        .await;
    assert_error(&layout, 400, "VALIDATION_ERROR");
}

#[tokio::test]
async fn export_formats() {
    let server = test_server();
    let dir = fixture_project();
    let created = analyze(&server, &dir).await;
    let id = created["data"]["analysisId"].as_str().unwrap().to_string();
    let url = format!("{}/{}/export", PREFIX, id);

    let json_resp: Value = server.get(&url).await.json();
    assert_eq!(json_resp["data"]["format"], "json");
    assert_eq!(json_resp["data"]["filename"], format!("module-graph-{}.json", id));
    assert_eq!(json_resp["data"]["content"]["metadata"]["nodeCount"], 3);

    let graphml: Value = server.get(&url).add_query_param("format", "graphml").await.json();
    assert_eq!(graphml["data"]["filename"], format!("module-graph-{}.graphml", id));
    assert!(graphml["data"]["content"].as_str().unwrap().contains("<graphml"));

    let svg: Value = server
        .get(&url)
        .add_query_param("format", "svg")
        .add_query_param("layout", "LR")
        .add_query_param("colorScheme", "monochrome")
        .await
        .json();
    assert!(svg["data"]["content"].as_str().unwrap().starts_with("<svg"));

    let markdown: Value = server.get(&url).add_query_param("format", "markdown").await.json();
    assert_eq!(markdown["data"]["format"], "markdown");
    assert_eq!(markdown["data"]["filename"], format!("analysis-{}-report.md", id));
    let report = markdown["data"]["content"].as_str().unwrap();
    assert!(report.starts_with("# Module Dependency Analysis"));
    assert!(report.contains("*Generated by ArchGraph Module Analysis API*"));
}

#[tokio::test]
async fn validate_reports_layer_violation() {
    let server = test_server();
    let dir = fixture_project();
    let resp = server
        .post(&format!("{}/validate", PREFIX))
        .json(&json!({ "rootPath": root_of(&dir) }))
        .await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    let data = &body["data"];

    assert!(data["validationId"].as_str().unwrap().starts_with("validation-"));
    assert_eq!(data["score"], 70);
    assert_eq!(data["grade"], "B");
    assert_eq!(data["checks"]["domainIndependence"]["passed"], false);
    assert_eq!(data["violations"].as_array().unwrap().len(), 1);
    assert_eq!(data["summary"]["domainModules"], 1);
    assert_eq!(data["layers"][0]["name"], "domain");

    // Validate stores the analysis it ran.
    let list: Value = server.get(PREFIX).await.json();
    assert_eq!(list["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn validate_requires_root_path() {
    let server = test_server();
    let resp = server
        .post(&format!("{}/validate", PREFIX))
        .json(&json!({ "config": {} }))
        .await;
    assert_error(&resp, 400, "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_paginates_history() {
    let server = test_server();
    let dir = fixture_project();
    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = analyze(&server, &dir).await;
        ids.push(created["data"]["analysisId"].as_str().unwrap().to_string());
    }

    let page: Value = server
        .get(PREFIX)
        .add_query_param("limit", "2")
        .await
        .json();
    let analyses = page["data"]["analyses"].as_array().unwrap();
    assert_eq!(analyses.len(), 2);
    assert_eq!(analyses[0]["analysisId"], ids[2]);
    assert_eq!(analyses[0]["moduleCount"], 3);
    assert_eq!(page["data"]["pagination"]["total"], 3);
    assert_eq!(page["data"]["pagination"]["limit"], 2);
    assert_eq!(page["data"]["pagination"]["hasMore"], true);

    let rest: Value = server
        .get(PREFIX)
        .add_query_param("limit", "2")
        .add_query_param("offset", "2")
        .add_query_param("order", "desc")
        .await
        .json();
    assert_eq!(rest["data"]["analyses"].as_array().unwrap().len(), 1);
    assert_eq!(rest["data"]["pagination"]["hasMore"], false);

    let ascending: Value = server
        .get(PREFIX)
        .add_query_param("order", "asc")
        .add_query_param("limit", "abc")
        .await
        .json();
    assert_eq!(ascending["data"]["analyses"][0]["analysisId"], ids[0]);
    assert_eq!(ascending["data"]["pagination"]["limit"], 50);
}

#[tokio::test]
async fn delete_removes_analysis() {
    let server = test_server();
    let dir = fixture_project();
    let created = analyze(&server, &dir).await;
    let id = created["data"]["analysisId"].as_str().unwrap().to_string();

    let resp = server.delete(&format!("{}/{}", PREFIX, id)).await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["analysisId"], id);
    assert_eq!(body["data"]["deleted"], true);

    let again = server.get(&format!("{}/{}", PREFIX, id)).await;
    assert_error(&again, 404, "NOT_FOUND");
}

#[tokio::test]
async fn list_accepts_trailing_slash() {
    let server = test_server();
    let dir = fixture_project();
    analyze(&server, &dir).await;

    let resp = server.get(&format!("{}/", PREFIX)).await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn unmatched_routes_use_error_envelope() {
    let server = test_server();

    let unknown = server.get("/api/unknown").await;
    assert_error(&unknown, 404, "NOT_FOUND");
    let body: Value = unknown.json();
    assert!(body["error"]["message"].as_str().unwrap().starts_with("Route not found"));

    let nested = server.get(&format!("{}/analysis-0/export/extra", PREFIX)).await;
    assert_error(&nested, 404, "NOT_FOUND");

    let wrong_method = server.put(&format!("{}/analyze", PREFIX)).await;
    assert_error(&wrong_method, 404, "NOT_FOUND");
}
