//! Pool and node page tests

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    container, encode_address, mount_containers, mount_error, mount_nodes, node, TestApp,
};

async fn mount_cluster(app: &TestApp) {
    mount_nodes(
        &app.upstream,
        vec![
            node(
                "http://10.0.0.1:2375",
                Some("dev"),
                Some("2015-03-10T11:20:00-03:00"),
            ),
            node("http://10.0.0.2:2375", Some("prod"), None),
            node("http://10.0.0.3:2375", None, Some("not a date")),
        ],
    )
    .await;
    mount_containers(
        &app.upstream,
        "10.0.0.1",
        vec![
            container("c1", "web", "started"),
            container("c2", "web", "started"),
            container("c3", "api", "error"),
        ],
    )
    .await;
    mount_containers(&app.upstream, "10.0.0.2", vec![]).await;
    mount_containers(
        &app.upstream,
        "10.0.0.3",
        vec![container("c4", "web", "stopped")],
    )
    .await;
}

#[tokio::test]
async fn test_pool_list_groups_nodes_with_units() {
    let app = TestApp::new().await;
    mount_cluster(&app).await;

    let response = app.get("/api/v1/pools").await;
    response.assert_ok();

    let json: Value = response.json();
    let pools = json["pools"].as_object().unwrap();
    assert_eq!(pools.len(), 3);

    let dev = &json["pools"]["dev"][0];
    assert_eq!(dev["Address"], "http://10.0.0.1:2375");
    assert_eq!(dev["Units"], json!({"started": 2, "error": 1}));
    assert_eq!(dev["LastSuccess"], "2015-03-10T14:20:00Z");
    assert!(dev["Metadata"].get("LastSuccess").is_none());
    assert_eq!(dev["Status"], "ready");

    assert_eq!(json["pools"]["prod"][0]["Units"], json!({}));
    assert!(json["pools"]["prod"][0]["LastSuccess"].is_null());

    let unpooled = &json["pools"][""][0];
    assert_eq!(unpooled["Address"], "http://10.0.0.3:2375");
    assert!(unpooled["LastSuccess"].is_null());
    assert_eq!(unpooled["Units"]["stopped"], 1);
}

#[tokio::test]
async fn test_pool_list_with_no_nodes() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/docker/node"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&app.upstream)
        .await;

    let response = app.get("/api/v1/pools").await;
    response.assert_ok();
    let json: Value = response.json();
    assert_eq!(json, json!({"pools": {}}));
}

#[tokio::test]
async fn test_pool_list_with_null_nodes() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/docker/node"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nodes": null})))
        .mount(&app.upstream)
        .await;

    let json: Value = app.get("/api/v1/pools").await.json();
    assert_eq!(json, json!({"pools": {}}));
}

#[tokio::test]
async fn test_node_with_null_metadata_is_unpooled() {
    let app = TestApp::new().await;
    mount_nodes(
        &app.upstream,
        vec![
            node("http://10.0.0.1:2375", Some("dev"), None),
            json!({"Address": "http://10.0.0.2:2375", "Metadata": null}),
        ],
    )
    .await;
    mount_containers(&app.upstream, "10.0.0.1", vec![]).await;
    mount_containers(
        &app.upstream,
        "10.0.0.2",
        vec![container("c1", "web", "started")],
    )
    .await;

    let response = app.get("/api/v1/pools").await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(json["pools"]["dev"][0]["Address"], "http://10.0.0.1:2375");
    let unpooled = &json["pools"][""][0];
    assert_eq!(unpooled["Address"], "http://10.0.0.2:2375");
    assert_eq!(unpooled["Metadata"], json!({}));
    assert_eq!(unpooled["Units"]["started"], 1);
}

#[tokio::test]
async fn test_large_pool_keeps_node_order() {
    let app = TestApp::new().await;
    let addresses: Vec<String> = (1..=40)
        .map(|i| format!("http://10.0.1.{}:2375", i))
        .collect();
    mount_nodes(
        &app.upstream,
        addresses
            .iter()
            .map(|address| node(address, Some("big"), None))
            .collect(),
    )
    .await;
    for i in 1..=40 {
        mount_containers(&app.upstream, &format!("10.0.1.{}", i), vec![]).await;
    }

    let response = app.get("/api/v1/pools/big").await;
    response.assert_ok();

    let json: Value = response.json();
    let listed: Vec<&str> = json["pools"]["big"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["Address"].as_str().unwrap())
        .collect();
    assert_eq!(listed, addresses);
}

#[tokio::test]
async fn test_pool_detail_only_queries_pool_members() {
    let app = TestApp::new().await;
    mount_nodes(
        &app.upstream,
        vec![
            node("http://10.0.0.1:2375", Some("dev"), None),
            node("http://10.0.0.2:2375", Some("prod"), None),
        ],
    )
    .await;
    mount_containers(
        &app.upstream,
        "10.0.0.1",
        vec![container("c1", "web", "started")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docker/node/10.0.0.2/containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&app.upstream)
        .await;

    let response = app.get("/api/v1/pools/dev").await;
    response.assert_ok();

    let json: Value = response.json();
    let pools = json["pools"].as_object().unwrap();
    assert_eq!(pools.len(), 1);
    assert_eq!(json["pools"]["dev"][0]["Units"]["started"], 1);
}

#[tokio::test]
async fn test_unknown_pool_is_empty() {
    let app = TestApp::new().await;
    mount_nodes(
        &app.upstream,
        vec![node("http://10.0.0.1:2375", Some("dev"), None)],
    )
    .await;

    let json: Value = app.get("/api/v1/pools/staging").await.json();
    assert_eq!(json, json!({"pools": {}}));
}

#[tokio::test]
async fn test_upstream_error_is_passed_through() {
    let app = TestApp::new().await;
    mount_error(&app.upstream, "/docker/node", 403, "permission denied").await;

    let response = app.get("/api/v1/pools").await;
    response.assert_status(axum::http::StatusCode::FORBIDDEN);
    assert_eq!(response.text(), "permission denied");
}

#[tokio::test]
async fn test_container_error_fails_whole_page() {
    let app = TestApp::new().await;
    mount_nodes(
        &app.upstream,
        vec![node("http://10.0.0.1:2375", Some("dev"), None)],
    )
    .await;
    mount_error(
        &app.upstream,
        "/docker/node/10.0.0.1/containers",
        500,
        "docker unreachable",
    )
    .await;

    let response = app.get("/api/v1/pools").await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "docker unreachable");
}

#[tokio::test]
async fn test_malformed_upstream_body_is_bad_gateway() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/docker/node"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&app.upstream)
        .await;

    let response = app.get("/api/v1/pools").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"], "upstream_error");
}

#[tokio::test]
async fn test_node_detail() {
    let app = TestApp::new().await;
    mount_cluster(&app).await;

    let uri = format!("/api/v1/nodes/{}", encode_address("http://10.0.0.1:2375"));
    let response = app.get(&uri).await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(json["address"], "http://10.0.0.1:2375");
    assert_eq!(json["node"]["Metadata"]["pool"], "dev");
    assert_eq!(json["node"]["LastSuccess"], "2015-03-10T14:20:00Z");
    assert_eq!(json["node"]["Units"]["started"], 2);
    assert_eq!(json["containers"].as_array().unwrap().len(), 3);
    assert_eq!(json["containers"][0]["ID"], "c1");
    assert_eq!(json["containers"][0]["HostPort"], "49153");
}

#[tokio::test]
async fn test_node_detail_for_unlisted_node() {
    let app = TestApp::new().await;
    mount_nodes(&app.upstream, vec![]).await;
    mount_containers(&app.upstream, "10.9.9.9", vec![]).await;

    let uri = format!("/api/v1/nodes/{}", encode_address("http://10.9.9.9:2375"));
    let response = app.get(&uri).await;
    response.assert_ok();

    let json: Value = response.json();
    assert!(json["node"].is_null());
    assert_eq!(json["containers"], json!([]));
}
