//! Deploy list, chart and detail tests

use serde_json::{json, Value};
use tsuru_dashboard::config::DeployLimitMode;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{deploy, deploys, mount_error, mount_json, TestApp};

async fn expect_window(server: &MockServer, skip: &str, limit: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/deploys"))
        .and(query_param("skip", skip))
        .and(query_param("limit", limit))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_first_page_defaults() {
    let app = TestApp::new().await;
    expect_window(&app.upstream, "0", "20", deploys(20)).await;

    let response = app.get("/api/v1/deploys").await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(json["page"], 1);
    assert_eq!(json["next"], 2);
    assert!(json.get("previous").is_none());
    assert_eq!(json["deploys"].as_array().unwrap().len(), 20);
    assert_eq!(json["deploys"][0]["Commit"], "5f1c3a");
}

#[tokio::test]
async fn test_cumulative_limit_grows_with_page() {
    let app = TestApp::new().await;
    expect_window(&app.upstream, "20", "40", deploys(5)).await;

    let response = app.get("/api/v1/deploys?page=2").await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(json["page"], 2);
    assert_eq!(json["previous"], 1);
    assert!(json.get("next").is_none());
}

#[tokio::test]
async fn test_window_mode_uses_fixed_limit() {
    let app = TestApp::with_limit_mode(DeployLimitMode::Window).await;
    expect_window(&app.upstream, "40", "20", deploys(20)).await;

    let json: Value = app.get("/api/v1/deploys?page=3").await.json();
    assert_eq!(json["next"], 4);
    assert_eq!(json["previous"], 2);
}

#[tokio::test]
async fn test_highest_page_number() {
    let app = TestApp::new().await;
    expect_window(&app.upstream, "4294967295", "4294967295", deploys(20)).await;

    let response = app.get("/api/v1/deploys?page=4294967295").await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(json["page"], 4294967295u32);
    assert_eq!(json["previous"], 4294967294u32);
    assert!(json.get("next").is_none());
}

#[tokio::test]
async fn test_empty_deploy_list() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/deploys"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&app.upstream)
        .await;

    let json: Value = app.get("/api/v1/deploys").await.json();
    assert_eq!(json, json!({"deploys": [], "page": 1}));
}

#[tokio::test]
async fn test_invalid_page_is_rejected() {
    let app = TestApp::new().await;

    for page in ["0", "abc", "-2"] {
        let response = app.get(&format!("/api/v1/deploys?page={}", page)).await;
        response.assert_bad_request();
        assert!(response.text().contains("page"));
    }

    assert!(app.upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_graph_series() {
    let app = TestApp::new().await;
    mount_json(
        &app.upstream,
        "/deploys",
        json!([
            deploy("d5", "api", "2015-03-10T14:25:00Z", 3),
            deploy("d4", "web", "2015-03-10T14:24:00Z", 2),
            deploy("d3", "web", "2015-03-10T14:23:00Z", 0),
            deploy("d2", "api", "2015-03-10T14:22:00Z", 4),
            deploy("d1", "web", "2015-03-10T14:21:00Z", 1),
        ]),
    )
    .await;

    let response = app.get("/api/v1/deploys/graph").await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(
        json["deploys"],
        json!([
            {"key": "web", "values": [
                {"x": "2015-03-10T14:21:00Z", "y": 1.0},
                {"x": "2015-03-10T14:24:00Z", "y": 2.0}
            ]},
            {"key": "api", "values": [
                {"x": "2015-03-10T14:22:00Z", "y": 4.0},
                {"x": "2015-03-10T14:25:00Z", "y": 3.0}
            ]}
        ])
    );
}

#[tokio::test]
async fn test_graph_filters() {
    let app = TestApp::new().await;
    mount_json(
        &app.upstream,
        "/deploys",
        json!([
            deploy("d4", "web-prod", "t4", 12),
            deploy("d3", "web-prod", "t3", 5),
            deploy("d2", "web-dev", "t2", 5),
            deploy("d1", "api", "t1", 5),
        ]),
    )
    .await;

    let response = app
        .get("/api/v1/deploys/graph?app=web&appExclude=dev&minTime=1&maxTime=10")
        .await;
    response.assert_ok();

    let json: Value = response.json();
    assert_eq!(
        json["deploys"],
        json!([{"key": "web-prod", "values": [{"x": "t3", "y": 5.0}]}])
    );
}

#[tokio::test]
async fn test_graph_blank_filters_are_ignored() {
    let app = TestApp::new().await;
    mount_json(
        &app.upstream,
        "/deploys",
        json!([deploy("d1", "api", "t1", 5)]),
    )
    .await;

    let json: Value = app
        .get("/api/v1/deploys/graph?app=&appExclude=&minTime=&maxTime=")
        .await
        .json();
    assert_eq!(json["deploys"][0]["key"], "api");
}

#[tokio::test]
async fn test_graph_rejects_bad_filters() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/deploys/graph?app=web(").await;
    response.assert_bad_request();
    assert!(response.text().contains("'app'"));

    let response = app.get("/api/v1/deploys/graph?minTime=soon").await;
    response.assert_bad_request();
    assert!(response.text().contains("minTime"));
}

#[tokio::test]
async fn test_deploy_detail_highlights_diff() {
    let app = TestApp::new().await;
    let mut body = deploy("54ff1bd3", "web", "2015-03-10T14:20:00Z", 1);
    body["Diff"] = json!("diff --git a/app.py b/app.py\n-print('a')\n+print('b')\n");
    mount_json(&app.upstream, "/deploys/54ff1bd3", body).await;

    let response = app.get("/api/v1/deploys/54ff1bd3").await;
    response.assert_ok();

    let json: Value = response.json();
    let diff = json["deploy"]["Diff"].as_str().unwrap();
    assert!(diff.starts_with(r#"<div class="highlight"><pre>"#));
    assert!(diff.contains(r#"<span class="gh">diff --git a/app.py b/app.py</span>"#));
    assert!(diff.contains(r#"<span class="gd">-print(&#39;a&#39;)</span>"#));
    assert!(diff.contains(r#"<span class="gi">+print(&#39;b&#39;)</span>"#));
    assert_eq!(json["deploy"]["App"], "web");
}

#[tokio::test]
async fn test_deploy_detail_single_commit_has_no_diff() {
    let app = TestApp::new().await;
    let mut body = deploy("54ff1bd3", "web", "2015-03-10T14:20:00Z", 1);
    body["Diff"] = json!("The deployment must have at least two commits for the diff.");
    mount_json(&app.upstream, "/deploys/54ff1bd3", body).await;

    let json: Value = app.get("/api/v1/deploys/54ff1bd3").await.json();
    assert!(json["deploy"]["Diff"].is_null());
}

#[tokio::test]
async fn test_missing_deploy_is_not_found() {
    let app = TestApp::new().await;
    mount_error(&app.upstream, "/deploys/nope", 404, "not found").await;

    let response = app.get("/api/v1/deploys/nope").await;
    response.assert_not_found();
    assert!(response.text().contains("Deploy does not exist"));
}
