//! Upstream mocks
//!
//! Helpers mounting tsuru API endpoints on a wiremock server. Every mock
//! requires the test token so header forwarding is checked implicitly.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::TEST_TOKEN;

/// Serve `GET /docker/node`
pub async fn mount_nodes(server: &MockServer, nodes: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/docker/node"))
        .and(header("Authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": nodes })))
        .mount(server)
        .await;
}

/// Serve `GET /docker/node/{host}/containers`
pub async fn mount_containers(server: &MockServer, host: &str, containers: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/docker/node/{}/containers", host)))
        .and(header("Authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(containers)))
        .mount(server)
        .await;
}

/// Serve `GET {route}` with an arbitrary JSON body
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("Authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer `GET {route}` with an error status and plain body
pub async fn mount_error(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
