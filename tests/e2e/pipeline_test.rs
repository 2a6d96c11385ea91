// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{body_json, empty_request, json_request, test_settings, workflow_body};
use axum::http::StatusCode;
use basecrawl::domain::models::hot_topic::{FIELD_RANK, FIELD_VALUE, FIELD_VALUE_DISPLAY};
use basecrawl::domain::models::table::CellValue;
use basecrawl::domain::repositories::base_repository::BaseHost;
use basecrawl::infrastructure::memory_base::InMemoryBase;
use basecrawl::presentation::routes;
use basecrawl::presentation::state::AppState;
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn app_with(server: &MockServer, base: Arc<InMemoryBase>) -> axum::Router {
    let host: Arc<dyn BaseHost> = base;
    let state = AppState::from_settings(&test_settings(&server.uri()), host).unwrap();
    routes::routes(Arc::new(state))
}

#[tokio::test]
async fn hot_topics_flow_into_table() {
    let server = MockServer::start().await;
    let topics: Vec<_> = (0..12)
        .map(|i| json!({ "content": format!("话题{}", i), "type": "", "value": 12_000_000 - i * 1000 }))
        .collect();
    Mock::given(method("POST"))
        .and(path("/v1/workflow/run"))
        .and(body_partial_json(json!({ "workflow_id": "wf-hot" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(workflow_body(json!(topics))))
        .expect(1)
        .mount(&server)
        .await;

    let base = Arc::new(InMemoryBase::new());
    let app = app_with(&server, base.clone()).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/v1/hot-topics/crawl", json!({ "max_count": 10 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["origin"], "live");
    assert_eq!(body["written"], 10);
    assert!(body["table_name"].as_str().unwrap().starts_with("抖音热榜_"));

    let table_id = body["table_id"].as_str().unwrap().to_string();
    let rows = base.rows(&table_id);
    assert_eq!(rows.len(), 10);
    let fields = base.field_names(&table_id);
    assert!(fields.iter().any(|f| f == FIELD_RANK));
    assert!(fields.iter().any(|f| f == FIELD_VALUE));
    assert!(fields.iter().any(|f| f == FIELD_VALUE_DISPLAY));
    assert!(rows[0]
        .values()
        .any(|v| matches!(v, CellValue::Text(s) if s.contains("千万"))));

    let status = body_json(app.oneshot(empty_request("GET", "/v1/status")).await.unwrap()).await;
    assert_eq!(status["source"], "hot_topics");
    assert_eq!(status["banner"]["message"], "成功写入 10 条记录");
}

#[tokio::test]
async fn failed_video_workflow_falls_back_to_synthetic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workflow/run"))
        .and(body_partial_json(json!({ "workflow_id": "wf-video" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let base = Arc::new(InMemoryBase::new());
    let app = app_with(&server, base.clone()).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/videos/crawl",
            json!({ "creator_name": "小明", "max_count": 7 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["origin"], "synthetic");
    assert_eq!(body["written"], 7);
    assert_eq!(body["attempts"][0]["outcome"]["status"], "failed");

    let table_id = body["table_id"].as_str().unwrap().to_string();
    assert_eq!(base.rows(&table_id).len(), 7);
}
