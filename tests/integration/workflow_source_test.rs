// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{fetcher, test_settings, workflow_body};
use basecrawl::domain::models::crawl_result::DataOrigin;
use basecrawl::domain::progress::NoopProgress;
use basecrawl::sources::hot_topics::HotTopicsClient;
use basecrawl::sources::video::VideoClient;
use basecrawl::sources::workflow::WorkflowClient;
use basecrawl::sources::SourceClient;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn workflow(server: &MockServer, token: Option<&str>) -> Arc<WorkflowClient> {
    Arc::new(WorkflowClient::new(
        fetcher(),
        format!("{}/v1/workflow/run", server.uri()),
        token.map(str::to_string),
    ))
}

#[tokio::test]
async fn hot_topics_decode_nested_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workflow/run"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "workflow_id": "wf-hot",
            "parameters": { "input": "" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(workflow_body(json!([
            { "content": "A", "type": "", "value": 12000000 },
            { "content": "B", "type": "热", "value": "35,000" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = HotTopicsClient::new(workflow(&server, Some("test-token")), "wf-hot");
    let result = client.fetch_records("", 50, &NoopProgress).await;

    assert!(result.success());
    assert_eq!(result.origin(), DataOrigin::Live);
    let items = result.records();
    assert_eq!(items.len(), 2);
    assert!(items[0].value_display().contains("千万"));
    assert_eq!(items[0].type_display(), "普通");
    assert_eq!(items[1].value, 35000.0);
    assert_eq!(items[1].type_display(), "热");
}

#[tokio::test]
async fn hot_topics_api_error_has_no_synthetic_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 4100, "msg": "token expired", "data": "" })),
        )
        .mount(&server)
        .await;

    let client = HotTopicsClient::new(workflow(&server, Some("test-token")), "wf-hot");
    let result = client.fetch_records("", 50, &NoopProgress).await;

    assert!(!result.success());
    assert!(result.message().contains("未获取到真实数据"));
    assert!(result.message().contains("token expired"));
}

#[tokio::test]
async fn hot_topics_malformed_layer_is_absorbed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "",
            "data": "{\"output\": \"[not json\"}"
        })))
        .mount(&server)
        .await;

    let client = HotTopicsClient::new(workflow(&server, Some("test-token")), "wf-hot");
    let result = client.fetch_records("", 50, &NoopProgress).await;

    assert!(!result.success());
    assert_eq!(result.attempts().len(), 1);
}

#[tokio::test]
async fn videos_come_from_workflow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/workflow/run"))
        .and(body_partial_json(json!({
            "workflow_id": "wf-video",
            "parameters": { "input": "小明" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(workflow_body(json!({
            "aweme_list": [
                { "aweme_id": "v1", "desc": "第一条", "digg_count": 10, "create_time": 1735732800 },
                { "aweme_id": "v2", "desc": "第二条", "digg_count": "20" }
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let client = VideoClient::new(workflow(&server, Some("test-token")), &settings.sources);
    let result = client.fetch_records("  小明 ", 50, &NoopProgress).await;

    assert!(result.success());
    assert_eq!(result.origin(), DataOrigin::Live);
    let videos = result.records();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].video_id, "v1");
    assert_eq!(videos[0].like_count, 10);
    assert!(videos[0].create_time.starts_with("2025-01-01T"));
    assert_eq!(videos[1].like_count, 20);
    assert_eq!(videos[1].nickname, "小明");
}

#[tokio::test]
async fn videos_without_token_use_synthetic_data() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = test_settings(&server.uri());
    let client = VideoClient::new(workflow(&server, None), &settings.sources);
    let result = client.fetch_records("小明", 5, &NoopProgress).await;

    assert!(result.success());
    assert_eq!(result.origin(), DataOrigin::Synthetic);
    assert_eq!(result.total_count(), 5);
}
