// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use basecrawl::config::settings::Settings;
use basecrawl::engines::reqwest_engine::HttpFetcher;
use serde_json::Value;
use std::time::Duration;

pub const SEARCH_PAGE: &str = r#"
<html><body>
  <div data-component-type="s-search-result" data-asin="B08N5WRWNW">
    <h2><a href="/rosyclo-Slippers/dp/B08N5WRWNW/ref=sr_1_1"><span>Cloud Slippers</span></a></h2>
    <span class="a-price"><span class="a-price-whole">15.</span></span>
    <i class="a-icon-star"><span class="a-icon-alt">4.3 out of 5 stars</span></i>
  </div>
  <div data-component-type="s-search-result" data-asin="B07XYZ4567">
    <h2><a href="/Memory-Foam/dp/B07XYZ4567"><span>Memory Foam Slippers</span></a></h2>
    <span class="a-offscreen">S$22.50</span>
  </div>
</body></html>
"#;

pub fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5), "basecrawl-test").unwrap()
}

/// 指向模拟服务器的配置，批次间隔为0
pub fn test_settings(mock_uri: &str) -> Settings {
    let mut settings = Settings::from_defaults().unwrap();
    settings.sources.request_timeout_secs = 5;
    settings.sources.product.proxy_endpoints = vec![format!("{}/get?url=", mock_uri)];
    settings.sources.product.scraping_api_key = None;
    settings.sources.workflow.endpoint = format!("{}/v1/workflow/run", mock_uri);
    settings.sources.workflow.token = Some("test-token".to_string());
    settings.sources.workflow.hot_topics_workflow_id = "wf-hot".to_string();
    settings.sources.video.workflow_id = Some("wf-video".to_string());
    settings.writer.product.inter_batch_delay_ms = 0;
    settings.writer.hot_topics.inter_batch_delay_ms = 0;
    settings.writer.video.inter_batch_delay_ms = 0;
    settings
}

/// 工作流响应：`output` 与 `data` 各编码一层
pub fn workflow_body(output: Value) -> Value {
    let data = serde_json::json!({ "output": output.to_string() }).to_string();
    serde_json::json!({ "code": 0, "msg": "Success", "data": data })
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
