// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{body_json, empty_request, json_request};
use axum::http::StatusCode;
use basecrawl::application::use_cases::crawl_to_table::CrawlToTableUseCase;
use basecrawl::domain::models::hot_topic::HotTopicItem;
use basecrawl::domain::models::product::ProductRecord;
use basecrawl::domain::models::video::VideoRecord;
use basecrawl::domain::repositories::base_repository::BaseHost;
use basecrawl::domain::services::table_provisioner::TableProvisioner;
use basecrawl::domain::services::table_writer::TableWriter;
use basecrawl::engines::router::FallbackPolicy;
use basecrawl::engines::traits::SourceStrategy;
use basecrawl::infrastructure::memory_base::InMemoryBase;
use basecrawl::presentation::controller::UiController;
use basecrawl::presentation::routes;
use basecrawl::presentation::state::AppState;
use basecrawl::sources::hot_topics::HotTopicsClient;
use basecrawl::sources::product::strategies::SyntheticProductStrategy;
use basecrawl::sources::product::ProductClient;
use basecrawl::sources::video::{SyntheticVideoStrategy, VideoClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

/// 只使用合成数据的状态，不访问网络
fn offline_state(base: Arc<InMemoryBase>) -> Arc<AppState> {
    let host: Arc<dyn BaseHost> = base;
    let provisioner = Arc::new(TableProvisioner::new(host.clone(), 50));
    let writer = |source| TableWriter::new(host.clone(), source, 10, Duration::ZERO);

    let products: Vec<Arc<dyn SourceStrategy<ProductRecord>>> =
        vec![Arc::new(SyntheticProductStrategy::new(20))];
    let hot_topics: Vec<Arc<dyn SourceStrategy<HotTopicItem>>> = Vec::new();
    let videos: Vec<Arc<dyn SourceStrategy<VideoRecord>>> =
        vec![Arc::new(SyntheticVideoStrategy::new(10))];

    Arc::new(AppState::new(
        Arc::new(UiController::default()),
        CrawlToTableUseCase::new(
            Arc::new(ProductClient::with_strategies(products, FallbackPolicy::Synthetic)),
            provisioner.clone(),
            writer("product"),
        ),
        CrawlToTableUseCase::new(
            Arc::new(HotTopicsClient::with_strategies(hot_topics)),
            provisioner.clone(),
            writer("hot_topics"),
        ),
        CrawlToTableUseCase::new(
            Arc::new(VideoClient::with_strategies(videos, FallbackPolicy::Synthetic)),
            provisioner,
            writer("video"),
        ),
    ))
}

#[tokio::test]
async fn health_and_version() {
    let app = routes::routes(offline_state(Arc::new(InMemoryBase::new())));

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("GET", "/v1/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_product_url_is_bad_request() {
    let base = Arc::new(InMemoryBase::new());
    let app = routes::routes(offline_state(base.clone()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/products/crawl",
            json!({ "url": "https://notamazon.com/x" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "输入无效: 请输入有效的亚马逊网站链接");
    assert!(base.table_names().is_empty());
}

#[tokio::test]
async fn max_count_out_of_range_is_bad_request() {
    let app = routes::routes(offline_state(Arc::new(InMemoryBase::new())));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/videos/crawl",
            json!({ "creator_name": "小明", "max_count": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "最大数量需在 1-500 之间");

    let status = body_json(app.oneshot(empty_request("GET", "/v1/status")).await.unwrap()).await;
    assert_eq!(status["busy"], false);
    assert_eq!(status["banner"]["kind"], "error");
    assert_eq!(status["banner"]["message"], "最大数量需在 1-500 之间");
    let log = status["log"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["level"], "error");
}

#[tokio::test]
async fn overlapping_run_is_conflict() {
    let state = offline_state(Arc::new(InMemoryBase::new()));
    let app = routes::routes(state.clone());
    let _guard = state.controller.try_begin("video");

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/products/crawl",
            json!({ "url": "https://www.amazon.sg/s?k=tea" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn product_run_then_status_then_clear_log() {
    let base = Arc::new(InMemoryBase::new());
    let app = routes::routes(offline_state(base.clone()));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/products/crawl",
            json!({ "url": "https://www.amazon.sg/s?k=tea", "max_count": 6 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["written"], 6);
    assert_eq!(body["origin"], "synthetic");
    assert_eq!(base.table_names().len(), 1);

    let status = body_json(
        app.clone()
            .oneshot(empty_request("GET", "/v1/status"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["busy"], false);
    assert_eq!(status["progress"]["percent"], 100.0);
    assert_eq!(status["banner"]["kind"], "success");
    assert!(!status["log"].as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/v1/debug-log"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let status = body_json(app.oneshot(empty_request("GET", "/v1/status")).await.unwrap()).await;
    assert!(status["log"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn hot_topics_without_live_data_is_server_error() {
    let base = Arc::new(InMemoryBase::new());
    let app = routes::routes(offline_state(base.clone()));

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/v1/hot-topics/crawl"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("抓取失败"));

    let status = body_json(app.oneshot(empty_request("GET", "/v1/status")).await.unwrap()).await;
    assert_eq!(status["banner"]["kind"], "error");
}
