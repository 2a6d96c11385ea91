// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{fetcher, SEARCH_PAGE};
use basecrawl::domain::models::crawl_result::DataOrigin;
use basecrawl::domain::models::product::ProductRecord;
use basecrawl::domain::progress::NoopProgress;
use basecrawl::engines::router::FallbackPolicy;
use basecrawl::engines::traits::SourceStrategy;
use basecrawl::sources::product::strategies::{
    DirectPageStrategy, ProxyRelayStrategy, ScrapingApiStrategy, SyntheticProductStrategy,
};
use basecrawl::sources::product::ProductClient;
use basecrawl::sources::SourceClient;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "https://www.amazon.sg/s?k=slippers";

fn client(
    strategies: Vec<Arc<dyn SourceStrategy<ProductRecord>>>,
    policy: FallbackPolicy,
) -> ProductClient {
    ProductClient::with_strategies(strategies, policy)
}

#[tokio::test]
async fn proxy_relay_unwraps_contents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("url", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "contents": SEARCH_PAGE })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(
        vec![
            Arc::new(ProxyRelayStrategy::new(
                fetcher(),
                vec![format!("{}/get?url=", server.uri())],
            )),
            Arc::new(SyntheticProductStrategy::new(20)),
        ],
        FallbackPolicy::Synthetic,
    );

    let result = client.fetch_records(TARGET, 50, &NoopProgress).await;

    assert!(result.success());
    assert_eq!(result.origin(), DataOrigin::Live);
    assert_eq!(result.total_count(), 2);
    assert_eq!(result.records()[0].product_id, "B08N5WRWNW");
    assert_eq!(
        result.records()[1].product_url,
        "https://www.amazon.sg/Memory-Foam/dp/B07XYZ4567"
    );
}

#[tokio::test]
async fn failing_proxy_falls_through_to_next_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(
        vec![Arc::new(ProxyRelayStrategy::new(
            fetcher(),
            vec![
                format!("{}/broken?u=", server.uri()),
                format!("{}/raw?u=", server.uri()),
            ],
        ))],
        FallbackPolicy::Synthetic,
    );

    let result = client.fetch_records(TARGET, 1, &NoopProgress).await;

    assert!(result.success());
    assert_eq!(result.total_count(), 1);
}

#[tokio::test]
async fn invalid_url_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(
        vec![Arc::new(ProxyRelayStrategy::new(
            fetcher(),
            vec![format!("{}/get?url=", server.uri())],
        ))],
        FallbackPolicy::Synthetic,
    );

    let result = client
        .fetch_records("https://notamazon.com/x", 10, &NoopProgress)
        .await;

    assert!(!result.success());
    assert_eq!(result.message(), "请输入有效的亚马逊网站链接");
    assert!(result.attempts().is_empty());
}

#[tokio::test]
async fn scraping_api_sends_key_and_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/"))
        .and(query_param("api_key", "secret"))
        .and(query_param("url", TARGET))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(
        vec![
            Arc::new(ScrapingApiStrategy::new(
                fetcher(),
                format!("{}/api/v1/", server.uri()),
                None,
            )),
            Arc::new(ScrapingApiStrategy::new(
                fetcher(),
                format!("{}/api/v1/", server.uri()),
                Some("secret".to_string()),
            )),
        ],
        FallbackPolicy::Synthetic,
    );

    let result = client.fetch_records(TARGET, 50, &NoopProgress).await;

    assert!(result.success());
    assert_eq!(result.total_count(), 2);
    // 第一个没有密钥，被跳过
    assert_eq!(result.attempts().len(), 2);
}

#[tokio::test]
async fn direct_strategy_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&server)
        .await;

    let strategy = DirectPageStrategy::new(fetcher());
    let products = strategy
        .fetch(&format!("{}/s?k=slippers", server.uri()), 50)
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].title, "Cloud Slippers");
}

#[tokio::test]
async fn exhausted_chain_without_synthetic_reports_no_live_data() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(
        vec![
            Arc::new(ProxyRelayStrategy::new(
                fetcher(),
                vec![format!("{}/get?url=", server.uri())],
            )),
            Arc::new(SyntheticProductStrategy::new(20)),
        ],
        FallbackPolicy::SurfaceNoLiveData,
    );

    let result = client.fetch_records(TARGET, 50, &NoopProgress).await;

    assert!(!result.success());
    assert!(result.message().contains("未获取到真实数据"));
    assert_eq!(result.origin(), DataOrigin::None);
}
