// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;

#[test]
fn test_defaults_match_integration_tuning() {
    let settings = Settings::from_defaults().expect("defaults should deserialize");

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.writer.clear_page_size, 50);
    assert_eq!(settings.writer.product.batch_size, 10);
    assert_eq!(settings.writer.product.inter_batch_delay_ms, 200);
    assert_eq!(settings.writer.hot_topics.batch_size, 10);
    assert_eq!(settings.writer.video.batch_size, 5);
    assert_eq!(
        settings.writer.video.inter_batch_delay(),
        Duration::from_millis(1000)
    );
    assert_eq!(settings.sources.fallback_policy, FallbackPolicy::Synthetic);
    assert_eq!(settings.sources.product.synthetic_limit, 20);
    assert_eq!(settings.sources.video.synthetic_limit, 10);
    assert_eq!(settings.sources.product.proxy_endpoints.len(), 3);
    assert_eq!(
        settings.sources.workflow.hot_topics_workflow_id,
        DEFAULT_HOT_TOPICS_WORKFLOW_ID
    );
    assert!(settings.sources.product.scraping_api_key.is_none());
    assert!(!settings.metrics.enabled);
}

#[test]
fn test_memory_host_when_credentials_missing() {
    let mut bitable = Settings::from_defaults().unwrap().bitable;
    assert!(bitable.credentials().is_none());

    bitable.app_token = Some("app".into());
    assert!(bitable.credentials().is_none());

    bitable.access_token = Some(String::new());
    assert!(bitable.credentials().is_none());

    bitable.access_token = Some("token".into());
    assert_eq!(bitable.credentials(), Some(("app", "token")));
}

#[test]
fn test_request_timeout_has_floor() {
    let mut sources = Settings::from_defaults().unwrap().sources;
    sources.request_timeout_secs = 0;
    assert_eq!(sources.request_timeout(), Duration::from_secs(1));
}
