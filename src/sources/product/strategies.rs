// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::ProductRecord;
use crate::engines::reqwest_engine::HttpFetcher;
use crate::engines::traits::{SourceError, SourceStrategy, StrategyKind};
use crate::sources::product::parser::parse_products;
use crate::sources::product::synthetic::generate_products;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};
use url::Url;

fn page_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "Accept".to_string(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
    );
    headers.insert("Accept-Language".to_string(), "en-US,en;q=0.9".to_string());
    headers
}

/// 直接请求商品页
pub struct DirectPageStrategy {
    fetcher: HttpFetcher,
}

impl DirectPageStrategy {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SourceStrategy<ProductRecord> for DirectPageStrategy {
    async fn fetch(&self, query: &str, _max_count: usize) -> Result<Vec<ProductRecord>, SourceError> {
        let html = self.fetcher.get_text(query, &page_headers()).await?;
        Ok(parse_products(&html, query))
    }

    fn name(&self) -> &'static str {
        "direct"
    }

    fn label(&self) -> &'static str {
        "直接请求"
    }
}

/// 经公共代理中转
///
/// 依次尝试每个代理；代理返回 `{"contents": "..."}` 时取其中的页面，否则把响应当作页面本身。
pub struct ProxyRelayStrategy {
    fetcher: HttpFetcher,
    endpoints: Vec<String>,
}

impl ProxyRelayStrategy {
    pub fn new(fetcher: HttpFetcher, endpoints: Vec<String>) -> Self {
        Self { fetcher, endpoints }
    }
}

/// 从代理响应中取出页面内容
pub fn relay_contents(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(map)) => match map.get("contents") {
            Some(Value::String(contents)) => contents.clone(),
            _ => body,
        },
        Ok(Value::String(contents)) => contents,
        _ => body,
    }
}

#[async_trait]
impl SourceStrategy<ProductRecord> for ProxyRelayStrategy {
    async fn fetch(&self, query: &str, _max_count: usize) -> Result<Vec<ProductRecord>, SourceError> {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            let proxy_url = format!("{}{}", endpoint, urlencoding::encode(query));
            match self.fetcher.get_text(&proxy_url, &HashMap::new()).await {
                Ok(body) => {
                    let products = parse_products(&relay_contents(body), query);
                    if !products.is_empty() {
                        info!("Proxy {} returned {} products", endpoint, products.len());
                        return Ok(products);
                    }
                    debug!("Proxy {} returned no products", endpoint);
                }
                Err(e) => {
                    info!("Proxy {} failed: {}", endpoint, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &'static str {
        "proxy"
    }

    fn label(&self) -> &'static str {
        "使用代理服务"
    }
}

/// 第三方抓取接口，未配置密钥时跳过
pub struct ScrapingApiStrategy {
    fetcher: HttpFetcher,
    endpoint: String,
    api_key: Option<String>,
}

impl ScrapingApiStrategy {
    pub fn new(fetcher: HttpFetcher, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl SourceStrategy<ProductRecord> for ScrapingApiStrategy {
    async fn fetch(&self, query: &str, _max_count: usize) -> Result<Vec<ProductRecord>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SourceError::MissingCredential("scraping_api_key"))?;

        let request_url =
            Url::parse_with_params(&self.endpoint, &[("api_key", api_key), ("url", query)])
                .map_err(|e| SourceError::Other(format!("invalid scraping api url: {}", e)))?;
        let html = self
            .fetcher
            .get_text(request_url.as_str(), &HashMap::new())
            .await?;
        Ok(parse_products(&html, query))
    }

    fn name(&self) -> &'static str {
        "scraping_api"
    }

    fn label(&self) -> &'static str {
        "第三方API"
    }
}

/// 演示数据兜底
pub struct SyntheticProductStrategy {
    limit: usize,
}

impl SyntheticProductStrategy {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl SourceStrategy<ProductRecord> for SyntheticProductStrategy {
    async fn fetch(&self, query: &str, max_count: usize) -> Result<Vec<ProductRecord>, SourceError> {
        Ok(generate_products(query, max_count.min(self.limit)))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn label(&self) -> &'static str {
        "演示数据"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Synthetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_contents_unwraps_allorigins_payload() {
        let body = r#"{"contents":"<html>ok</html>","status":{"http_code":200}}"#.to_string();
        assert_eq!(relay_contents(body), "<html>ok</html>");
    }

    #[test]
    fn test_relay_contents_keeps_raw_html() {
        let body = "<html><body>raw</body></html>".to_string();
        assert_eq!(relay_contents(body.clone()), body);
    }

    #[tokio::test]
    async fn test_scraping_api_without_key_is_skipped() {
        let fetcher = HttpFetcher::new(std::time::Duration::from_secs(1), "test").unwrap();
        let strategy = ScrapingApiStrategy::new(fetcher, "http://127.0.0.1:9/".into(), None);
        let err = strategy
            .fetch("https://www.amazon.sg/s?k=tea", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_synthetic_respects_limit() {
        let strategy = SyntheticProductStrategy::new(20);
        let products = strategy.fetch("https://www.amazon.sg/", 50).await.unwrap();
        assert_eq!(products.len(), 20);
        assert_eq!(strategy.kind(), StrategyKind::Synthetic);
    }
}
