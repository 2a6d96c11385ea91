// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod parser;
pub mod strategies;
pub mod synthetic;

use crate::config::settings::SourceSettings;
use crate::domain::models::product::{product_table_name, ProductRecord};
use crate::engines::reqwest_engine::HttpFetcher;
use crate::engines::router::{FallbackPolicy, StrategyChain};
use crate::engines::traits::{SourceError, SourceStrategy};
use crate::sources::validators::validate_product_url;
use crate::sources::SourceClient;
use crate::utils::url_utils::site_name;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;
use strategies::{DirectPageStrategy, ProxyRelayStrategy, ScrapingApiStrategy, SyntheticProductStrategy};

/// 电商商品列表客户端
///
/// 策略顺序：直接请求 → 代理中转 → 第三方接口 → 演示数据
pub struct ProductClient {
    chain: StrategyChain<ProductRecord>,
}

impl ProductClient {
    /// 按配置组装策略链
    pub fn new(fetcher: HttpFetcher, settings: &SourceSettings) -> Self {
        let product = &settings.product;
        let strategies: Vec<Arc<dyn SourceStrategy<ProductRecord>>> = vec![
            Arc::new(DirectPageStrategy::new(fetcher.clone())),
            Arc::new(ProxyRelayStrategy::new(
                fetcher.clone(),
                product.proxy_endpoints.clone(),
            )),
            Arc::new(ScrapingApiStrategy::new(
                fetcher,
                product.scraping_api_url.clone(),
                product.scraping_api_key.clone(),
            )),
            Arc::new(SyntheticProductStrategy::new(product.synthetic_limit)),
        ];
        Self::with_strategies(strategies, settings.fallback_policy)
    }

    /// 使用自定义策略
    pub fn with_strategies(
        strategies: Vec<Arc<dyn SourceStrategy<ProductRecord>>>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            chain: StrategyChain::new("product", strategies, policy),
        }
    }
}

#[async_trait]
impl SourceClient for ProductClient {
    type Record = ProductRecord;

    fn source(&self) -> &'static str {
        "product"
    }

    fn validate(&self, query: &str) -> Result<String, SourceError> {
        validate_product_url(query)
    }

    fn chain(&self) -> &StrategyChain<ProductRecord> {
        &self.chain
    }

    fn table_name(&self, query: &str, now: DateTime<Local>) -> String {
        let site = site_name(query.trim()).unwrap_or_else(|_| "amazon".to_string());
        product_table_name(&site, now)
    }
}
