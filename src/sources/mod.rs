// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据源模块
///
/// 每个集成一个客户端：商品列表、热榜、短视频
pub mod hot_topics;
pub mod product;
pub mod validators;
pub mod video;
pub mod workflow;

use crate::domain::models::crawl_result::CrawlResult;
use crate::domain::models::table::TableRow;
use crate::domain::progress::ProgressObserver;
use crate::engines::router::StrategyChain;
use crate::engines::traits::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::warn;

/// 数据源客户端
///
/// 校验查询后按策略链取数；查询不合法时不发起任何网络请求。
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// 记录类型
    type Record: TableRow + 'static;

    /// 数据源名称
    fn source(&self) -> &'static str;

    /// 校验并规范化查询
    fn validate(&self, query: &str) -> Result<String, SourceError>;

    /// 策略链
    fn chain(&self) -> &StrategyChain<Self::Record>;

    /// 目标表名
    fn table_name(&self, query: &str, now: DateTime<Local>) -> String;

    /// 获取记录
    ///
    /// # 参数
    ///
    /// * `query` - 原始查询
    /// * `max_count` - 返回记录上限
    /// * `progress` - 进度观察者
    async fn fetch_records(
        &self,
        query: &str,
        max_count: usize,
        progress: &dyn ProgressObserver,
    ) -> CrawlResult<Self::Record> {
        let query = match self.validate(query) {
            Ok(query) => query,
            Err(e) => {
                warn!("[{}] rejected query {:?}: {}", self.source(), query, e);
                let message = match e {
                    SourceError::InvalidInput(msg) => msg,
                    other => other.to_string(),
                };
                return CrawlResult::failed(message, Vec::new());
            }
        };
        self.chain().run(&query, max_count, progress).await
    }
}
