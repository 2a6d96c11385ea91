// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_result::{
    AttemptOutcome, CrawlResult, DataOrigin, StrategyAttempt,
};
use crate::domain::progress::ProgressObserver;
use crate::engines::traits::{SourceError, SourceStrategy, StrategyKind};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 没有真实数据时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// 使用合成数据兜底，结果标记为 synthetic
    #[default]
    Synthetic,
    /// 不使用合成数据，直接报告“没有真实数据”
    SurfaceNoLiveData,
}

/// 策略链
///
/// 严格按顺序尝试策略，第一个返回至少一条记录的策略即为结果；
/// 单个策略的失败只记录，不会中断后续策略。
pub struct StrategyChain<R> {
    source: &'static str,
    strategies: Vec<Arc<dyn SourceStrategy<R>>>,
    policy: FallbackPolicy,
}

impl<R: Send> StrategyChain<R> {
    /// 创建策略链
    ///
    /// # 参数
    ///
    /// * `source` - 数据源名称，用于日志与指标
    /// * `strategies` - 按优先级排列的策略
    /// * `policy` - 合成数据兜底策略
    pub fn new(
        source: &'static str,
        strategies: Vec<Arc<dyn SourceStrategy<R>>>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            source,
            strategies,
            policy,
        }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// 策略名称（按顺序）
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// 依次执行策略
    ///
    /// # 参数
    ///
    /// * `query` - 已校验的查询
    /// * `max_count` - 返回记录上限，多余部分截断
    /// * `progress` - 进度观察者
    pub async fn run(
        &self,
        query: &str,
        max_count: usize,
        progress: &dyn ProgressObserver,
    ) -> CrawlResult<R> {
        let start_time = Instant::now();
        let mut attempts = Vec::with_capacity(self.strategies.len());

        if max_count == 0 {
            progress.report(100.0, "最大数量为 0，未发起请求");
            return CrawlResult::succeeded(
                Vec::new(),
                DataOrigin::None,
                attempts,
                "最大数量为 0，未发起请求",
            );
        }

        progress.report(5.0, "开始获取数据...");
        let total = self.strategies.len().max(1) as f64;
        let mut last_error: Option<String> = None;

        for (index, strategy) in self.strategies.iter().enumerate() {
            let name = strategy.name();
            let is_synthetic = strategy.kind() == StrategyKind::Synthetic;

            if is_synthetic && self.policy == FallbackPolicy::SurfaceNoLiveData {
                info!("[{}] synthetic fallback {} disabled by policy", self.source, name);
                attempts.push(StrategyAttempt {
                    strategy: name.to_string(),
                    outcome: AttemptOutcome::Skipped("合成数据已被配置禁用".to_string()),
                });
                continue;
            }

            let percent = 10.0 + index as f64 / total * 80.0;
            progress.report(
                percent,
                &format!("尝试方法{}: {}...", index + 1, strategy.label()),
            );
            info!("[{}] trying strategy {} for {}", self.source, name, query);

            let strategy_start = Instant::now();
            match strategy.fetch(query, max_count).await {
                Ok(records) if !records.is_empty() => {
                    let mut records = records;
                    records.truncate(max_count);
                    let count = records.len();
                    attempts.push(StrategyAttempt {
                        strategy: name.to_string(),
                        outcome: AttemptOutcome::Records(count),
                    });

                    let origin = if is_synthetic {
                        DataOrigin::Synthetic
                    } else {
                        DataOrigin::Live
                    };
                    metrics::counter!(
                        "basecrawl_records_fetched_total",
                        "source" => self.source,
                        "origin" => origin.to_string()
                    )
                    .increment(count as u64);

                    let message = if is_synthetic {
                        warn!(
                            "[{}] no live data, using {} synthetic records",
                            self.source, count
                        );
                        format!("真实抓取失败，已使用 {} 条演示数据", count)
                    } else {
                        format!("成功抓取 {} 条数据", count)
                    };

                    info!(
                        "[{}] strategy {} returned {} records in {:?}, total time: {:?}",
                        self.source,
                        name,
                        count,
                        strategy_start.elapsed(),
                        start_time.elapsed()
                    );
                    progress.report(100.0, &message);
                    return CrawlResult::succeeded(records, origin, attempts, message);
                }
                Ok(_) => {
                    info!("[{}] strategy {} returned no records", self.source, name);
                    attempts.push(StrategyAttempt {
                        strategy: name.to_string(),
                        outcome: AttemptOutcome::Empty,
                    });
                }
                Err(SourceError::MissingCredential(what)) => {
                    info!("[{}] strategy {} skipped: missing {}", self.source, name, what);
                    attempts.push(StrategyAttempt {
                        strategy: name.to_string(),
                        outcome: AttemptOutcome::Skipped(format!("未配置 {}", what)),
                    });
                }
                Err(e) => {
                    warn!(
                        "[{}] strategy {} failed: {}, trying next strategy",
                        self.source, name, e
                    );
                    metrics::counter!("basecrawl_strategy_failures_total", "strategy" => name)
                        .increment(1);
                    last_error = Some(e.to_string());
                    attempts.push(StrategyAttempt {
                        strategy: name.to_string(),
                        outcome: AttemptOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        warn!(
            "[{}] all strategies exhausted without data after {:?}",
            self.source,
            start_time.elapsed()
        );
        let message = match last_error {
            Some(e) => format!("未获取到真实数据: {}", e),
            None => "未获取到真实数据: 所有抓取方式均未返回数据".to_string(),
        };
        progress.report(100.0, &message);
        CrawlResult::failed(message, attempts)
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
