// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::fmt;

/// 数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// 真实数据
    Live,
    /// 合成的演示数据
    Synthetic,
    /// 没有数据
    None,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataOrigin::Live => write!(f, "live"),
            DataOrigin::Synthetic => write!(f, "synthetic"),
            DataOrigin::None => write!(f, "none"),
        }
    }
}

/// 单个策略的执行结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// 获得记录
    Records(usize),
    /// 执行成功但没有记录
    Empty,
    /// 未执行（缺少凭据或被配置关闭）
    Skipped(String),
    /// 失败，已被吸收
    Failed(String),
}

/// 策略尝试记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyAttempt {
    pub strategy: String,
    pub outcome: AttemptOutcome,
}

/// 抓取结果
///
/// 构造后不再修改，只通过访问器读取。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult<R> {
    success: bool,
    message: String,
    records: Vec<R>,
    total_count: usize,
    origin: DataOrigin,
    attempts: Vec<StrategyAttempt>,
}

impl<R> CrawlResult<R> {
    /// 成功结果
    pub fn succeeded(
        records: Vec<R>,
        origin: DataOrigin,
        attempts: Vec<StrategyAttempt>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            total_count: records.len(),
            records,
            origin,
            attempts,
        }
    }

    /// 失败结果
    pub fn failed(message: impl Into<String>, attempts: Vec<StrategyAttempt>) -> Self {
        Self {
            success: false,
            message: message.into(),
            records: Vec::new(),
            total_count: 0,
            origin: DataOrigin::None,
            attempts,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn attempts(&self) -> &[StrategyAttempt] {
        &self.attempts
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}
