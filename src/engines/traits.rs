// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::json_unwrap::UnwrapError;
use async_trait::async_trait;
use thiserror::Error;

/// 数据源错误类型
///
/// 除 `InvalidInput` 外，其余错误都只影响单个策略，由策略链吸收。
#[derive(Error, Debug)]
pub enum SourceError {
    /// 查询参数不合法
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 响应
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },
    /// 响应格式错误
    #[error("Malformed response: {reason}; raw: {snippet}")]
    MalformedResponse { reason: String, snippet: String },
    /// 接口返回业务错误码
    #[error("API error {code}: {msg}")]
    Api { code: i64, msg: String },
    /// 未配置凭据
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl SourceError {
    pub fn malformed(reason: impl Into<String>, raw: &str) -> Self {
        SourceError::MalformedResponse {
            reason: reason.into(),
            snippet: crate::utils::json_unwrap::snippet(raw),
        }
    }
}

impl From<UnwrapError> for SourceError {
    fn from(err: UnwrapError) -> Self {
        SourceError::MalformedResponse {
            snippet: err.snippet().to_string(),
            reason: err.to_string(),
        }
    }
}

/// 策略类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// 真实数据源
    Live,
    /// 合成数据，仅作最后兜底
    Synthetic,
}

/// 数据获取策略
///
/// 一种具体的取数方式：直连、代理中转、第三方接口或合成数据。
#[async_trait]
pub trait SourceStrategy<R>: Send + Sync {
    /// 执行一次获取，返回的记录数可能超过 `max_count`，由策略链截断
    async fn fetch(&self, query: &str, max_count: usize) -> Result<Vec<R>, SourceError>;

    /// 策略名称
    fn name(&self) -> &'static str;

    /// 展示给用户的描述
    fn label(&self) -> &'static str {
        self.name()
    }

    /// 策略类别
    fn kind(&self) -> StrategyKind {
        StrategyKind::Live
    }
}
