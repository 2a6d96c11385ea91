// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::SourceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// 默认浏览器 UA
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP 抓取客户端
///
/// 基于reqwest，所有数据源共用；非 2xx 响应一律视为错误。
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求超时
    /// * `user_agent` - 请求UA
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    /// 以 GET 获取文本
    pub async fn get_text(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<String, SourceError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .headers(build_headers(headers))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content = response.text().await?;
        debug!(
            "GET {} -> {} bytes in {:?}",
            url,
            content.len(),
            start.elapsed()
        );
        Ok(content)
    }

    /// 以 Bearer 凭据 POST JSON，返回原始响应文本
    pub async fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &Value,
    ) -> Result<String, SourceError> {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", bearer_token))
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content = response.text().await?;
        debug!(
            "POST {} -> {} bytes in {:?}",
            url,
            content.len(),
            start.elapsed()
        );
        Ok(content)
    }
}

/// 构造请求头，忽略非法的键值
fn build_headers(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (k, v) in headers {
        if let (Ok(k), Ok(v)) = (
            HeaderName::from_bytes(k.as_bytes()),
            HeaderValue::from_str(v),
        ) {
            map.insert(k, v);
        }
    }
    map
}
