// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::router::FallbackPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 默认的公共代理中转服务，按顺序尝试
pub const DEFAULT_PROXY_ENDPOINTS: [&str; 3] = [
    "https://api.allorigins.win/get?url=",
    "https://cors-anywhere.herokuapp.com/",
    "https://thingproxy.freeboard.io/fetch/",
];

/// 默认工作流接口地址
pub const DEFAULT_WORKFLOW_ENDPOINT: &str = "https://api.coze.cn/v1/workflow/run";

/// 热榜工作流ID
pub const DEFAULT_HOT_TOPICS_WORKFLOW_ID: &str = "7542724146842026019";

/// 应用程序配置设置
///
/// 包含服务器、宿主表格、数据源、写入器和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 宿主多维表格配置
    pub bitable: BitableSettings,
    /// 数据源配置
    pub sources: SourceSettings,
    /// 写入器配置
    pub writer: WriterSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 宿主多维表格配置
///
/// `app_token` 与 `access_token` 任一缺失时使用内存表格（演练模式）
#[derive(Debug, Clone, Deserialize)]
pub struct BitableSettings {
    /// 开放平台地址
    pub base_url: String,
    /// 多维表格 app token
    pub app_token: Option<String>,
    /// 访问凭据
    pub access_token: Option<String>,
}

impl BitableSettings {
    /// 两个凭据都已配置时返回 `(app_token, access_token)`
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.app_token.as_deref(), self.access_token.as_deref()) {
            (Some(app), Some(token)) if !app.is_empty() && !token.is_empty() => Some((app, token)),
            _ => None,
        }
    }
}

/// 数据源配置
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 请求UA
    pub user_agent: String,
    /// 没有真实数据时的处理方式
    pub fallback_policy: FallbackPolicy,
    /// 商品数据源
    pub product: ProductSourceSettings,
    /// 工作流接口
    pub workflow: WorkflowSettings,
    /// 短视频数据源
    pub video: VideoSourceSettings,
}

impl SourceSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// 商品数据源配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSourceSettings {
    /// 代理中转服务前缀，目标URL编码后直接拼接
    pub proxy_endpoints: Vec<String>,
    /// 第三方抓取接口地址
    pub scraping_api_url: String,
    /// 第三方抓取接口密钥，未配置时跳过该方式
    pub scraping_api_key: Option<String>,
    /// 合成数据条数上限
    pub synthetic_limit: usize,
}

/// 工作流接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSettings {
    /// 接口地址
    pub endpoint: String,
    /// Bearer 凭据
    pub token: Option<String>,
    /// 热榜工作流ID
    pub hot_topics_workflow_id: String,
}

/// 短视频数据源配置
#[derive(Debug, Clone, Deserialize)]
pub struct VideoSourceSettings {
    /// 视频工作流ID，未配置时直接使用合成数据
    pub workflow_id: Option<String>,
    /// 合成数据条数上限
    pub synthetic_limit: usize,
}

/// 写入器配置
#[derive(Debug, Clone, Deserialize)]
pub struct WriterSettings {
    /// 清空旧表时每次删除的记录数
    pub clear_page_size: usize,
    /// 商品写入批次
    pub product: BatchSettings,
    /// 热榜写入批次
    pub hot_topics: BatchSettings,
    /// 视频写入批次
    pub video: BatchSettings,
}

/// 单个集成的批量写入参数
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BatchSettings {
    /// 每批记录数
    pub batch_size: usize,
    /// 批次间隔（毫秒）
    pub inter_batch_delay_ms: u64,
}

impl BatchSettings {
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }
}

/// 指标配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `BASECRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BASECRAWL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("sources.product.proxy_endpoints")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅包含默认值的配置
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Host base
            .set_default("bitable.base_url", "https://open.feishu.cn")?
            // Sources
            .set_default("sources.request_timeout_secs", 30)?
            .set_default(
                "sources.user_agent",
                crate::engines::reqwest_engine::DEFAULT_USER_AGENT,
            )?
            .set_default("sources.fallback_policy", "synthetic")?
            .set_default(
                "sources.product.proxy_endpoints",
                DEFAULT_PROXY_ENDPOINTS.to_vec(),
            )?
            .set_default(
                "sources.product.scraping_api_url",
                "https://app.scrapingbee.com/api/v1/",
            )?
            .set_default("sources.product.synthetic_limit", 20)?
            .set_default("sources.workflow.endpoint", DEFAULT_WORKFLOW_ENDPOINT)?
            .set_default(
                "sources.workflow.hot_topics_workflow_id",
                DEFAULT_HOT_TOPICS_WORKFLOW_ID,
            )?
            .set_default("sources.video.synthetic_limit", 10)?
            // Writer
            .set_default("writer.clear_page_size", 50)?
            .set_default("writer.product.batch_size", 10)?
            .set_default("writer.product.inter_batch_delay_ms", 200)?
            .set_default("writer.hot_topics.batch_size", 10)?
            .set_default("writer.hot_topics.inter_batch_delay_ms", 200)?
            .set_default("writer.video.batch_size", 5)?
            .set_default("writer.video.inter_batch_delay_ms", 1000)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
