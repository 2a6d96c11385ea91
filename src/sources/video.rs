// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SourceSettings;
use crate::domain::models::de::{lenient_string, lenient_u64};
use crate::domain::models::video::{video_table_name, CreatorProfile, VideoRecord};
use crate::engines::router::{FallbackPolicy, StrategyChain};
use crate::engines::traits::{SourceError, SourceStrategy, StrategyKind};
use crate::sources::validators::validate_creator_name;
use crate::sources::workflow::WorkflowClient;
use crate::sources::SourceClient;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// 工作流返回的单条视频，字段名兼容多种写法
#[derive(Debug, Deserialize)]
struct VideoPayload {
    #[serde(default, alias = "aweme_id", alias = "id", deserialize_with = "lenient_string")]
    video_id: String,
    #[serde(default, alias = "desc", deserialize_with = "lenient_string")]
    title: String,
    #[serde(default, alias = "digg_count", deserialize_with = "lenient_u64")]
    like_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    comment_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    share_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    collect_count: u64,
    #[serde(default)]
    create_time: Value,
    #[serde(default, alias = "duration_ms", deserialize_with = "lenient_u64")]
    duration: u64,
    #[serde(default, alias = "cover", deserialize_with = "lenient_string")]
    cover_url: String,
    #[serde(default, alias = "play_addr", alias = "video_url", deserialize_with = "lenient_string")]
    play_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(default, alias = "author", deserialize_with = "lenient_string")]
    nickname: String,
    #[serde(default, alias = "author_id", alias = "sec_uid", deserialize_with = "lenient_string")]
    creator_id: String,
}

/// 发布时间统一为 ISO-8601：秒级/毫秒级时间戳会被转换，字符串原样保留
fn normalize_create_time(value: &Value) -> String {
    let from_timestamp = |ts: i64| {
        let ts = if ts > 1_000_000_000_000 { ts / 1000 } else { ts };
        Utc.timestamp_opt(ts, 0)
            .single()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    };
    match value {
        Value::Number(n) => n.as_i64().map(from_timestamp).unwrap_or_default(),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(ts) => from_timestamp(ts),
            Err(_) => s.trim().to_string(),
        },
        _ => String::new(),
    }
}

impl VideoPayload {
    fn into_record(self, fallback_nickname: &str) -> VideoRecord {
        let create_time = normalize_create_time(&self.create_time);
        VideoRecord {
            description: if self.description.is_empty() {
                self.title.clone()
            } else {
                self.description
            },
            video_id: self.video_id,
            title: self.title,
            like_count: self.like_count,
            comment_count: self.comment_count,
            share_count: self.share_count,
            collect_count: self.collect_count,
            create_time,
            duration_ms: self.duration,
            cover_url: self.cover_url,
            play_url: self.play_url,
            nickname: if self.nickname.is_empty() {
                fallback_nickname.to_string()
            } else {
                self.nickname
            },
            creator_id: self.creator_id,
        }
    }
}

/// 将工作流输出转换为视频记录
///
/// 输出可以是视频数组，也可以是带 `videos` / `aweme_list` 数组的对象。
pub fn parse_videos(output: Value, creator_name: &str) -> Result<Vec<VideoRecord>, SourceError> {
    let items = match output {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("videos").or_else(|| map.remove("aweme_list")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SourceError::malformed(
                    "videos array not found",
                    &Value::Object(map).to_string(),
                ))
            }
        },
        other => {
            return Err(SourceError::malformed(
                "videos array not found",
                &other.to_string(),
            ))
        }
    };

    items
        .into_iter()
        .map(|item| {
            let raw = item.to_string();
            serde_json::from_value::<VideoPayload>(item)
                .map(|p| p.into_record(creator_name))
                .map_err(|e| SourceError::malformed(format!("invalid video: {}", e), &raw))
        })
        .collect()
}

/// 通过工作流获取博主视频
pub struct VideoWorkflowStrategy {
    client: Arc<WorkflowClient>,
    workflow_id: Option<String>,
}

impl VideoWorkflowStrategy {
    pub fn new(client: Arc<WorkflowClient>, workflow_id: Option<String>) -> Self {
        Self {
            client,
            workflow_id,
        }
    }
}

#[async_trait]
impl SourceStrategy<VideoRecord> for VideoWorkflowStrategy {
    async fn fetch(&self, query: &str, _max_count: usize) -> Result<Vec<VideoRecord>, SourceError> {
        let workflow_id = self
            .workflow_id
            .as_deref()
            .ok_or(SourceError::MissingCredential("video workflow id"))?;
        let output = self.client.run(workflow_id, query).await?;
        let videos = parse_videos(output, query)?;

        let profile = CreatorProfile::from_videos(&videos, query);
        info!(
            "Creator {} ({}): {} videos, {} likes in total",
            profile.nickname, profile.creator_id, profile.video_count, profile.like_count
        );
        Ok(videos)
    }

    fn name(&self) -> &'static str {
        "workflow"
    }

    fn label(&self) -> &'static str {
        "视频工作流"
    }
}

/// 由博主名得到稳定的随机种子 (FNV-1a)
fn seed_for(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

/// 生成演示视频，同一博主名结果相同
pub fn generate_videos(creator_name: &str, count: usize) -> Vec<VideoRecord> {
    let seed = seed_for(creator_name);
    let mut rng = StdRng::seed_from_u64(seed);
    let creator_id = format!("synthetic_{:016x}", seed);
    let base_time = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().unwrap_or_default();

    (0..count)
        .map(|i| {
            let n = i + 1;
            VideoRecord {
                video_id: format!("{}_{}", creator_id, n),
                title: format!("{} 的作品 #{}", creator_name, n),
                like_count: rng.random_range(100..500_000),
                comment_count: rng.random_range(10..20_000),
                share_count: rng.random_range(0..10_000),
                collect_count: rng.random_range(0..30_000),
                create_time: (base_time - Duration::days(i as i64)).to_rfc3339(),
                duration_ms: rng.random_range(5_000..180_000),
                cover_url: String::new(),
                play_url: String::new(),
                description: format!("演示数据：{} 的第 {} 个视频", creator_name, n),
                nickname: creator_name.to_string(),
                creator_id: creator_id.clone(),
            }
        })
        .collect()
}

/// 演示视频兜底
pub struct SyntheticVideoStrategy {
    limit: usize,
}

impl SyntheticVideoStrategy {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl SourceStrategy<VideoRecord> for SyntheticVideoStrategy {
    async fn fetch(&self, query: &str, max_count: usize) -> Result<Vec<VideoRecord>, SourceError> {
        Ok(generate_videos(query, max_count.min(self.limit)))
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

/// 短视频客户端
///
/// 策略顺序：视频工作流 → 演示数据
pub struct VideoClient {
    chain: StrategyChain<VideoRecord>,
}

impl VideoClient {
    pub fn new(client: Arc<WorkflowClient>, settings: &SourceSettings) -> Self {
        let strategies: Vec<Arc<dyn SourceStrategy<VideoRecord>>> = vec![
            Arc::new(VideoWorkflowStrategy::new(
                client,
                settings.video.workflow_id.clone(),
            )),
            Arc::new(SyntheticVideoStrategy::new(settings.video.synthetic_limit)),
        ];
        Self::with_strategies(strategies, settings.fallback_policy)
    }

    pub fn with_strategies(
        strategies: Vec<Arc<dyn SourceStrategy<VideoRecord>>>,
        policy: FallbackPolicy,
    ) -> Self {
        Self {
            chain: StrategyChain::new("video", strategies, policy),
        }
    }
}

#[async_trait]
impl SourceClient for VideoClient {
    type Record = VideoRecord;

    fn source(&self) -> &'static str {
        "video"
    }

    fn validate(&self, query: &str) -> Result<String, SourceError> {
        validate_creator_name(query)
    }

    fn chain(&self) -> &StrategyChain<VideoRecord> {
        &self.chain
    }

    fn table_name(&self, query: &str, now: DateTime<Local>) -> String {
        video_table_name(query, now)
    }
}
