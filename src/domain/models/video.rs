// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{
    CellValue, FieldSpec, RowContext, TableRow, TableSchema,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 短视频记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub collect_count: u64,
    /// 发布时间 (ISO-8601)
    pub create_time: String,
    /// 时长（毫秒）
    pub duration_ms: u64,
    pub cover_url: String,
    pub play_url: String,
    pub description: String,
    /// 博主昵称
    pub nickname: String,
    /// 博主ID
    pub creator_id: String,
}

/// 博主概况
///
/// 由抓取到的视频列表聚合得出，不单独请求。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    pub creator_id: String,
    pub nickname: String,
    pub avatar_url: String,
    pub follower_count: u64,
    pub following_count: u64,
    /// 视频点赞总数
    pub like_count: u64,
    pub video_count: u64,
    pub description: String,
}

impl CreatorProfile {
    /// 对视频列表做折叠聚合
    ///
    /// 标识与昵称取第一个非空值，昵称缺失时使用查询名。
    pub fn from_videos(videos: &[VideoRecord], query_name: &str) -> Self {
        let mut profile = videos.iter().fold(CreatorProfile::default(), |mut acc, v| {
            if acc.creator_id.is_empty() && !v.creator_id.is_empty() {
                acc.creator_id = v.creator_id.clone();
            }
            if acc.nickname.is_empty() && !v.nickname.is_empty() {
                acc.nickname = v.nickname.clone();
            }
            acc.like_count = acc.like_count.saturating_add(v.like_count);
            acc.video_count += 1;
            acc
        });
        if profile.nickname.is_empty() {
            profile.nickname = query_name.to_string();
        }
        profile
    }
}

pub const FIELD_VIDEO_ID: &str = "video_id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_LIKE_COUNT: &str = "like_count";
pub const FIELD_COMMENT_COUNT: &str = "comment_count";
pub const FIELD_SHARE_COUNT: &str = "share_count";
pub const FIELD_COLLECT_COUNT: &str = "collect_count";
pub const FIELD_CREATE_TIME: &str = "create_time";
pub const FIELD_DURATION: &str = "duration";
pub const FIELD_NICKNAME: &str = "nickname";
pub const FIELD_CREATOR_ID: &str = "creator_id";
pub const FIELD_COVER_URL: &str = "cover_url";
pub const FIELD_PLAY_URL: &str = "play_url";
pub const FIELD_DESCRIPTION: &str = "description";

/// 视频表结构
pub static VIDEO_SCHEMA: TableSchema = TableSchema {
    seed: FieldSpec::text(FIELD_VIDEO_ID),
    fields: &[
        FieldSpec::text(FIELD_VIDEO_ID),
        FieldSpec::text(FIELD_TITLE),
        FieldSpec::number(FIELD_LIKE_COUNT),
        FieldSpec::number(FIELD_COMMENT_COUNT),
        FieldSpec::number(FIELD_SHARE_COUNT),
        FieldSpec::number(FIELD_COLLECT_COUNT),
        FieldSpec::text(FIELD_CREATE_TIME),
        FieldSpec::number(FIELD_DURATION),
        FieldSpec::text(FIELD_NICKNAME),
        FieldSpec::text(FIELD_CREATOR_ID),
        FieldSpec::text(FIELD_COVER_URL),
        FieldSpec::text(FIELD_PLAY_URL),
        FieldSpec::text(FIELD_DESCRIPTION),
    ],
};

/// 视频表名：`<博主>_videos_<毫秒时间戳>`
pub fn video_table_name(creator_name: &str, now: DateTime<Local>) -> String {
    format!("{}_videos_{}", creator_name.trim(), now.timestamp_millis())
}

fn non_empty(value: &str) -> Option<CellValue> {
    (!value.is_empty()).then(|| CellValue::text(value))
}

impl TableRow for VideoRecord {
    fn schema() -> &'static TableSchema {
        &VIDEO_SCHEMA
    }

    fn cell(&self, field: &str, _ctx: &RowContext) -> Option<CellValue> {
        match field {
            FIELD_VIDEO_ID => non_empty(&self.video_id),
            FIELD_TITLE => non_empty(&self.title),
            FIELD_LIKE_COUNT => Some(CellValue::Number(self.like_count as f64)),
            FIELD_COMMENT_COUNT => Some(CellValue::Number(self.comment_count as f64)),
            FIELD_SHARE_COUNT => Some(CellValue::Number(self.share_count as f64)),
            FIELD_COLLECT_COUNT => Some(CellValue::Number(self.collect_count as f64)),
            FIELD_CREATE_TIME => non_empty(&self.create_time),
            FIELD_DURATION => Some(CellValue::Number(self.duration_ms as f64)),
            FIELD_NICKNAME => non_empty(&self.nickname),
            FIELD_CREATOR_ID => non_empty(&self.creator_id),
            FIELD_COVER_URL => non_empty(&self.cover_url),
            FIELD_PLAY_URL => non_empty(&self.play_url),
            FIELD_DESCRIPTION => non_empty(&self.description),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, likes: u64, nickname: &str) -> VideoRecord {
        VideoRecord {
            video_id: id.into(),
            title: format!("video {}", id),
            like_count: likes,
            comment_count: 0,
            share_count: 0,
            collect_count: 0,
            create_time: "2025-01-01T00:00:00Z".into(),
            duration_ms: 1000,
            cover_url: String::new(),
            play_url: String::new(),
            description: String::new(),
            nickname: nickname.into(),
            creator_id: if nickname.is_empty() { String::new() } else { format!("uid_{}", nickname) },
        }
    }

    #[test]
    fn test_profile_is_folded_from_videos() {
        let videos = vec![video("1", 10, ""), video("2", 32, "阿木"), video("3", 8, "其他")];
        let profile = CreatorProfile::from_videos(&videos, "query");

        assert_eq!(profile.like_count, 50);
        assert_eq!(profile.video_count, 3);
        assert_eq!(profile.nickname, "阿木");
        assert_eq!(profile.creator_id, "uid_阿木");
    }

    #[test]
    fn test_profile_like_total_saturates() {
        let videos = vec![video("1", u64::MAX, "阿木"), video("2", 5, "阿木")];
        let profile = CreatorProfile::from_videos(&videos, "阿木");

        assert_eq!(profile.like_count, u64::MAX);
        assert_eq!(profile.video_count, 2);
    }

    #[test]
    fn test_empty_profile_uses_query_name() {
        let profile = CreatorProfile::from_videos(&[], "阿木");
        assert_eq!(profile.nickname, "阿木");
        assert_eq!(profile.video_count, 0);
        assert_eq!(profile.like_count, 0);
    }
}
