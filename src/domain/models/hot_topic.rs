// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::de::{lenient_f64, lenient_string};
use crate::domain::models::table::{
    CellValue, FieldSpec, RowContext, TableRow, TableSchema,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 热榜条目
///
/// 没有独立标识，插入顺序即排名。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotTopicItem {
    /// 热榜内容
    #[serde(rename = "hot_content", alias = "content", default, deserialize_with = "lenient_string")]
    pub content: String,
    /// 热榜类型（热、新、热议……），可能为空
    #[serde(rename = "hot_type", alias = "type", default, deserialize_with = "lenient_string")]
    pub topic_type: String,
    /// 热度值（非负）
    #[serde(rename = "hot_value", alias = "value", default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

impl HotTopicItem {
    pub fn new(content: impl Into<String>, topic_type: impl Into<String>, value: f64) -> Self {
        Self {
            content: content.into(),
            topic_type: topic_type.into(),
            value: value.max(0.0),
        }
    }

    /// 热度展示文本
    pub fn value_display(&self) -> String {
        format_hot_value(self.value)
    }

    /// 类型展示文本
    pub fn type_display(&self) -> String {
        hot_type_display(&self.topic_type)
    }
}

/// 格式化热度值：千万 / 万 / 原值
pub fn format_hot_value(value: f64) -> String {
    if value >= 10_000_000.0 {
        format!("{:.1}千万", value / 10_000_000.0)
    } else if value >= 10_000.0 {
        format!("{:.1}万", value / 10_000.0)
    } else {
        value.to_string()
    }
}

/// 类型为空时显示为“普通”
pub fn hot_type_display(topic_type: &str) -> String {
    if topic_type.trim().is_empty() {
        "普通".to_string()
    } else {
        topic_type.to_string()
    }
}

pub const FIELD_RANK: &str = "排名";
pub const FIELD_CONTENT: &str = "热榜内容";
pub const FIELD_TYPE: &str = "热榜类型";
pub const FIELD_VALUE: &str = "热度值";
pub const FIELD_VALUE_DISPLAY: &str = "热度显示";
pub const FIELD_FETCHED_AT: &str = "获取时间";

/// 热榜表结构
pub static HOT_TOPIC_SCHEMA: TableSchema = TableSchema {
    seed: FieldSpec::number(FIELD_RANK),
    fields: &[
        FieldSpec::number(FIELD_RANK),
        FieldSpec::text(FIELD_CONTENT),
        FieldSpec::text(FIELD_TYPE),
        FieldSpec::number(FIELD_VALUE),
        FieldSpec::text(FIELD_VALUE_DISPLAY),
        FieldSpec::datetime(FIELD_FETCHED_AT),
    ],
};

/// 热榜表名：`抖音热榜_<日期>_<时间>`
pub fn hot_topic_table_name(now: DateTime<Local>) -> String {
    format!("抖音热榜_{}", now.format("%Y-%-m-%-d_%H-%M-%S"))
}

impl TableRow for HotTopicItem {
    fn schema() -> &'static TableSchema {
        &HOT_TOPIC_SCHEMA
    }

    fn cell(&self, field: &str, ctx: &RowContext) -> Option<CellValue> {
        match field {
            FIELD_RANK => Some(CellValue::Number(ctx.position as f64)),
            FIELD_CONTENT => Some(CellValue::text(self.content.clone())),
            FIELD_TYPE => Some(CellValue::text(self.type_display())),
            FIELD_VALUE => Some(CellValue::Number(self.value)),
            FIELD_VALUE_DISPLAY => Some(CellValue::text(self.value_display())),
            FIELD_FETCHED_AT => Some(CellValue::DateTime(ctx.fetched_at.timestamp_millis())),
            _ => None,
        }
    }
}
