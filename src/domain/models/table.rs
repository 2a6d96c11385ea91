// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 字段值类型
///
/// 对应宿主多维表格的字段类型编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 多行文本
    Text,
    /// 数字
    Number,
    /// 超链接
    Url,
    /// 日期时间（毫秒时间戳）
    DateTime,
    /// 其他宿主类型，原样保留编码
    Other(u32),
}

impl FieldType {
    /// 宿主类型编码
    pub fn code(&self) -> u32 {
        match self {
            FieldType::Text => 1,
            FieldType::Number => 2,
            FieldType::DateTime => 5,
            FieldType::Url => 15,
            FieldType::Other(code) => *code,
        }
    }

    /// 根据宿主类型编码还原
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => FieldType::Text,
            2 => FieldType::Number,
            5 => FieldType::DateTime,
            15 => FieldType::Url,
            other => FieldType::Other(other),
        }
    }

    /// 缺失值时写入的默认单元格
    pub fn default_cell(&self) -> CellValue {
        match self {
            FieldType::Number | FieldType::DateTime => CellValue::Number(0.0),
            FieldType::Url => CellValue::Url {
                text: String::new(),
                link: String::new(),
            },
            FieldType::Text | FieldType::Other(_) => CellValue::Text(String::new()),
        }
    }
}

/// 必需字段定义：逻辑名 + 值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub const fn url(name: &'static str) -> Self {
        Self::new(name, FieldType::Url)
    }

    pub const fn datetime(name: &'static str) -> Self {
        Self::new(name, FieldType::DateTime)
    }
}

/// 表结构：建表时的种子列 + 全部必需字段
#[derive(Debug)]
pub struct TableSchema {
    pub seed: FieldSpec,
    pub fields: &'static [FieldSpec],
}

/// 宿主表句柄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableHandle {
    pub id: String,
    pub name: String,
}

/// 宿主表元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    pub id: String,
    pub name: String,
}

/// 宿主字段元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    pub id: String,
    pub name: String,
    pub field_type: FieldType,
}

/// 单元格值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Url { text: String, link: String },
    DateTime(i64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// 链接单元格，显示文本与链接相同
    pub fn link(value: impl Into<String>) -> Self {
        let link = value.into();
        CellValue::Url {
            text: link.clone(),
            link,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Url { link, .. } => Some(link),
            _ => None,
        }
    }
}

/// 一行数据，键为宿主字段ID
pub type Row = BTreeMap<String, CellValue>;

/// 逻辑字段名到宿主字段ID的映射
///
/// 每次写入时重新构建，不跨请求缓存。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldMap {
    entries: BTreeMap<String, String>,
}

impl FieldMap {
    /// 从字段列表中挑出必需字段，按名称精确匹配
    pub fn from_fields(fields: &[FieldMeta], required: &[FieldSpec]) -> Self {
        let entries = required
            .iter()
            .filter_map(|spec| {
                fields
                    .iter()
                    .find(|f| f.name == spec.name && !f.id.is_empty())
                    .map(|f| (spec.name.to_string(), f.id.clone()))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// 构建行数据时的上下文
#[derive(Debug, Clone, Copy)]
pub struct RowContext {
    /// 记录在整个写入序列中的位置（从1开始）
    pub position: usize,
    /// 本次抓取的时间
    pub fetched_at: DateTime<Utc>,
}

/// 可写入宿主表的记录
pub trait TableRow: Send + Sync {
    /// 该记录类型对应的表结构
    fn schema() -> &'static TableSchema
    where
        Self: Sized;

    /// 取逻辑字段的值；`None` 表示缺失，由写入器填充类型默认值
    fn cell(&self, field: &str, ctx: &RowContext) -> Option<CellValue>;
}
