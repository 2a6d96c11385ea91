// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{
    CellValue, FieldSpec, RowContext, TableRow, TableSchema,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 电商商品记录
///
/// 同一次抓取结果内 `product_id` 唯一。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// 商品标识（ASIN 或生成的编号）
    pub product_id: String,
    /// 标题
    pub title: String,
    /// 展示价格（含币种）
    pub price: String,
    /// 原价
    pub original_price: Option<String>,
    /// 折扣
    pub discount: Option<String>,
    /// 评分 (0-5)
    pub rating: f64,
    /// 评论数
    pub review_count: u64,
    /// 图片地址
    pub image_url: String,
    /// 商品地址
    pub product_url: String,
    /// 描述
    pub description: String,
    /// 品牌
    pub brand: Option<String>,
    /// 分类
    pub category: String,
    /// 库存状态
    pub availability: String,
    /// 排名（从1开始）
    pub rank: Option<u32>,
}

pub const FIELD_PRODUCT_ID: &str = "产品ID";
pub const FIELD_TITLE: &str = "产品标题";
pub const FIELD_PRICE: &str = "价格";
pub const FIELD_ORIGINAL_PRICE: &str = "原价";
pub const FIELD_DISCOUNT: &str = "折扣";
pub const FIELD_RATING: &str = "评分";
pub const FIELD_REVIEW_COUNT: &str = "评论数";
pub const FIELD_IMAGE: &str = "产品图片";
pub const FIELD_LINK: &str = "产品链接";
pub const FIELD_DESCRIPTION: &str = "产品描述";
pub const FIELD_BRAND: &str = "品牌";
pub const FIELD_CATEGORY: &str = "分类";
pub const FIELD_AVAILABILITY: &str = "库存状态";
pub const FIELD_RANK: &str = "排名";

/// 商品表结构
pub static PRODUCT_SCHEMA: TableSchema = TableSchema {
    seed: FieldSpec::text(FIELD_PRODUCT_ID),
    fields: &[
        FieldSpec::text(FIELD_PRODUCT_ID),
        FieldSpec::text(FIELD_TITLE),
        FieldSpec::text(FIELD_PRICE),
        FieldSpec::text(FIELD_ORIGINAL_PRICE),
        FieldSpec::text(FIELD_DISCOUNT),
        FieldSpec::number(FIELD_RATING),
        FieldSpec::number(FIELD_REVIEW_COUNT),
        FieldSpec::url(FIELD_IMAGE),
        FieldSpec::url(FIELD_LINK),
        FieldSpec::text(FIELD_DESCRIPTION),
        FieldSpec::text(FIELD_BRAND),
        FieldSpec::text(FIELD_CATEGORY),
        FieldSpec::text(FIELD_AVAILABILITY),
        FieldSpec::number(FIELD_RANK),
    ],
};

/// 商品表名：`亚马逊产品数据_<站点>_<日期>`
pub fn product_table_name(site: &str, now: DateTime<Local>) -> String {
    format!("亚马逊产品数据_{}_{}", site, now.format("%Y-%-m-%-d"))
}

fn optional_text(value: &Option<String>) -> Option<CellValue> {
    value.as_ref().map(|v| CellValue::text(v.clone()))
}

impl TableRow for ProductRecord {
    fn schema() -> &'static TableSchema {
        &PRODUCT_SCHEMA
    }

    fn cell(&self, field: &str, _ctx: &RowContext) -> Option<CellValue> {
        match field {
            FIELD_PRODUCT_ID => Some(CellValue::text(self.product_id.clone())),
            FIELD_TITLE => Some(CellValue::text(self.title.clone())),
            FIELD_PRICE => Some(CellValue::text(self.price.clone())),
            FIELD_ORIGINAL_PRICE => optional_text(&self.original_price),
            FIELD_DISCOUNT => optional_text(&self.discount),
            FIELD_RATING => Some(CellValue::Number(self.rating)),
            FIELD_REVIEW_COUNT => Some(CellValue::Number(self.review_count as f64)),
            FIELD_IMAGE if !self.image_url.is_empty() => Some(CellValue::link(self.image_url.clone())),
            FIELD_LINK if !self.product_url.is_empty() => {
                Some(CellValue::link(self.product_url.clone()))
            }
            FIELD_DESCRIPTION => Some(CellValue::text(self.description.clone())),
            FIELD_BRAND => optional_text(&self.brand),
            FIELD_CATEGORY => Some(CellValue::text(self.category.clone())),
            FIELD_AVAILABILITY => Some(CellValue::text(self.availability.clone())),
            FIELD_RANK => self.rank.map(|r| CellValue::Number(r as f64)),
            _ => None,
        }
    }
}
