// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 未指定时的最大抓取数量
pub const DEFAULT_MAX_COUNT: usize = 50;

/// 商品抓取请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ProductCrawlRequestDto {
    /// 商品列表页地址
    #[validate(length(min = 1, message = "请输入亚马逊网站链接"))]
    pub url: String,
    #[validate(range(min = 1, max = 500, message = "最大数量需在 1-500 之间"))]
    pub max_count: Option<usize>,
}

/// 热榜抓取请求
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct HotTopicsCrawlRequestDto {
    #[validate(range(min = 1, max = 500, message = "最大数量需在 1-500 之间"))]
    pub max_count: Option<usize>,
}

/// 博主视频抓取请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct VideoCrawlRequestDto {
    /// 博主名称
    #[validate(length(min = 1, message = "请输入博主名称"))]
    pub creator_name: String,
    #[validate(range(min = 1, max = 500, message = "最大数量需在 1-500 之间"))]
    pub max_count: Option<usize>,
}

/// 取请求中的数量，缺省为 [`DEFAULT_MAX_COUNT`]
pub fn max_count_or_default(max_count: Option<usize>) -> usize {
    max_count.unwrap_or(DEFAULT_MAX_COUNT)
}
