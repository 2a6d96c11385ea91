// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::SourceError;
use url::Url;

/// 允许抓取的商品站点
pub const ALLOWED_PRODUCT_DOMAINS: [&str; 11] = [
    "amazon.com",
    "amazon.sg",
    "amazon.co.uk",
    "amazon.de",
    "amazon.fr",
    "amazon.it",
    "amazon.es",
    "amazon.ca",
    "amazon.com.au",
    "amazon.co.jp",
    "amazon.in",
];

/// 博主名称最大字符数
pub const MAX_CREATOR_NAME_CHARS: usize = 50;

/// 主机名是否属于允许的站点（裸域名、`www.` 或任意子域名）
pub fn is_allowed_product_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    ALLOWED_PRODUCT_DOMAINS.iter().any(|domain| {
        host == *domain || host.strip_suffix(domain).is_some_and(|p| p.ends_with('.'))
    })
}

/// 校验商品列表页地址
///
/// # 返回值
///
/// * `Ok(String)` - 去除首尾空白后的地址
/// * `Err(SourceError::InvalidInput)` - 不是允许站点的 http(s) 地址
pub fn validate_product_url(raw: &str) -> Result<String, SourceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SourceError::InvalidInput("请输入亚马逊网站链接".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|_| SourceError::InvalidInput("请输入有效的亚马逊网站链接".to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SourceError::InvalidInput(
            "请输入有效的亚马逊网站链接".to_string(),
        ));
    }

    match url.host_str() {
        Some(host) if is_allowed_product_host(host) => Ok(trimmed.to_string()),
        _ => Err(SourceError::InvalidInput(
            "请输入有效的亚马逊网站链接".to_string(),
        )),
    }
}

/// 校验博主名称：去除首尾空白后 1-50 个字符
pub fn validate_creator_name(raw: &str) -> Result<String, SourceError> {
    let name = raw.trim();
    let chars = name.chars().count();
    if chars == 0 {
        return Err(SourceError::InvalidInput("请输入博主名称".to_string()));
    }
    if chars > MAX_CREATOR_NAME_CHARS {
        return Err(SourceError::InvalidInput(format!(
            "博主名称不能超过 {} 个字符",
            MAX_CREATOR_NAME_CHARS
        )));
    }
    Ok(name.to_string())
}
