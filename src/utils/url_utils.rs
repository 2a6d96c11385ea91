// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的链接转换为绝对URL，失败时退回基准地址
pub fn resolve_or_base(base_url: &Url, href: &str) -> String {
    base_url
        .join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| base_url.to_string())
}

/// 站点名：去掉 `www.` 前缀的主机名
///
/// `https://www.amazon.sg/dp/X` -> `amazon.sg`
pub fn site_name(url: &str) -> Result<String, ParseError> {
    let parsed = Url::parse(url)?;
    let host = parsed.host_str().ok_or(ParseError::EmptyHost)?;
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}
