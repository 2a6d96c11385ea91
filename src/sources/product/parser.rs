// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 商品列表页解析，支持搜索结果页与畅销榜两种布局。

use crate::domain::models::product::ProductRecord;
use crate::utils::url_utils::resolve_or_base;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

const DEFAULT_CATEGORY: &str = "未分类";
const DEFAULT_AVAILABILITY: &str = "Unknown";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

// 搜索结果布局
static SEARCH_ITEM: Lazy<Selector> = Lazy::new(|| {
    selector(r#"[data-component-type="s-search-result"], .s-result-item, .a-section.a-spacing-base"#)
});
static SEARCH_TITLE: Lazy<Selector> =
    Lazy::new(|| selector("h2 a span, .a-size-mini span, .a-size-base-plus"));
static SEARCH_PRICE: Lazy<Selector> = Lazy::new(|| selector(".a-price-whole, .a-offscreen"));
static SEARCH_LINK: Lazy<Selector> = Lazy::new(|| selector("h2 a, .a-link-normal"));

// 畅销榜布局
static BESTSELLER_ITEM: Lazy<Selector> = Lazy::new(|| selector("li.zg-no-numbers"));
static BESTSELLER_NAME: Lazy<Selector> = Lazy::new(|| selector(r#"[class*="line-clamp"]"#));
static BESTSELLER_LINK: Lazy<Selector> =
    Lazy::new(|| selector(r#"a[href*="/dp/"], a.a-link-normal"#));
static BESTSELLER_PRICE: Lazy<Selector> = Lazy::new(|| {
    selector(r#"[class*="p13n-sc-price"], span.a-price-whole, span.a-offscreen"#)
});
static BESTSELLER_RATING_LINK: Lazy<Selector> =
    Lazy::new(|| selector(".a-icon-row a[aria-label]"));
static BESTSELLER_RANK: Lazy<Selector> = Lazy::new(|| selector(".zg-badge-text"));

// 通用
static RATING_TEXT: Lazy<Selector> = Lazy::new(|| selector(".a-icon-alt"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img"));

static ASIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/([A-Z0-9]{10})(?:/|\?|$)").expect("static regex must compile"));
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("static regex must compile"));
static REVIEWS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d,]+)\s+ratings?").expect("static regex must compile"));
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex must compile"));

/// 从商品链接中提取10位商品编号
pub fn extract_product_id(url: &str) -> Option<String> {
    ASIN_RE.captures(url).map(|c| c[1].to_string())
}

/// 解析商品列表页
///
/// 页面含畅销榜条目时按畅销榜解析，否则按搜索结果解析。
/// 缺少标题或价格的条目被跳过，同一编号只保留第一次出现。
///
/// # 参数
///
/// * `html` - 页面内容
/// * `page_url` - 页面地址，用于补全相对链接
pub fn parse_products(html: &str, page_url: &str) -> Vec<ProductRecord> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let bestsellers: Vec<ElementRef> = document.select(&BESTSELLER_ITEM).collect();
    let candidates: Vec<ProductRecord> = if bestsellers.is_empty() {
        document
            .select(&SEARCH_ITEM)
            .filter_map(|item| parse_search_item(item, base.as_ref(), page_url))
            .collect()
    } else {
        bestsellers
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| parse_bestseller_item(item, i + 1, base.as_ref(), page_url))
            .collect()
    };

    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(candidates.len());
    for (index, mut product) in candidates.into_iter().enumerate() {
        if product.product_id.is_empty() {
            product.product_id = format!("scraped_{}", index + 1);
        }
        if !seen.insert(product.product_id.clone()) {
            continue;
        }
        if product.rank.is_none() {
            product.rank = Some(products.len() as u32 + 1);
        }
        products.push(product);
    }

    debug!("Parsed {} products from {}", products.len(), page_url);
    products
}

fn first_text(item: ElementRef, selector: &Selector) -> Option<String> {
    item.select(selector)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

fn link_of(item: ElementRef, selector: &Selector, base: Option<&Url>, page_url: &str) -> String {
    let href = item
        .select(selector)
        .find_map(|e| e.value().attr("href"))
        .filter(|h| !h.trim().is_empty());
    match (href, base) {
        (Some(href), Some(base)) => resolve_or_base(base, href),
        (Some(href), None) => href.to_string(),
        (None, _) => page_url.to_string(),
    }
}

fn image_of(item: ElementRef) -> String {
    item.select(&IMAGE)
        .find_map(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string()
}

fn rating_from(text: &str) -> f64 {
    DECIMAL_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|r| r.clamp(0.0, 5.0))
        .unwrap_or(0.0)
}

fn product_id_for(item: ElementRef, link: &str) -> String {
    item.value()
        .attr("data-asin")
        .filter(|asin| !asin.trim().is_empty())
        .map(|asin| asin.trim().to_string())
        .or_else(|| extract_product_id(link))
        .unwrap_or_default()
}

fn base_record(product_id: String, title: String, price: String, product_url: String) -> ProductRecord {
    ProductRecord {
        product_id,
        title,
        price,
        original_price: None,
        discount: None,
        rating: 0.0,
        review_count: 0,
        image_url: String::new(),
        product_url,
        description: String::new(),
        brand: None,
        category: DEFAULT_CATEGORY.to_string(),
        availability: DEFAULT_AVAILABILITY.to_string(),
        rank: None,
    }
}

fn parse_search_item(item: ElementRef, base: Option<&Url>, page_url: &str) -> Option<ProductRecord> {
    let title = first_text(item, &SEARCH_TITLE)?;
    let price = first_text(item, &SEARCH_PRICE)?;
    let link = link_of(item, &SEARCH_LINK, base, page_url);

    let mut product = base_record(product_id_for(item, &link), title, price, link);
    product.rating = first_text(item, &RATING_TEXT)
        .map(|t| rating_from(&t))
        .unwrap_or(0.0);
    product.image_url = image_of(item);
    Some(product)
}

fn parse_bestseller_item(
    item: ElementRef,
    position: usize,
    base: Option<&Url>,
    page_url: &str,
) -> Option<ProductRecord> {
    let title = first_text(item, &BESTSELLER_NAME).or_else(|| {
        item.select(&IMAGE)
            .find_map(|img| img.value().attr("alt"))
            .map(|alt| alt.trim().to_string())
            .filter(|alt| !alt.is_empty())
    })?;
    let price = first_text(item, &BESTSELLER_PRICE)?;
    let link = link_of(item, &BESTSELLER_LINK, base, page_url);

    let mut product = base_record(product_id_for(item, &link), title, price, link);

    // aria-label 形如 "4.5 out of 5 stars, 1,234 ratings"
    let aria = item
        .select(&BESTSELLER_RATING_LINK)
        .filter_map(|a| a.value().attr("aria-label"))
        .find(|label| label.contains("out of 5 stars"));
    match aria {
        Some(label) => {
            product.rating = rating_from(label);
            product.review_count = REVIEWS_RE
                .captures(label)
                .and_then(|c| c[1].replace(',', "").parse().ok())
                .unwrap_or(0);
        }
        None => {
            product.rating = first_text(item, &RATING_TEXT)
                .map(|t| rating_from(&t))
                .unwrap_or(0.0);
        }
    }

    product.image_url = image_of(item);
    product.rank = first_text(item, &BESTSELLER_RANK)
        .and_then(|badge| DIGITS_RE.find(&badge).and_then(|m| m.as_str().parse().ok()))
        .filter(|rank: &u32| *rank > 0)
        .or(Some(position as u32));
    Some(product)
}
