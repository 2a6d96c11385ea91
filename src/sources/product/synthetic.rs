// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::ProductRecord;

struct Template {
    id: &'static str,
    title: &'static str,
    price: &'static str,
    original_price: &'static str,
    discount: &'static str,
    rating: f64,
    review_count: u64,
    image_url: &'static str,
    description: &'static str,
    brand: &'static str,
    category: &'static str,
}

const TEMPLATES: [Template; 2] = [
    Template {
        id: "B08N5WRWNW",
        title: "rosyclo Cloud Slippers for Women and Men, Pillow House Slippers Shower Shoes Indoor Slides Bathroom Sandals",
        price: "S$15.99",
        original_price: "S$25.99",
        discount: "38%",
        rating: 4.3,
        review_count: 1250,
        image_url: "https://m.media-amazon.com/images/I/61abc123def.jpg",
        description: "Ultimate Comfort, Lightweight, Thick Sole, Non-Slip, Easy to Clean",
        brand: "rosyclo",
        category: "Women's Slippers",
    },
    Template {
        id: "B07XYZ456",
        title: "Comfortable Memory Foam Slippers for Home",
        price: "S$22.50",
        original_price: "S$35.00",
        discount: "36%",
        rating: 4.5,
        review_count: 890,
        image_url: "https://m.media-amazon.com/images/I/61xyz789abc.jpg",
        description: "Soft memory foam, anti-slip sole, perfect for indoor use",
        brand: "ComfortHome",
        category: "Women's Slippers",
    },
];

/// 生成演示商品
///
/// 两个模板轮流使用，编号 `<模板编号>_<n>`，结果确定。
pub fn generate_products(page_url: &str, count: usize) -> Vec<ProductRecord> {
    (0..count)
        .map(|i| {
            let tpl = &TEMPLATES[i % TEMPLATES.len()];
            let n = i + 1;
            ProductRecord {
                product_id: format!("{}_{}", tpl.id, n),
                title: format!("{} - Variant {}", tpl.title, n),
                price: tpl.price.to_string(),
                original_price: Some(tpl.original_price.to_string()),
                discount: Some(tpl.discount.to_string()),
                rating: tpl.rating,
                review_count: tpl.review_count,
                image_url: tpl.image_url.to_string(),
                product_url: page_url.to_string(),
                description: tpl.description.to_string(),
                brand: Some(tpl.brand.to_string()),
                category: tpl.category.to_string(),
                availability: "In Stock".to_string(),
                rank: Some(n as u32),
            }
        })
        .collect()
}
