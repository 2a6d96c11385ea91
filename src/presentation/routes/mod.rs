// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{crawl_handler, status_handler};
use crate::presentation::state::AppState;
use axum::{
    extract::Extension,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let crawl_routes = Router::new()
        .route("/v1/products/crawl", post(crawl_handler::crawl_products))
        .route("/v1/hot-topics/crawl", post(crawl_handler::crawl_hot_topics))
        .route("/v1/videos/crawl", post(crawl_handler::crawl_videos))
        .route("/v1/status", get(status_handler::get_status))
        .route("/v1/debug-log", delete(status_handler::clear_debug_log));

    Router::new()
        .merge(public_routes)
        .merge(crawl_routes)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
