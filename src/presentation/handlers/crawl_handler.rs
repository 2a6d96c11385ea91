// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    application::dto::crawl_request::{
        max_count_or_default, HotTopicsCrawlRequestDto, ProductCrawlRequestDto,
        VideoCrawlRequestDto,
    },
    presentation::{
        errors::{validation_message, AppError},
        state::AppState,
    },
};

/// 校验请求，失败时同步写入调试日志与提示
fn validated<T: Validate>(state: &AppState, payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|e| {
        state.controller.reject(validation_message(&e));
        AppError::from(e)
    })
}

/// 抓取商品列表并写入数据表
pub async fn crawl_products(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ProductCrawlRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    validated(&state, &payload)?;
    let response = state
        .controller
        .run_pipeline(
            &state.products,
            &payload.url,
            max_count_or_default(payload.max_count),
        )
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

/// 抓取热榜并写入数据表
///
/// 请求体可省略
pub async fn crawl_hot_topics(
    Extension(state): Extension<Arc<AppState>>,
    payload: Option<Json<HotTopicsCrawlRequestDto>>,
) -> Result<impl IntoResponse, AppError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    validated(&state, &payload)?;
    let response = state
        .controller
        .run_pipeline(
            &state.hot_topics,
            "",
            max_count_or_default(payload.max_count),
        )
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

/// 抓取博主视频并写入数据表
pub async fn crawl_videos(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<VideoCrawlRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    validated(&state, &payload)?;
    let response = state
        .controller
        .run_pipeline(
            &state.videos,
            &payload.creator_name,
            max_count_or_default(payload.max_count),
        )
        .await?;
    Ok((StatusCode::OK, Json(response)))
}
