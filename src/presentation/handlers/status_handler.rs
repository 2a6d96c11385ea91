// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::presentation::state::AppState;

/// 当前运行状态：忙碌标记、进度、提示与调试日志
pub async fn get_status(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.snapshot())
}

/// 清空调试日志
pub async fn clear_debug_log(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    state.controller.clear_log();
    StatusCode::NO_CONTENT
}
