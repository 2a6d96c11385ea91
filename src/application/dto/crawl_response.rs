// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_result::{DataOrigin, StrategyAttempt};
use crate::domain::services::table_writer::RecordFailure;
use serde::Serialize;
use uuid::Uuid;

/// 抓取入表响应
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResponseDto {
    pub success: bool,
    /// 本次运行的标识
    pub run_id: Uuid,
    pub message: String,
    pub table_id: String,
    pub table_name: String,
    /// 数据来源：live / synthetic
    pub origin: DataOrigin,
    pub fetched: usize,
    pub written: usize,
    pub failed: usize,
    pub failures: Vec<RecordFailure>,
    pub attempts: Vec<StrategyAttempt>,
}
