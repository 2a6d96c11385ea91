// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::crawl_response::CrawlResponseDto;
use crate::domain::models::crawl_result::{DataOrigin, StrategyAttempt};
use crate::domain::models::table::{TableHandle, TableRow};
use crate::domain::progress::{ProgressObserver, ScaledProgress};
use crate::domain::services::table_provisioner::TableProvisioner;
use crate::domain::services::table_writer::{TableWriter, WriteReport};
use crate::engines::traits::SourceError;
use crate::sources::SourceClient;
use crate::utils::errors::{PipelineError, WriteError};
use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const FETCH_END: f64 = 60.0;
const PROVISION_END: f64 = 70.0;

/// 一次成功运行的结果
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub table: TableHandle,
    pub origin: DataOrigin,
    pub fetched: usize,
    pub report: WriteReport,
    pub attempts: Vec<StrategyAttempt>,
    pub message: String,
}

impl From<PipelineOutcome> for CrawlResponseDto {
    fn from(outcome: PipelineOutcome) -> Self {
        CrawlResponseDto {
            success: true,
            run_id: outcome.run_id,
            message: outcome.message,
            table_id: outcome.table.id,
            table_name: outcome.table.name,
            origin: outcome.origin,
            fetched: outcome.fetched,
            written: outcome.report.written,
            failed: outcome.report.failed,
            failures: outcome.report.failures,
            attempts: outcome.attempts,
        }
    }
}

/// 抓取入表用例
///
/// 校验 → 抓取(0-60%) → 建表(60-70%) → 写入(70-100%)
pub struct CrawlToTableUseCase<S: SourceClient> {
    source: Arc<S>,
    provisioner: Arc<TableProvisioner>,
    writer: TableWriter,
}

impl<S: SourceClient> CrawlToTableUseCase<S> {
    pub fn new(source: Arc<S>, provisioner: Arc<TableProvisioner>, writer: TableWriter) -> Self {
        Self {
            source,
            provisioner,
            writer,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.source()
    }

    /// 执行完整流程
    ///
    /// 查询不合法时直接返回 `InvalidInput`，不发起网络请求。
    pub async fn execute(
        &self,
        query: &str,
        max_count: usize,
        progress: &dyn ProgressObserver,
    ) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let source = self.source.source();

        let query = self.source.validate(query).map_err(|e| match e {
            SourceError::InvalidInput(msg) => PipelineError::InvalidInput(msg),
            other => PipelineError::InvalidInput(other.to_string()),
        })?;
        info!("[{}] run {} started, max_count={}", source, run_id, max_count);

        let fetch_progress = ScaledProgress::new(progress, 0.0, FETCH_END);
        let result = self
            .source
            .chain()
            .run(&query, max_count, &fetch_progress)
            .await;
        let fetched_at = Utc::now();

        if !result.success() {
            warn!("[{}] run {} fetch failed: {}", source, run_id, result.message());
            return Err(PipelineError::Fetch(result.message().to_string()));
        }
        let origin = result.origin();
        let attempts = result.attempts().to_vec();
        let fetch_message = result.message().to_string();
        let records = result.into_records();
        if records.is_empty() {
            return Err(PipelineError::Write(WriteError::EmptyInput));
        }
        let fetched = records.len();

        let table_name = self.source.table_name(&query, Local::now());
        progress.report(FETCH_END, &format!("正在准备数据表 {}", table_name));
        let (table, field_map) = self
            .provisioner
            .provision(&table_name, <S::Record as TableRow>::schema())
            .await?;
        progress.report(PROVISION_END, &format!("数据表 {} 已就绪", table.name));

        let write_progress = ScaledProgress::new(progress, PROVISION_END, 100.0);
        let report = self
            .writer
            .write_records(&table, &field_map, &records, fetched_at, &write_progress)
            .await?;

        let mut message = format!(
            "{}，成功写入 {} 条记录到表 {}",
            fetch_message, report.written, table.name
        );
        if report.failed > 0 {
            message.push_str(&format!("，{} 条失败", report.failed));
        }
        info!(
            "[{}] run {} finished: fetched={}, written={}, failed={}, origin={}",
            source, run_id, fetched, report.written, report.failed, origin
        );

        Ok(PipelineOutcome {
            run_id,
            table,
            origin,
            fetched,
            report,
            attempts,
            message,
        })
    }
}

#[cfg(test)]
#[path = "crawl_to_table_test.rs"]
mod tests;
