// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{FieldMap, Row, RowContext, TableHandle, TableRow};
use crate::domain::progress::ProgressObserver;
use crate::domain::repositories::base_repository::BaseHost;
use crate::utils::errors::WriteError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 单条记录写入失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    /// 记录在输入中的下标（从0开始）
    pub index: usize,
    pub message: String,
}

/// 写入结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WriteReport {
    pub total: usize,
    pub written: usize,
    pub failed: usize,
    /// 批量写入次数
    pub batches: usize,
    pub failures: Vec<RecordFailure>,
}

/// 批量写入服务
///
/// 按批提交记录；某批整体失败时退回逐条写入，并继续处理后续批次
pub struct TableWriter {
    host: Arc<dyn BaseHost>,
    source: &'static str,
    batch_size: usize,
    inter_batch_delay: Duration,
}

impl TableWriter {
    /// 创建写入服务
    ///
    /// # 参数
    ///
    /// * `host` - 宿主表格
    /// * `source` - 数据源名称，用于指标
    /// * `batch_size` - 每批记录数（至少为1）
    /// * `inter_batch_delay` - 批次间隔
    pub fn new(
        host: Arc<dyn BaseHost>,
        source: &'static str,
        batch_size: usize,
        inter_batch_delay: Duration,
    ) -> Self {
        Self {
            host,
            source,
            batch_size: batch_size.max(1),
            inter_batch_delay,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 构建一行数据
    ///
    /// 映射中的每个字段都会出现在结果中，缺失值用字段类型的默认值填充。
    pub fn build_row<R: TableRow>(record: &R, field_map: &FieldMap, ctx: &RowContext) -> Row {
        R::schema()
            .fields
            .iter()
            .filter_map(|spec| {
                field_map.get(spec.name).map(|field_id| {
                    let cell = record
                        .cell(spec.name, ctx)
                        .unwrap_or_else(|| spec.field_type.default_cell());
                    (field_id.to_string(), cell)
                })
            })
            .collect()
    }

    /// 写入记录
    ///
    /// # 参数
    ///
    /// * `table` - 目标表
    /// * `field_map` - 字段映射
    /// * `records` - 待写入记录，顺序即写入顺序
    /// * `fetched_at` - 抓取时间
    /// * `progress` - 进度观察者，每批结束后上报 `已写入/总数`
    ///
    /// # 返回值
    ///
    /// * `Ok(WriteReport)` - 至少一条记录写入成功
    /// * `Err(WriteError)` - 输入为空或全部失败
    pub async fn write_records<R: TableRow>(
        &self,
        table: &TableHandle,
        field_map: &FieldMap,
        records: &[R],
        fetched_at: DateTime<Utc>,
        progress: &dyn ProgressObserver,
    ) -> Result<WriteReport, WriteError> {
        if records.is_empty() {
            return Err(WriteError::EmptyInput);
        }

        let total = records.len();
        let batch_count = total.div_ceil(self.batch_size);
        let mut report = WriteReport {
            total,
            ..WriteReport::default()
        };

        info!(
            "Writing {} records to table {} in {} batches of {}",
            total, table.name, batch_count, self.batch_size
        );

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            let offset = batch_index * self.batch_size;
            let rows: Vec<Row> = batch
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let ctx = RowContext {
                        position: offset + i + 1,
                        fetched_at,
                    };
                    Self::build_row(record, field_map, &ctx)
                })
                .collect();

            report.batches += 1;
            match self.host.add_records(&table.id, &rows).await {
                Ok(_) => {
                    report.written += rows.len();
                }
                Err(e) => {
                    warn!(
                        "Batch {}/{} failed: {}, retrying record by record",
                        batch_index + 1,
                        batch_count,
                        e
                    );
                    for (i, row) in rows.iter().enumerate() {
                        match self.host.add_record(&table.id, row).await {
                            Ok(_) => report.written += 1,
                            Err(e) => {
                                warn!("Record {} failed: {}", offset + i, e);
                                report.failed += 1;
                                report.failures.push(RecordFailure {
                                    index: offset + i,
                                    message: e.to_string(),
                                });
                            }
                        }
                    }
                }
            }

            progress.report(
                report.written as f64 / total as f64 * 100.0,
                &format!("已写入 {}/{} 条记录", report.written, total),
            );

            if batch_index + 1 < batch_count && !self.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
        }

        self.host.release_table(&table.id);

        metrics::counter!("basecrawl_records_written_total", "source" => self.source)
            .increment(report.written as u64);
        metrics::counter!("basecrawl_records_failed_total", "source" => self.source)
            .increment(report.failed as u64);

        if report.written == 0 {
            let last_error = report
                .failures
                .last()
                .map(|f| f.message.clone())
                .unwrap_or_default();
            return Err(WriteError::AllFailed { total, last_error });
        }

        info!(
            "Finished writing to {}: {} written, {} failed",
            table.name, report.written, report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "table_writer_test.rs"]
mod tests;
