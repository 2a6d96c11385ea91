// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::crawl_response::CrawlResponseDto;
use crate::application::use_cases::crawl_to_table::CrawlToTableUseCase;
use crate::domain::progress::{ProgressEvent, ProgressObserver};
use crate::sources::SourceClient;
use crate::utils::errors::PipelineError;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info};

/// 调试日志默认保留条数
pub const DEFAULT_LOG_CAPACITY: usize = 200;
/// 成功提示自动消失的时间
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(8);

/// 控制器错误
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("已有任务正在运行，请稍后再试")]
    Busy,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 调试日志条目
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

/// 结果提示
#[derive(Debug, Clone, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    #[serde(skip)]
    shown_at: Instant,
}

/// 界面状态快照
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub busy: bool,
    /// 当前或最近一次运行的数据源
    pub source: Option<String>,
    pub progress: ProgressEvent,
    pub banner: Option<Banner>,
    pub log: Vec<LogEntry>,
}

struct ControllerState {
    source: Option<String>,
    progress: ProgressEvent,
    banner: Option<Banner>,
    log: VecDeque<LogEntry>,
}

/// 界面控制器
///
/// 同一时间只允许一个运行。进度、提示与调试日志保存在这里，
/// 供状态接口读取。
pub struct UiController {
    busy: AtomicBool,
    state: Mutex<ControllerState>,
    log_capacity: usize,
    banner_ttl: Duration,
}

/// 运行占用标记，释放时清除忙碌状态
pub struct RunGuard<'a> {
    controller: &'a UiController,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.controller.busy.store(false, Ordering::Release);
    }
}

impl Default for UiController {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY, SUCCESS_BANNER_TTL)
    }
}

impl UiController {
    pub fn new(log_capacity: usize, banner_ttl: Duration) -> Self {
        Self {
            busy: AtomicBool::new(false),
            state: Mutex::new(ControllerState {
                source: None,
                progress: ProgressEvent {
                    percent: 0.0,
                    message: String::new(),
                },
                banner: None,
                log: VecDeque::new(),
            }),
            log_capacity: log_capacity.max(1),
            banner_ttl,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 占用控制器；已有运行时返回 `None`
    pub fn try_begin(&self, source: &str) -> Option<RunGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        let mut state = self.state.lock();
        state.source = Some(source.to_string());
        state.banner = None;
        state.progress = ProgressEvent {
            percent: 0.0,
            message: "开始处理".to_string(),
        };
        drop(state);

        Some(RunGuard { controller: self })
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let mut state = self.state.lock();
        if state.log.len() >= self.log_capacity {
            state.log.pop_front();
        }
        state.log.push_back(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
        });
    }

    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }

    /// 请求未进入流程即被拒绝，在日志与提示中展示原因
    pub fn reject(&self, message: impl Into<String>) {
        let message = message.into();
        self.log(LogLevel::Error, message.clone());
        self.show_banner(BannerKind::Error, message);
    }

    fn show_banner(&self, kind: BannerKind, message: String) {
        self.state.lock().banner = Some(Banner {
            kind,
            message,
            shown_at: Instant::now(),
        });
    }

    /// 当前状态
    ///
    /// 成功提示超过有效期后不再返回；失败提示一直保留到下次运行。
    pub fn snapshot(&self) -> StatusSnapshot {
        let mut state = self.state.lock();
        let expired = state.banner.as_ref().is_some_and(|b| {
            b.kind == BannerKind::Success && b.shown_at.elapsed() >= self.banner_ttl
        });
        if expired {
            state.banner = None;
        }

        StatusSnapshot {
            busy: self.is_busy(),
            source: state.source.clone(),
            progress: state.progress.clone(),
            banner: state.banner.clone(),
            log: state.log.iter().cloned().collect(),
        }
    }

    /// 运行一次抓取入表流程
    ///
    /// # 参数
    ///
    /// * `use_case` - 对应数据源的用例
    /// * `query` - 用户输入
    /// * `max_count` - 最大抓取数量
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlResponseDto)` - 写入完成
    /// * `Err(ControllerError::Busy)` - 已有运行
    /// * `Err(ControllerError::Pipeline)` - 流程失败，错误已展示在提示与日志中
    pub async fn run_pipeline<S: SourceClient>(
        &self,
        use_case: &CrawlToTableUseCase<S>,
        query: &str,
        max_count: usize,
    ) -> Result<CrawlResponseDto, ControllerError> {
        let source = use_case.source_name();
        let _guard = self.try_begin(source).ok_or(ControllerError::Busy)?;
        self.log(
            LogLevel::Info,
            format!("开始处理 {}，最大数量 {}", source, max_count),
        );

        match use_case.execute(query, max_count, self).await {
            Ok(outcome) => {
                let written = outcome.report.written;
                let mut text = format!("成功写入 {} 条记录", written);
                if outcome.report.failed > 0 {
                    text.push_str(&format!("，{} 条失败", outcome.report.failed));
                    self.log(
                        LogLevel::Warning,
                        format!("{} 条记录写入失败", outcome.report.failed),
                    );
                }
                self.log(LogLevel::Success, outcome.message.clone());
                self.show_banner(BannerKind::Success, text);
                info!("[{}] run {} done", source, outcome.run_id);
                Ok(outcome.into())
            }
            Err(e) => {
                error!("[{}] run failed: {}", source, e);
                self.log(LogLevel::Error, e.to_string());
                self.show_banner(BannerKind::Error, e.to_string());
                Err(e.into())
            }
        }
    }
}

impl ProgressObserver for UiController {
    fn on_progress(&self, event: ProgressEvent) {
        self.log(
            LogLevel::Info,
            format!("[{:.0}%] {}", event.percent, event.message),
        );
        self.state.lock().progress = event;
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
