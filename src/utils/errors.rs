// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::base_repository::HostError;
use thiserror::Error;

/// 建表错误（致命）
#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("宿主环境未初始化，请在多维表格中运行")]
    NotInitialized,

    #[error("获取数据表列表失败: {0}")]
    ListFailed(#[source] HostError),

    #[error("创建数据表 {name} 失败: {source}")]
    CreateFailed {
        name: String,
        #[source]
        source: HostError,
    },

    #[error("清空数据表 {name} 失败: {source}")]
    ClearFailed {
        name: String,
        #[source]
        source: HostError,
    },
}

/// 字段设置错误（致命，不回滚已创建字段）
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("读取字段列表失败: {0}")]
    ListFailed(#[source] HostError),

    #[error("创建字段 {field} 失败: {source}")]
    CreateFailed {
        field: String,
        #[source]
        source: HostError,
    },

    #[error("字段 {0} 创建后仍不存在")]
    StillMissing(String),
}

/// 写入错误
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("没有数据需要写入")]
    EmptyInput,

    #[error("全部 {total} 条记录写入失败: {last_error}")]
    AllFailed { total: usize, last_error: String },
}

/// 流水线错误
///
/// 传给界面层时只保留可读字符串。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("输入无效: {0}")]
    InvalidInput(String),

    #[error("抓取失败: {0}")]
    Fetch(String),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
