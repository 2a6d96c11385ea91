// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{FieldMeta, FieldSpec, Row, TableHandle, TableMeta};
use async_trait::async_trait;
use thiserror::Error;

/// 宿主表格错误类型
#[derive(Error, Debug)]
pub enum HostError {
    /// 宿主环境未初始化
    #[error("Host base is not initialized")]
    NotInitialized,
    /// 宿主接口返回业务错误
    #[error("Host API error {code}: {msg}")]
    Api { code: i64, msg: String },
    /// 网络请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 表不存在
    #[error("Table not found: {0}")]
    TableNotFound(String),
    /// 宿主拒绝操作（如权限不足）
    #[error("Rejected by host: {0}")]
    Rejected(String),
    /// 响应无法解析
    #[error("Unexpected host response: {0}")]
    InvalidResponse(String),
}

/// 宿主多维表格访问接口
///
/// 批量接口不保证原子性：批量写入可能部分生效后才失败。
#[async_trait]
pub trait BaseHost: Send + Sync {
    /// 宿主环境是否可用
    fn is_ready(&self) -> bool;

    /// 列出所有数据表
    async fn list_tables(&self) -> Result<Vec<TableMeta>, HostError>;

    /// 以单个种子列创建数据表
    async fn create_table(&self, name: &str, seed: &FieldSpec) -> Result<TableHandle, HostError>;

    /// 列出数据表的字段
    async fn list_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, HostError>;

    /// 新建字段
    async fn create_field(&self, table_id: &str, spec: &FieldSpec)
        -> Result<FieldMeta, HostError>;

    /// 批量新增记录，返回记录ID
    async fn add_records(&self, table_id: &str, rows: &[Row]) -> Result<Vec<String>, HostError>;

    /// 新增单条记录
    async fn add_record(&self, table_id: &str, row: &Row) -> Result<String, HostError>;

    /// 列出全部记录ID
    async fn list_record_ids(&self, table_id: &str) -> Result<Vec<String>, HostError>;

    /// 删除记录
    async fn delete_records(&self, table_id: &str, record_ids: &[String]) -> Result<(), HostError>;

    /// 数据表写入结束，释放为其保留的本地状态
    fn release_table(&self, _table_id: &str) {}
}
