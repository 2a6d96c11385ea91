// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{FieldMap, TableHandle, TableSchema};
use crate::domain::repositories::base_repository::BaseHost;
use crate::domain::services::field_mapper::FieldMapper;
use crate::utils::errors::{PipelineError, ProvisioningError};
use std::sync::Arc;
use tracing::info;

/// 默认每次删除的记录数
pub const DEFAULT_CLEAR_PAGE_SIZE: usize = 50;

/// 建表服务
///
/// 按名称查找或创建目标表；复用已有表时先清空旧数据
pub struct TableProvisioner {
    host: Arc<dyn BaseHost>,
    field_mapper: FieldMapper,
    clear_page_size: usize,
}

impl TableProvisioner {
    /// 创建建表服务
    ///
    /// # 参数
    ///
    /// * `host` - 宿主表格
    /// * `clear_page_size` - 清空旧表时每次删除的记录数
    pub fn new(host: Arc<dyn BaseHost>, clear_page_size: usize) -> Self {
        Self {
            field_mapper: FieldMapper::new(host.clone()),
            host,
            clear_page_size: clear_page_size.max(1),
        }
    }

    /// 查找或创建数据表
    ///
    /// 表名精确匹配。找到则删除其全部记录后复用，否则以种子列新建。
    pub async fn provision_table(
        &self,
        name: &str,
        schema: &TableSchema,
    ) -> Result<TableHandle, ProvisioningError> {
        if !self.host.is_ready() {
            return Err(ProvisioningError::NotInitialized);
        }

        let tables = self
            .host
            .list_tables()
            .await
            .map_err(ProvisioningError::ListFailed)?;

        if let Some(existing) = tables.into_iter().find(|t| t.name == name) {
            info!("Reusing table {} ({}), clearing old records", name, existing.id);
            let handle = TableHandle {
                id: existing.id,
                name: existing.name,
            };
            self.clear_records(&handle).await?;
            return Ok(handle);
        }

        info!("Creating table {}", name);
        self.host
            .create_table(name, &schema.seed)
            .await
            .map_err(|source| ProvisioningError::CreateFailed {
                name: name.to_string(),
                source,
            })
    }

    /// 查找或创建数据表，并确保字段齐全
    pub async fn provision(
        &self,
        name: &str,
        schema: &TableSchema,
    ) -> Result<(TableHandle, FieldMap), PipelineError> {
        let table = self.provision_table(name, schema).await?;
        let field_map = self.field_mapper.ensure_fields(&table, schema.fields).await?;
        Ok((table, field_map))
    }

    async fn clear_records(&self, table: &TableHandle) -> Result<(), ProvisioningError> {
        let clear_failed = |source| ProvisioningError::ClearFailed {
            name: table.name.clone(),
            source,
        };

        let record_ids = self
            .host
            .list_record_ids(&table.id)
            .await
            .map_err(clear_failed)?;
        if record_ids.is_empty() {
            return Ok(());
        }

        for page in record_ids.chunks(self.clear_page_size) {
            self.host
                .delete_records(&table.id, page)
                .await
                .map_err(clear_failed)?;
        }
        info!("Cleared {} records from table {}", record_ids.len(), table.name);
        Ok(())
    }
}

#[cfg(test)]
#[path = "table_provisioner_test.rs"]
mod tests;
