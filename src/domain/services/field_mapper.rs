// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{FieldMap, FieldSpec, TableHandle};
use crate::domain::repositories::base_repository::BaseHost;
use crate::utils::errors::SchemaError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// 字段映射服务
///
/// 保证目标表含有全部必需字段，并给出逻辑名到字段ID的映射
pub struct FieldMapper {
    host: Arc<dyn BaseHost>,
}

impl FieldMapper {
    pub fn new(host: Arc<dyn BaseHost>) -> Self {
        Self { host }
    }

    /// 确保字段存在
    ///
    /// 按名称精确匹配，缺失的字段逐个创建，然后重新读取字段列表构建映射。
    /// 重复执行不会产生重复字段；中途失败时已创建的字段保留。
    ///
    /// # 参数
    ///
    /// * `table` - 目标表
    /// * `required` - 必需字段
    ///
    /// # 返回值
    ///
    /// * `Ok(FieldMap)` - 每个必需字段都映射到非空ID
    /// * `Err(SchemaError)` - 读取或创建字段失败
    pub async fn ensure_fields(
        &self,
        table: &TableHandle,
        required: &[FieldSpec],
    ) -> Result<FieldMap, SchemaError> {
        let existing = self
            .host
            .list_fields(&table.id)
            .await
            .map_err(SchemaError::ListFailed)?;

        let mut handled: HashSet<&str> = HashSet::new();
        let mut created = 0usize;
        for spec in required {
            if !handled.insert(spec.name) {
                continue;
            }
            if let Some(field) = existing.iter().find(|f| f.name == spec.name) {
                if field.field_type != spec.field_type {
                    warn!(
                        "Field {} in table {} has type {:?}, expected {:?}; keeping it",
                        spec.name, table.name, field.field_type, spec.field_type
                    );
                }
                continue;
            }

            info!("Creating field {} in table {}", spec.name, table.name);
            self.host
                .create_field(&table.id, spec)
                .await
                .map_err(|source| SchemaError::CreateFailed {
                    field: spec.name.to_string(),
                    source,
                })?;
            created += 1;
        }

        let fields = if created == 0 {
            existing
        } else {
            self.host
                .list_fields(&table.id)
                .await
                .map_err(SchemaError::ListFailed)?
        };

        let field_map = FieldMap::from_fields(&fields, required);
        if let Some(missing) = required.iter().find(|spec| !field_map.contains(spec.name)) {
            return Err(SchemaError::StillMissing(missing.name.to_string()));
        }

        info!(
            "Field map ready for table {}: {} fields ({} created)",
            table.name,
            field_map.len(),
            created
        );
        Ok(field_map)
    }
}

#[cfg(test)]
#[path = "field_mapper_test.rs"]
mod tests;
