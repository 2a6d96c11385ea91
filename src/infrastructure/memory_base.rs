// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{FieldMeta, FieldSpec, Row, TableHandle, TableMeta};
use crate::domain::repositories::base_repository::{BaseHost, HostError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

type RecordPredicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

struct MemTable {
    id: String,
    name: String,
    fields: Vec<FieldMeta>,
    records: Vec<(String, Row)>,
}

/// 调用计数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStats {
    pub list_tables: usize,
    pub create_table: usize,
    pub list_fields: usize,
    pub create_field: usize,
    pub bulk_inserts: usize,
    pub single_inserts: usize,
    pub delete_calls: usize,
    pub releases: usize,
}

#[derive(Default)]
struct FailurePlan {
    /// 第 n 次批量写入失败（从1开始）
    bulk_calls: HashSet<usize>,
    fail_every_bulk: bool,
    reject_record: Option<RecordPredicate>,
    reject_fields: HashSet<String>,
    fail_list_tables: bool,
    fail_create_table: bool,
}

#[derive(Default)]
struct State {
    initialized: bool,
    tables: Vec<MemTable>,
    next_id: u64,
    stats: CallStats,
    failures: FailurePlan,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{:06}", prefix, self.next_id)
    }

    fn table_mut(&mut self, table_id: &str) -> Result<&mut MemTable, HostError> {
        self.tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| HostError::TableNotFound(table_id.to_string()))
    }

    fn check_row(&self, table_id: &str, row: &Row) -> Result<(), HostError> {
        let table = self
            .tables
            .iter()
            .find(|t| t.id == table_id)
            .ok_or_else(|| HostError::TableNotFound(table_id.to_string()))?;
        if let Some(unknown) = row.keys().find(|k| !table.fields.iter().any(|f| &f.id == *k)) {
            return Err(HostError::Rejected(format!("unknown field id {}", unknown)));
        }
        if let Some(reject) = &self.failures.reject_record {
            if reject(row) {
                return Err(HostError::Rejected("record rejected".to_string()));
            }
        }
        Ok(())
    }
}

/// 内存中的多维表格
///
/// 未配置宿主凭据时作为演练宿主使用，测试中可注入各种失败。
pub struct InMemoryBase {
    state: Mutex<State>,
}

impl Default for InMemoryBase {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBase {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                initialized: true,
                ..State::default()
            }),
        }
    }

    pub fn set_initialized(&self, initialized: bool) {
        self.state.lock().initialized = initialized;
    }

    /// 第 `n` 次批量写入整体失败
    pub fn fail_bulk_call(&self, n: usize) {
        self.state.lock().failures.bulk_calls.insert(n);
    }

    /// 所有批量写入都失败
    pub fn fail_every_bulk_call(&self) {
        self.state.lock().failures.fail_every_bulk = true;
    }

    /// 满足条件的记录被拒绝（批量与单条写入都生效）
    pub fn reject_records_where<F>(&self, predicate: F)
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.state.lock().failures.reject_record = Some(Arc::new(predicate));
    }

    /// 拒绝创建指定名称的字段
    pub fn reject_field(&self, name: &str) {
        self.state.lock().failures.reject_fields.insert(name.to_string());
    }

    pub fn fail_list_tables(&self) {
        self.state.lock().failures.fail_list_tables = true;
    }

    pub fn fail_create_table(&self) {
        self.state.lock().failures.fail_create_table = true;
    }

    /// 预置一张表：给定字段与 `records` 条空记录，返回表ID
    pub fn seed_table(&self, name: &str, fields: &[FieldSpec], records: usize) -> String {
        let mut state = self.state.lock();
        let id = state.next_id("tbl");
        let fields = fields
            .iter()
            .map(|spec| FieldMeta {
                id: state.next_id("fld"),
                name: spec.name.to_string(),
                field_type: spec.field_type,
            })
            .collect();
        let records = (0..records)
            .map(|_| (state.next_id("rec"), Row::new()))
            .collect();
        state.tables.push(MemTable {
            id: id.clone(),
            name: name.to_string(),
            fields,
            records,
        });
        id
    }

    pub fn stats(&self) -> CallStats {
        self.state.lock().stats.clone()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.state.lock().tables.iter().map(|t| t.name.clone()).collect()
    }

    /// 表中的记录（按写入顺序）
    pub fn rows(&self, table_id: &str) -> Vec<Row> {
        self.state
            .lock()
            .tables
            .iter()
            .find(|t| t.id == table_id)
            .map(|t| t.records.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default()
    }

    pub fn field_names(&self, table_id: &str) -> Vec<String> {
        self.state
            .lock()
            .tables
            .iter()
            .find(|t| t.id == table_id)
            .map(|t| t.fields.iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BaseHost for InMemoryBase {
    fn is_ready(&self) -> bool {
        self.state.lock().initialized
    }

    async fn list_tables(&self) -> Result<Vec<TableMeta>, HostError> {
        let mut state = self.state.lock();
        state.stats.list_tables += 1;
        if !state.initialized {
            return Err(HostError::NotInitialized);
        }
        if state.failures.fail_list_tables {
            return Err(HostError::Api {
                code: 1254000,
                msg: "list tables failed".to_string(),
            });
        }
        Ok(state
            .tables
            .iter()
            .map(|t| TableMeta {
                id: t.id.clone(),
                name: t.name.clone(),
            })
            .collect())
    }

    async fn create_table(&self, name: &str, seed: &FieldSpec) -> Result<TableHandle, HostError> {
        let mut state = self.state.lock();
        state.stats.create_table += 1;
        if state.failures.fail_create_table {
            return Err(HostError::Rejected("create table failed".to_string()));
        }
        let id = state.next_id("tbl");
        let field_id = state.next_id("fld");
        state.tables.push(MemTable {
            id: id.clone(),
            name: name.to_string(),
            fields: vec![FieldMeta {
                id: field_id,
                name: seed.name.to_string(),
                field_type: seed.field_type,
            }],
            records: Vec::new(),
        });
        debug!("memory base: created table {} ({})", name, id);
        Ok(TableHandle {
            id,
            name: name.to_string(),
        })
    }

    async fn list_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, HostError> {
        let mut state = self.state.lock();
        state.stats.list_fields += 1;
        Ok(state.table_mut(table_id)?.fields.clone())
    }

    async fn create_field(&self, table_id: &str, spec: &FieldSpec) -> Result<FieldMeta, HostError> {
        let mut state = self.state.lock();
        state.stats.create_field += 1;
        if state.failures.reject_fields.contains(spec.name) {
            return Err(HostError::Rejected(format!("field {} rejected", spec.name)));
        }
        let field = FieldMeta {
            id: state.next_id("fld"),
            name: spec.name.to_string(),
            field_type: spec.field_type,
        };
        let table = state.table_mut(table_id)?;
        if table.fields.iter().any(|f| f.name == spec.name) {
            return Err(HostError::Api {
                code: 1254014,
                msg: format!("field name {} duplicated", spec.name),
            });
        }
        table.fields.push(field.clone());
        Ok(field)
    }

    async fn add_records(&self, table_id: &str, rows: &[Row]) -> Result<Vec<String>, HostError> {
        let mut state = self.state.lock();
        state.stats.bulk_inserts += 1;
        let call = state.stats.bulk_inserts;
        if state.failures.fail_every_bulk || state.failures.bulk_calls.contains(&call) {
            return Err(HostError::Api {
                code: 1254291,
                msg: format!("bulk insert #{} failed", call),
            });
        }
        for row in rows {
            state.check_row(table_id, row)?;
        }
        let ids: Vec<String> = rows.iter().map(|_| state.next_id("rec")).collect();
        let table = state.table_mut(table_id)?;
        table
            .records
            .extend(ids.iter().cloned().zip(rows.iter().cloned()));
        Ok(ids)
    }

    async fn add_record(&self, table_id: &str, row: &Row) -> Result<String, HostError> {
        let mut state = self.state.lock();
        state.stats.single_inserts += 1;
        state.check_row(table_id, row)?;
        let id = state.next_id("rec");
        state.table_mut(table_id)?.records.push((id.clone(), row.clone()));
        Ok(id)
    }

    async fn list_record_ids(&self, table_id: &str) -> Result<Vec<String>, HostError> {
        let mut state = self.state.lock();
        Ok(state
            .table_mut(table_id)?
            .records
            .iter()
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn delete_records(&self, table_id: &str, record_ids: &[String]) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.stats.delete_calls += 1;
        let ids: HashSet<&String> = record_ids.iter().collect();
        state
            .table_mut(table_id)?
            .records
            .retain(|(id, _)| !ids.contains(id));
        Ok(())
    }

    fn release_table(&self, _table_id: &str) {
        self.state.lock().stats.releases += 1;
    }
}
