// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::table::{
    CellValue, FieldMeta, FieldSpec, FieldType, Row, TableHandle, TableMeta,
};
use crate::domain::repositories::base_repository::{BaseHost, HostError};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const LIST_PAGE_SIZE: usize = 100;
const RECORD_PAGE_SIZE: usize = 500;

/// 开放平台响应外壳
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableItem {
    table_id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedTable {
    table_id: String,
}

#[derive(Debug, Deserialize)]
struct FieldItem {
    field_id: String,
    field_name: String,
    #[serde(rename = "type")]
    field_type: u32,
}

impl From<FieldItem> for FieldMeta {
    fn from(item: FieldItem) -> Self {
        FieldMeta {
            id: item.field_id,
            name: item.field_name,
            field_type: FieldType::from_code(item.field_type),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedField {
    field: FieldItem,
}

#[derive(Debug, Deserialize)]
struct RecordItem {
    record_id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedRecords {
    #[serde(default)]
    records: Vec<RecordItem>,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    record: RecordItem,
}

/// 飞书多维表格开放接口客户端
///
/// 领域层的行以字段ID为键，接口按字段名写入，这里维护每张表的ID到名称映射。
pub struct BitableClient {
    client: reqwest::Client,
    base_url: String,
    app_token: String,
    access_token: String,
    field_names: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl BitableClient {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `base_url` - 开放平台地址，如 `https://open.feishu.cn`
    /// * `app_token` - 多维表格 app token
    /// * `access_token` - 访问凭据
    pub fn new(
        base_url: &str,
        app_token: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self, HostError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_token: app_token.to_string(),
            access_token: access_token.to_string(),
            field_names: Mutex::new(HashMap::new()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/open-apis/bitable/v1/apps/{}/tables{}",
            self.base_url, self.app_token, path
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.access_token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, HostError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            HostError::InvalidResponse(format!(
                "HTTP {}: {}; body: {}",
                status,
                e,
                crate::utils::json_unwrap::snippet(&body)
            ))
        })?;
        if envelope.code != 0 {
            return Err(HostError::Api {
                code: envelope.code,
                msg: envelope.msg,
            });
        }
        Ok(envelope.data)
    }

    async fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, HostError> {
        self.send(request)
            .await?
            .ok_or_else(|| HostError::InvalidResponse("missing data".to_string()))
    }

    async fn paged<T: DeserializeOwned>(
        &self,
        path: &str,
        page_size: usize,
    ) -> Result<Vec<T>, HostError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("page_size", page_size.to_string())];
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }
            let page: Page<T> = self
                .send_data(self.request(Method::GET, path).query(&query))
                .await?;
            items.extend(page.items);
            match page.page_token {
                Some(token) if page.has_more && !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(items)
    }

    #[cfg(test)]
    fn cached_tables(&self) -> usize {
        self.field_names.lock().len()
    }

    fn remember_fields(&self, table_id: &str, fields: &[FieldMeta]) {
        let mut cache = self.field_names.lock();
        let names = cache.entry(table_id.to_string()).or_default();
        for field in fields {
            names.insert(field.id.clone(), field.name.clone());
        }
    }

    /// 行数据按字段名组装为接口格式
    async fn named_fields(&self, table_id: &str, row: &Row) -> Result<Map<String, Value>, HostError> {
        let known = {
            let cache = self.field_names.lock();
            cache
                .get(table_id)
                .is_some_and(|names| row.keys().all(|id| names.contains_key(id)))
        };
        if !known {
            self.list_fields(table_id).await?;
        }

        let cache = self.field_names.lock();
        let names = cache
            .get(table_id)
            .ok_or_else(|| HostError::TableNotFound(table_id.to_string()))?;
        row.iter()
            .map(|(field_id, cell)| {
                let name = names
                    .get(field_id)
                    .ok_or_else(|| HostError::Rejected(format!("unknown field id {}", field_id)))?;
                Ok((name.clone(), cell_to_wire(cell)))
            })
            .collect()
    }
}

fn cell_to_wire(cell: &CellValue) -> Value {
    match cell {
        CellValue::Text(s) => json!(s),
        CellValue::Number(n) => json!(n),
        CellValue::Url { text, link } => json!({ "text": text, "link": link }),
        CellValue::DateTime(ms) => json!(ms),
    }
}

#[async_trait]
impl BaseHost for BitableClient {
    fn is_ready(&self) -> bool {
        !self.app_token.is_empty() && !self.access_token.is_empty()
    }

    async fn list_tables(&self) -> Result<Vec<TableMeta>, HostError> {
        let items: Vec<TableItem> = self.paged("", LIST_PAGE_SIZE).await?;
        Ok(items
            .into_iter()
            .map(|t| TableMeta {
                id: t.table_id,
                name: t.name,
            })
            .collect())
    }

    async fn create_table(&self, name: &str, seed: &FieldSpec) -> Result<TableHandle, HostError> {
        let body = json!({
            "table": {
                "name": name,
                "fields": [{ "field_name": seed.name, "type": seed.field_type.code() }],
            }
        });
        let created: CreatedTable = self
            .send_data(self.request(Method::POST, "").json(&body))
            .await?;
        debug!("Created bitable table {} ({})", name, created.table_id);
        Ok(TableHandle {
            id: created.table_id,
            name: name.to_string(),
        })
    }

    async fn list_fields(&self, table_id: &str) -> Result<Vec<FieldMeta>, HostError> {
        let items: Vec<FieldItem> = self
            .paged(&format!("/{}/fields", table_id), LIST_PAGE_SIZE)
            .await?;
        let fields: Vec<FieldMeta> = items.into_iter().map(FieldMeta::from).collect();
        self.remember_fields(table_id, &fields);
        Ok(fields)
    }

    async fn create_field(&self, table_id: &str, spec: &FieldSpec) -> Result<FieldMeta, HostError> {
        let body = json!({ "field_name": spec.name, "type": spec.field_type.code() });
        let created: CreatedField = self
            .send_data(
                self.request(Method::POST, &format!("/{}/fields", table_id))
                    .json(&body),
            )
            .await?;
        let field = FieldMeta::from(created.field);
        self.remember_fields(table_id, std::slice::from_ref(&field));
        Ok(field)
    }

    async fn add_records(&self, table_id: &str, rows: &[Row]) -> Result<Vec<String>, HostError> {
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(json!({ "fields": self.named_fields(table_id, row).await? }));
        }
        let created: CreatedRecords = self
            .send_data(
                self.request(Method::POST, &format!("/{}/records/batch_create", table_id))
                    .json(&json!({ "records": records })),
            )
            .await?;
        Ok(created.records.into_iter().map(|r| r.record_id).collect())
    }

    async fn add_record(&self, table_id: &str, row: &Row) -> Result<String, HostError> {
        let fields = self.named_fields(table_id, row).await?;
        let created: CreatedRecord = self
            .send_data(
                self.request(Method::POST, &format!("/{}/records", table_id))
                    .json(&json!({ "fields": fields })),
            )
            .await?;
        Ok(created.record.record_id)
    }

    async fn list_record_ids(&self, table_id: &str) -> Result<Vec<String>, HostError> {
        let items: Vec<RecordItem> = self
            .paged(&format!("/{}/records", table_id), RECORD_PAGE_SIZE)
            .await?;
        Ok(items.into_iter().map(|r| r.record_id).collect())
    }

    async fn delete_records(&self, table_id: &str, record_ids: &[String]) -> Result<(), HostError> {
        self.send::<Value>(
            self.request(Method::POST, &format!("/{}/records/batch_delete", table_id))
                .json(&json!({ "records": record_ids })),
        )
        .await?;
        Ok(())
    }

    fn release_table(&self, table_id: &str) {
        if self.field_names.lock().remove(table_id).is_some() {
            debug!("Released field name cache for table {}", table_id);
        }
    }
}
