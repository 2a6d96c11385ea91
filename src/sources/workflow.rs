// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::reqwest_engine::HttpFetcher;
use crate::engines::traits::SourceError;
use crate::utils::json_unwrap::{unwrap_json, DEFAULT_MAX_DEPTH};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// 工作流接口响应外壳
#[derive(Debug, Deserialize)]
struct WorkflowEnvelope {
    code: i64,
    #[serde(default)]
    msg: String,
    /// 通常是再次编码过的JSON字符串
    #[serde(default)]
    data: Value,
}

/// 工作流接口客户端
///
/// 以 Bearer 凭据调用工作流，返回逐层解码后的 `output`。
pub struct WorkflowClient {
    fetcher: HttpFetcher,
    endpoint: String,
    token: Option<String>,
}

impl WorkflowClient {
    pub fn new(fetcher: HttpFetcher, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            token,
        }
    }

    /// 运行工作流
    ///
    /// # 参数
    ///
    /// * `workflow_id` - 工作流ID
    /// * `input` - 传给工作流的 `parameters.input`
    ///
    /// # 返回值
    ///
    /// * `Ok(Value)` - 解码后的 `output`
    /// * `Err(SourceError)` - 缺少凭据、请求失败、业务错误码或任一层解码失败
    pub async fn run(&self, workflow_id: &str, input: &str) -> Result<Value, SourceError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(SourceError::MissingCredential("workflow token"))?;
        if workflow_id.trim().is_empty() {
            return Err(SourceError::MissingCredential("workflow id"));
        }

        let body = json!({
            "workflow_id": workflow_id,
            "parameters": { "input": input },
        });
        let raw = self.fetcher.post_json(&self.endpoint, token, &body).await?;
        extract_output(&raw)
    }
}

/// 解析工作流响应，取出 `data.output`
pub fn extract_output(raw: &str) -> Result<Value, SourceError> {
    let envelope: WorkflowEnvelope = serde_json::from_str(raw)
        .map_err(|e| SourceError::malformed(format!("invalid envelope: {}", e), raw))?;
    if envelope.code != 0 {
        return Err(SourceError::Api {
            code: envelope.code,
            msg: envelope.msg,
        });
    }

    let data = unwrap_json(envelope.data, DEFAULT_MAX_DEPTH)?;
    let output = match data {
        Value::Object(mut map) => map
            .remove("output")
            .ok_or_else(|| SourceError::malformed("output field not found", raw))?,
        other => {
            return Err(SourceError::malformed(
                format!("data is not an object: {}", other),
                raw,
            ))
        }
    };
    let output = unwrap_json(output, DEFAULT_MAX_DEPTH)?;
    debug!("Workflow output decoded, {} bytes raw", raw.len());
    Ok(output)
}
