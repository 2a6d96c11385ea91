// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use thiserror::Error;

/// 默认最大解码层数
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// 原始片段在错误信息中保留的最大字符数
const SNIPPET_CHARS: usize = 200;

/// 多层JSON字符串解码错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnwrapError {
    /// 某一层不是合法JSON
    #[error("layer {layer} is not valid JSON: {reason}; raw: {snippet}")]
    MalformedLayer {
        layer: usize,
        reason: String,
        snippet: String,
    },
    /// 超过最大解码层数
    #[error("still a JSON string after {max_depth} layers; raw: {snippet}")]
    TooDeep { max_depth: usize, snippet: String },
}

impl UnwrapError {
    /// 出错层的原始片段
    pub fn snippet(&self) -> &str {
        match self {
            UnwrapError::MalformedLayer { snippet, .. } => snippet,
            UnwrapError::TooDeep { snippet, .. } => snippet,
        }
    }
}

/// 截取用于诊断的原始片段
pub fn snippet(raw: &str) -> String {
    let mut out: String = raw.chars().take(SNIPPET_CHARS).collect();
    if raw.chars().count() > SNIPPET_CHARS {
        out.push('…');
    }
    out
}

/// 逐层解码被多次JSON编码的值
///
/// 只要当前值仍是字符串就按JSON解析一次，直到得到对象、数组或其他非字符串值。
/// 任意一层解析失败即返回 `MalformedLayer`，不会静默丢弃数据。
///
/// # 参数
///
/// * `value` - 待解码的值
/// * `max_depth` - 最多解码的字符串层数
pub fn unwrap_json(value: Value, max_depth: usize) -> Result<Value, UnwrapError> {
    unwrap_layer(value, 0, max_depth)
}

/// 从原始响应文本开始解码
pub fn unwrap_json_str(raw: &str, max_depth: usize) -> Result<Value, UnwrapError> {
    unwrap_json(Value::String(raw.to_string()), max_depth)
}

fn unwrap_layer(value: Value, layer: usize, max_depth: usize) -> Result<Value, UnwrapError> {
    match value {
        Value::String(raw) => {
            if layer >= max_depth {
                return Err(UnwrapError::TooDeep {
                    max_depth,
                    snippet: snippet(&raw),
                });
            }
            let parsed: Value =
                serde_json::from_str(raw.trim()).map_err(|e| UnwrapError::MalformedLayer {
                    layer: layer + 1,
                    reason: e.to_string(),
                    snippet: snippet(&raw),
                })?;
            unwrap_layer(parsed, layer + 1, max_depth)
        }
        other => Ok(other),
    }
}
