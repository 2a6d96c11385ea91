// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::presentation::controller::ControllerError;
use crate::utils::errors::PipelineError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(e) = self.0.downcast_ref::<ControllerError>() {
            return match e {
                ControllerError::Busy => StatusCode::CONFLICT,
                ControllerError::Pipeline(PipelineError::InvalidInput(_)) => {
                    StatusCode::BAD_REQUEST
                }
                ControllerError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if self.0.downcast_ref::<ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn message(&self) -> String {
        match self.0.downcast_ref::<ValidationErrors>() {
            Some(errors) => validation_message(errors),
            None => self.0.to_string(),
        }
    }
}

/// 取校验错误中的提示文字
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string())
        })
        .collect();
    if messages.is_empty() {
        errors.to_string()
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "success": false, "error": self.message() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
