// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型
pub mod models;

/// 进度上报
pub mod progress;

/// 宿主表格访问接口
pub mod repositories;

/// 建表、字段映射与写入服务
pub mod services;
