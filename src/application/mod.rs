// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排数据源、建表与写入，形成完整的抓取入表流程
pub mod dto;
pub mod use_cases;
