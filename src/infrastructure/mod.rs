// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域层宿主表格接口的具体实现以及指标导出。
///
/// 包含的子模块：
/// - 多维表格（bitable）：飞书多维表格开放接口客户端
/// - 内存表格（memory_base）：演练模式与测试使用的内存实现
/// - 指标（metrics）：Prometheus 指标导出
pub mod bitable;
pub mod memory_base;
pub mod metrics;
