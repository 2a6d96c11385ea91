// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 抓取入表用例与数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 记录模型、进度上报、宿主表格接口与建表写入服务
pub mod domain;

/// 引擎模块
///
/// HTTP 抓取与按序回退的策略链
pub mod engines;

/// 基础设施模块
///
/// 多维表格客户端、内存表格与指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由、处理器和界面状态
pub mod presentation;

/// 数据源模块
pub mod sources;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
