// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 字段映射（field_mapper）：确保目标表字段齐全并给出字段ID映射
/// - 建表（table_provisioner）：按名称查找或创建目标表，复用时清空旧数据
/// - 批量写入（table_writer）：分批写入记录，批次失败时逐条重试
pub mod field_mapper;
pub mod table_provisioner;
pub mod table_writer;
