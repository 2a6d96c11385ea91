// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod crawl_result;
pub mod de;
pub mod hot_topic;
pub mod product;
pub mod table;
pub mod video;
