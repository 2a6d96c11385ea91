// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod bitable_client_test;
pub mod product_source_test;
pub mod routes_test;
pub mod workflow_source_test;
