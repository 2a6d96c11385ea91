// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use basecrawl::config::settings::Settings;
use basecrawl::domain::repositories::base_repository::BaseHost;
use basecrawl::infrastructure::bitable::BitableClient;
use basecrawl::infrastructure::memory_base::InMemoryBase;
use basecrawl::infrastructure::metrics::init_metrics;
use basecrawl::presentation::routes;
use basecrawl::presentation::state::AppState;
use basecrawl::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting basecrawl...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Initialize Prometheus metrics
    init_metrics(&settings.metrics);

    // 4. Connect to the host base
    let host: Arc<dyn BaseHost> = match settings.bitable.credentials() {
        Some((app_token, access_token)) => {
            info!("Writing to Bitable app at {}", settings.bitable.base_url);
            Arc::new(BitableClient::new(
                &settings.bitable.base_url,
                app_token,
                access_token,
                settings.sources.request_timeout(),
            )?)
        }
        None => {
            warn!("Bitable credentials not configured, records are kept in memory only");
            Arc::new(InMemoryBase::new())
        }
    };

    // 5. Wire sources, table services and the controller
    let state = Arc::new(AppState::from_settings(&settings, host)?);
    info!(
        "Sources ready, fallback policy: {:?}",
        settings.sources.fallback_policy
    );

    // 6. Start HTTP server
    let app = routes::routes(state);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
