// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::crawl_to_table::CrawlToTableUseCase;
use crate::config::settings::{BatchSettings, Settings};
use crate::domain::repositories::base_repository::BaseHost;
use crate::domain::services::table_provisioner::TableProvisioner;
use crate::domain::services::table_writer::TableWriter;
use crate::engines::reqwest_engine::HttpFetcher;
use crate::engines::traits::SourceError;
use crate::presentation::controller::UiController;
use crate::sources::hot_topics::HotTopicsClient;
use crate::sources::product::ProductClient;
use crate::sources::video::VideoClient;
use crate::sources::workflow::WorkflowClient;
use crate::sources::SourceClient;
use std::sync::Arc;

/// 路由共享状态
pub struct AppState {
    pub controller: Arc<UiController>,
    pub products: CrawlToTableUseCase<ProductClient>,
    pub hot_topics: CrawlToTableUseCase<HotTopicsClient>,
    pub videos: CrawlToTableUseCase<VideoClient>,
}

impl AppState {
    pub fn new(
        controller: Arc<UiController>,
        products: CrawlToTableUseCase<ProductClient>,
        hot_topics: CrawlToTableUseCase<HotTopicsClient>,
        videos: CrawlToTableUseCase<VideoClient>,
    ) -> Self {
        Self {
            controller,
            products,
            hot_topics,
            videos,
        }
    }

    /// 按配置组装三个数据源的完整流程
    pub fn from_settings(settings: &Settings, host: Arc<dyn BaseHost>) -> Result<Self, SourceError> {
        let sources = &settings.sources;
        let fetcher = HttpFetcher::new(sources.request_timeout(), &sources.user_agent)?;
        let workflow = Arc::new(WorkflowClient::new(
            fetcher.clone(),
            sources.workflow.endpoint.clone(),
            sources.workflow.token.clone(),
        ));
        let provisioner = Arc::new(TableProvisioner::new(
            host.clone(),
            settings.writer.clear_page_size,
        ));

        let products = pipeline(
            ProductClient::new(fetcher, sources),
            &provisioner,
            &host,
            settings.writer.product,
        );
        let hot_topics = pipeline(
            HotTopicsClient::new(
                workflow.clone(),
                sources.workflow.hot_topics_workflow_id.clone(),
            ),
            &provisioner,
            &host,
            settings.writer.hot_topics,
        );
        let videos = pipeline(
            VideoClient::new(workflow, sources),
            &provisioner,
            &host,
            settings.writer.video,
        );

        Ok(Self::new(
            Arc::new(UiController::default()),
            products,
            hot_topics,
            videos,
        ))
    }
}

fn pipeline<S: SourceClient>(
    client: S,
    provisioner: &Arc<TableProvisioner>,
    host: &Arc<dyn BaseHost>,
    batch: BatchSettings,
) -> CrawlToTableUseCase<S> {
    let writer = TableWriter::new(
        host.clone(),
        client.source(),
        batch.batch_size,
        batch.inter_batch_delay(),
    );
    CrawlToTableUseCase::new(Arc::new(client), provisioner.clone(), writer)
}
