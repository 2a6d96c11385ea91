// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hot_topic::{hot_topic_table_name, HotTopicItem};
use crate::engines::router::{FallbackPolicy, StrategyChain};
use crate::engines::traits::{SourceError, SourceStrategy};
use crate::sources::workflow::WorkflowClient;
use crate::sources::SourceClient;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::sync::Arc;

/// 通过工作流获取热榜
pub struct HotTopicsWorkflowStrategy {
    client: Arc<WorkflowClient>,
    workflow_id: String,
}

impl HotTopicsWorkflowStrategy {
    pub fn new(client: Arc<WorkflowClient>, workflow_id: impl Into<String>) -> Self {
        Self {
            client,
            workflow_id: workflow_id.into(),
        }
    }
}

/// 将工作流输出转换为热榜条目，输出必须是数组
pub fn parse_hot_topics(output: Value) -> Result<Vec<HotTopicItem>, SourceError> {
    match output {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                let raw = item.to_string();
                serde_json::from_value::<HotTopicItem>(item)
                    .map(|t| HotTopicItem::new(t.content, t.topic_type, t.value))
                    .map_err(|e| SourceError::malformed(format!("invalid hot topic: {}", e), &raw))
            })
            .collect(),
        other => Err(SourceError::malformed(
            "output array not found",
            &other.to_string(),
        )),
    }
}

#[async_trait]
impl SourceStrategy<HotTopicItem> for HotTopicsWorkflowStrategy {
    async fn fetch(&self, _query: &str, _max_count: usize) -> Result<Vec<HotTopicItem>, SourceError> {
        let output = self.client.run(&self.workflow_id, "").await?;
        parse_hot_topics(output)
    }

    fn name(&self) -> &'static str {
        "workflow"
    }

    fn label(&self) -> &'static str {
        "热榜工作流"
    }
}

/// 热榜客户端，没有查询参数，也没有合成数据兜底
pub struct HotTopicsClient {
    chain: StrategyChain<HotTopicItem>,
}

impl HotTopicsClient {
    pub fn new(client: Arc<WorkflowClient>, workflow_id: impl Into<String>) -> Self {
        let strategy: Arc<dyn SourceStrategy<HotTopicItem>> =
            Arc::new(HotTopicsWorkflowStrategy::new(client, workflow_id));
        Self::with_strategies(vec![strategy])
    }

    pub fn with_strategies(strategies: Vec<Arc<dyn SourceStrategy<HotTopicItem>>>) -> Self {
        Self {
            chain: StrategyChain::new("hot_topics", strategies, FallbackPolicy::SurfaceNoLiveData),
        }
    }
}

#[async_trait]
impl SourceClient for HotTopicsClient {
    type Record = HotTopicItem;

    fn source(&self) -> &'static str {
        "hot_topics"
    }

    fn validate(&self, _query: &str) -> Result<String, SourceError> {
        Ok(String::new())
    }

    fn chain(&self) -> &StrategyChain<HotTopicItem> {
        &self.chain
    }

    fn table_name(&self, _query: &str, now: DateTime<Local>) -> String {
        hot_topic_table_name(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_hot_topic_item_keeps_raw_snippet() {
        match parse_hot_topics(json!(["not-an-object-item"])) {
            Err(SourceError::MalformedResponse { reason, snippet }) => {
                assert!(reason.starts_with("invalid hot topic"));
                assert!(snippet.contains("not-an-object-item"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_hot_topics_with_mixed_types() {
        let output = json!([
            {"hot_content": "A", "hot_type": "", "hot_value": 12000000},
            {"hot_content": "B", "hot_type": "热", "hot_value": "35,000"},
            {"hot_content": "C", "hot_value": null}
        ]);

        let items = parse_hot_topics(output).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].value_display().contains("千万"));
        assert_eq!(items[0].type_display(), "普通");
        assert_eq!(items[1].value, 35000.0);
        assert_eq!(items[1].value_display(), "3.5万");
        assert_eq!(items[2].value, 0.0);
        assert_eq!(items[2].type_display(), "普通");
    }

    #[test]
    fn test_non_array_output_is_malformed() {
        let err = parse_hot_topics(json!({"list": []})).unwrap_err();
        assert!(matches!(err, SourceError::MalformedResponse { .. }));
    }
}
