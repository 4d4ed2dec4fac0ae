// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use docsearch::{
    BulkIndexOperation,
    InvalidArgumentError,
    SearchAnalysisConfig,
    SearchEngine,
    SearchError,
    SearchIndexBinding,
    SearchIndexLifecycle,
};
use url::Url;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SearchIndexLifecycleImpl {
    engine: Arc<dyn SearchEngine>,
    analysis: Arc<SearchAnalysisConfig>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Bindings sharing one physical index
struct IndexGroup<'a> {
    host: &'a Url,
    index_name: &'a str,
    bindings: Vec<&'a dyn SearchIndexBinding>,
}

impl IndexGroup<'_> {
    fn doc_types(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .map(|binding| binding.endpoint().doc_type.as_str())
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl SearchIndexLifecycleImpl {
    pub fn new(engine: Arc<dyn SearchEngine>, analysis: Arc<SearchAnalysisConfig>) -> Self {
        Self { engine, analysis }
    }

    /// Groups in first-seen order. A document type may appear only once per
    /// index, otherwise the merged mappings would collide.
    fn group_by_index(
        bindings: &[Arc<dyn SearchIndexBinding>],
    ) -> Result<Vec<IndexGroup<'_>>, InvalidArgumentError> {
        let mut groups: Vec<IndexGroup<'_>> = Vec::new();

        for binding in bindings {
            let endpoint = binding.endpoint();

            let group = match groups.iter_mut().position(|group| {
                *group.host == endpoint.host && group.index_name == endpoint.index_name
            }) {
                Some(i) => &mut groups[i],
                None => {
                    groups.push(IndexGroup {
                        host: &endpoint.host,
                        index_name: &endpoint.index_name,
                        bindings: Vec::new(),
                    });
                    let last = groups.len() - 1;
                    &mut groups[last]
                }
            };

            if let Some(existing) = group
                .bindings
                .iter()
                .find(|existing| existing.endpoint().doc_type == endpoint.doc_type)
            {
                return Err(InvalidArgumentError::new(format!(
                    "Document type '{}' of '{}' collides with '{}' in index '{}'",
                    endpoint.doc_type,
                    binding.record_type_name(),
                    existing.record_type_name(),
                    endpoint.index_name,
                )));
            }

            group.bindings.push(binding.as_ref());
        }

        Ok(groups)
    }

    async fn recreate_index(&self, group: &IndexGroup<'_>) -> Result<(), SearchError> {
        if self
            .engine
            .index_exists(group.host, group.index_name)
            .await?
        {
            self.engine
                .delete_index(group.host, group.index_name)
                .await?;

            tracing::info!(index_name = %group.index_name, "Deleted existing search index");
        }

        let mut mappings = serde_json::Map::new();
        for binding in &group.bindings {
            if let serde_json::Value::Object(mapping) = binding.mapping() {
                mappings.extend(mapping);
            }
        }

        let body = serde_json::json!({
            "settings": self.analysis.index_settings(),
            "mappings": mappings,
        });

        self.engine
            .create_index(group.host, group.index_name, body)
            .await?;

        tracing::info!(
            index_name = %group.index_name,
            doc_types = ?group.doc_types(),
            "Created search index",
        );

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl SearchIndexLifecycle for SearchIndexLifecycleImpl {
    #[tracing::instrument(
        level = "info",
        name = "SearchIndexLifecycleImpl::ensure_indexes",
        skip_all,
        fields(num_bindings = bindings.len())
    )]
    async fn ensure_indexes(
        &self,
        bindings: &[Arc<dyn SearchIndexBinding>],
    ) -> Result<(), SearchError> {
        let groups = Self::group_by_index(bindings)?;

        for group in &groups {
            if let Err(e) = self.recreate_index(group).await {
                tracing::error!(
                    index_name = %group.index_name,
                    error = ?e,
                    error_msg = %e,
                    "Failed to recreate search index",
                );
                return Err(e);
            }
        }

        Ok(())
    }

    #[tracing::instrument(
        level = "info",
        name = "SearchIndexLifecycleImpl::bulk_load",
        skip_all,
        fields(num_bindings = bindings.len())
    )]
    async fn bulk_load(
        &self,
        bindings: &[Arc<dyn SearchIndexBinding>],
    ) -> Result<usize, SearchError> {
        let groups = Self::group_by_index(bindings)?;

        // One request per host, covering every index on it
        let mut payloads: Vec<(&Url, Vec<BulkIndexOperation>)> = Vec::new();

        for group in &groups {
            for binding in &group.bindings {
                let documents = binding.collect_documents().await?;

                tracing::debug!(
                    record_type = binding.record_type_name(),
                    num_documents = documents.len(),
                    "Collected documents for bulk load",
                );

                let endpoint = binding.endpoint();
                let operations = documents.into_iter().map(|(id, document)| BulkIndexOperation {
                    index_name: endpoint.index_name.clone(),
                    doc_type: endpoint.doc_type.clone(),
                    id,
                    document,
                });

                match payloads.iter_mut().find(|(host, _)| *host == group.host) {
                    Some((_, payload)) => payload.extend(operations),
                    None => payloads.push((group.host, operations.collect())),
                }
            }
        }

        let mut num_sent = 0;

        for (host, operations) in payloads {
            if operations.is_empty() {
                continue;
            }

            let num_operations = operations.len();

            if let Err(e) = self.engine.bulk(host, operations).await {
                tracing::error!(
                    %host,
                    num_operations,
                    error = ?e,
                    error_msg = %e,
                    "Bulk load failed",
                );
                return Err(e);
            }

            num_sent += num_operations;
        }

        tracing::info!(num_sent, "Completed bulk load of search documents");

        Ok(num_sent)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
