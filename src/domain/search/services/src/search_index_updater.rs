// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use docsearch::{SearchEngine, SearchError, SearchRecord, SearchSchema};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Keeps the index in step with single record changes. Meant to be called
/// from the application's save/delete hooks.
pub struct SearchIndexUpdater<R: SearchRecord + 'static> {
    schema: Arc<SearchSchema<R>>,
    engine: Arc<dyn SearchEngine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdateOutcome {
    Indexed,
    Removed,
    Unchanged,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl<R: SearchRecord + 'static> SearchIndexUpdater<R> {
    pub fn new(schema: Arc<SearchSchema<R>>, engine: Arc<dyn SearchEngine>) -> Self {
        Self { schema, engine }
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(type_name = %self.schema.type_name(), record_id = %record.record_id())
    )]
    pub async fn put_one(&self, record: &R) -> Result<(), SearchError> {
        self.engine
            .put_document(
                self.schema.endpoint(),
                &record.record_id(),
                self.schema.document(record),
            )
            .await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(type_name = %self.schema.type_name(), record_id = %record.record_id())
    )]
    pub async fn delete_one(&self, record: &R) -> Result<(), SearchError> {
        self.engine
            .delete_document(self.schema.endpoint(), &record.record_id())
            .await
    }

    pub async fn exists(&self, id: &str) -> Result<bool, SearchError> {
        self.engine
            .document_exists(self.schema.endpoint(), id)
            .await
    }

    /// Records the schema's listing does not admit (e.g. unpublished ones)
    /// are taken out of the index instead of being upserted
    pub async fn on_record_saved(&self, record: &R) -> Result<IndexUpdateOutcome, SearchError> {
        let outcome = if self.schema.listing().admits(record) {
            self.put_one(record).await?;
            IndexUpdateOutcome::Indexed
        } else if self.exists(&record.record_id()).await? {
            self.delete_one(record).await?;
            IndexUpdateOutcome::Removed
        } else {
            IndexUpdateOutcome::Unchanged
        };

        tracing::info!(
            type_name = %self.schema.type_name(),
            record_id = %record.record_id(),
            ?outcome,
            "Search index updated after record save",
        );

        Ok(outcome)
    }

    pub async fn on_record_deleted(&self, record: &R) -> Result<(), SearchError> {
        self.delete_one(record).await?;

        tracing::info!(
            type_name = %self.schema.type_name(),
            record_id = %record.record_id(),
            "Search index updated after record deletion",
        );

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
