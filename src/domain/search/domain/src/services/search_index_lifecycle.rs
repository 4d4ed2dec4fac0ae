// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::InternalError;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Creates indexes and loads documents for a group of record types
#[async_trait::async_trait]
pub trait SearchIndexLifecycle: Send + Sync {
    /// Drops and recreates every index the bindings target, with the merged
    /// mappings of all bindings sharing it
    async fn ensure_indexes(
        &self,
        bindings: &[Arc<dyn SearchIndexBinding>],
    ) -> Result<(), SearchError>;

    /// Sends every eligible record as one bulk request per host. Returns the
    /// number of documents sent.
    async fn bulk_load(
        &self,
        bindings: &[Arc<dyn SearchIndexBinding>],
    ) -> Result<usize, SearchError>;

    async fn reindex_all(
        &self,
        bindings: &[Arc<dyn SearchIndexBinding>],
    ) -> Result<usize, SearchError> {
        self.ensure_indexes(bindings).await?;
        self.bulk_load(bindings).await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A schema together with its record source, erased over the record type
#[async_trait::async_trait]
pub trait SearchIndexBinding: Send + Sync {
    fn record_type_name(&self) -> &str;

    fn endpoint(&self) -> &SearchEndpoint;

    fn mapping(&self) -> serde_json::Value;

    async fn collect_documents(&self) -> Result<Vec<(RecordId, SearchDocument)>, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SchemaIndexBinding<R: SearchRecord + 'static> {
    schema: Arc<SearchSchema<R>>,
    source: Arc<dyn RecordSource<R>>,
}

impl<R: SearchRecord + 'static> SchemaIndexBinding<R> {
    pub fn new(schema: Arc<SearchSchema<R>>, source: Arc<dyn RecordSource<R>>) -> Self {
        Self { schema, source }
    }

    pub fn into_dyn(self) -> Arc<dyn SearchIndexBinding> {
        Arc::new(self)
    }
}

#[async_trait::async_trait]
impl<R: SearchRecord + 'static> SearchIndexBinding for SchemaIndexBinding<R> {
    fn record_type_name(&self) -> &str {
        self.schema.type_name()
    }

    fn endpoint(&self) -> &SearchEndpoint {
        self.schema.endpoint()
    }

    fn mapping(&self) -> serde_json::Value {
        self.schema.mapping()
    }

    async fn collect_documents(&self) -> Result<Vec<(RecordId, SearchDocument)>, InternalError> {
        let listing = self.schema.listing();

        let records = self.source.list_records(listing).await?;

        Ok(records
            .iter()
            // Sources may ignore the listing hint
            .filter(|record| listing.admits(*record))
            .map(|record| (record.record_id(), self.schema.document(record)))
            .collect())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
