// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Entry point for querying one record type
pub struct Searcher<R: SearchRecord + 'static> {
    schema: Arc<SearchSchema<R>>,
    engine: Arc<dyn SearchEngine>,
    lookup: Arc<dyn RecordLookup<R>>,
}

impl<R: SearchRecord + 'static> Searcher<R> {
    pub fn new(
        schema: Arc<SearchSchema<R>>,
        engine: Arc<dyn SearchEngine>,
        lookup: Arc<dyn RecordLookup<R>>,
    ) -> Self {
        Self {
            schema,
            engine,
            lookup,
        }
    }

    pub fn schema(&self) -> &Arc<SearchSchema<R>> {
        &self.schema
    }

    /// Does not touch the network until the result set is accessed
    pub fn search(&self, query: impl Into<String>) -> SearchResultSet<R> {
        SearchResultSet::new(
            query,
            self.schema.clone(),
            self.engine.clone(),
            self.lookup.clone(),
        )
    }
}

impl<R: SearchRecord + 'static> Clone for Searcher<R> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            engine: self.engine.clone(),
            lookup: self.lookup.clone(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
