// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use url::Url;

use crate::{SearchDocument, SearchEndpoint, SearchError, SearchHits, SearchPage};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Wire-level operations of the full-text search engine
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait SearchEngine: Send + Sync {
    async fn index_exists(&self, host: &Url, index_name: &str) -> Result<bool, SearchError>;

    /// Fails with `NotAcknowledged` unless the engine acknowledges deletion
    async fn delete_index(&self, host: &Url, index_name: &str) -> Result<(), SearchError>;

    /// Fails with `NotAcknowledged` unless the engine acknowledges creation
    async fn create_index(
        &self,
        host: &Url,
        index_name: &str,
        body: serde_json::Value,
    ) -> Result<(), SearchError>;

    /// Body must not carry a sort clause
    async fn count(
        &self,
        endpoint: &SearchEndpoint,
        body: serde_json::Value,
    ) -> Result<u64, SearchError>;

    async fn search(
        &self,
        endpoint: &SearchEndpoint,
        body: serde_json::Value,
        page: SearchPage,
    ) -> Result<SearchHits, SearchError>;

    async fn put_document(
        &self,
        endpoint: &SearchEndpoint,
        id: &str,
        document: SearchDocument,
    ) -> Result<(), SearchError>;

    async fn document_exists(
        &self,
        endpoint: &SearchEndpoint,
        id: &str,
    ) -> Result<bool, SearchError>;

    /// Deleting a document that is not indexed is not an error
    async fn delete_document(
        &self,
        endpoint: &SearchEndpoint,
        id: &str,
    ) -> Result<(), SearchError>;

    async fn bulk(
        &self,
        host: &Url,
        operations: Vec<BulkIndexOperation>,
    ) -> Result<(), SearchError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct BulkIndexOperation {
    pub index_name: String,
    pub doc_type: String,
    pub id: String,
    pub document: SearchDocument,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
