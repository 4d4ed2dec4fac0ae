// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use docsearch::*;
use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use reqwest::StatusCode;
use url::Url;

use crate::{ElasticsearchClientConfig, es_client};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// [`SearchEngine`] speaking the Elasticsearch JSON-over-HTTP protocol
pub struct ElasticsearchSearchEngine {
    client: reqwest::Client,
    config: Arc<ElasticsearchClientConfig>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl ElasticsearchSearchEngine {
    pub fn new(config: Arc<ElasticsearchClientConfig>) -> Result<Self, InternalError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .int_err()?;

        Ok(Self { client, config })
    }

    fn url(host: &Url, segments: &[&str]) -> Result<Url, InternalError> {
        let mut url = host.clone();
        {
            let Ok(mut path) = url.path_segments_mut() else {
                return Err(InternalError::new(format!(
                    "Search host '{host}' cannot be a base URL"
                )));
            };
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn index_url(&self, host: &Url, index_name: &str) -> Result<Url, InternalError> {
        let mut url = Self::url(host, &[index_name, ""])?;
        if self.config.enable_pretty {
            url.query_pairs_mut().append_key_only("pretty");
        }
        Ok(url)
    }

    fn doc_type_url(endpoint: &SearchEndpoint, action: &str) -> Result<Url, InternalError> {
        Self::url(
            &endpoint.host,
            &[&endpoint.index_name, &endpoint.doc_type, action],
        )
    }

    /// Turns an error status into a [`BackendError`], using the engine's own
    /// message when the body carries one
    async fn failure(response: reqwest::Response) -> SearchError {
        let status = response.status();
        let raw_body = match response.text().await {
            Ok(raw_body) => raw_body,
            Err(e) => return e.int_err().into(),
        };

        serde_json::from_str::<serde_json::Value>(&raw_body)
            .ok()
            .and_then(|body| es_client::ErrorResponse::from_body(&body))
            .unwrap_or_default()
            .into_backend_error(Some(status.as_u16()), &raw_body)
            .into()
    }

    /// Some engine versions answer 200 with an `error` body, which is a
    /// failure just the same
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SearchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(response).await);
        }

        let raw_body = response.text().await.int_err()?;
        let body = serde_json::from_str::<serde_json::Value>(&raw_body).int_err()?;

        if let Some(error) = es_client::ErrorResponse::from_body(&body) {
            return Err(error
                .into_backend_error(Some(status.as_u16()), &raw_body)
                .into());
        }

        Ok(serde_json::from_value(body).int_err()?)
    }

    async fn check_status(
        response: reqwest::Response,
        not_found_is_ok: bool,
    ) -> Result<(), SearchError> {
        let status = response.status();
        if status.is_success() || (not_found_is_ok && status == StatusCode::NOT_FOUND) {
            Ok(())
        } else {
            Err(Self::failure(response).await)
        }
    }

    async fn probe(&self, url: Url) -> Result<bool, SearchError> {
        let response = self.client.head(url).send().await.int_err()?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(BackendError {
                status: Some(status.as_u16()),
                message: format!("Unexpected status {status} of existence probe"),
            }
            .into()),
        }
    }

    async fn expect_acknowledged(
        response: reqwest::Response,
        index_name: &str,
        operation: IndexOperation,
    ) -> Result<(), SearchError> {
        let status = response.status();
        let raw_body = response.text().await.int_err()?;

        let acknowledged = status.is_success()
            && serde_json::from_str::<es_client::AcknowledgedResponse>(&raw_body)
                .is_ok_and(|r| r.acknowledged);
        if acknowledged {
            return Ok(());
        }

        let message = serde_json::from_str::<serde_json::Value>(&raw_body)
            .ok()
            .and_then(|body| es_client::ErrorResponse::from_body(&body))
            .and_then(|e| e.error)
            .map_or_else(|| raw_body.clone(), |cause| cause.message());

        Err(NotAcknowledgedError {
            index_name: index_name.to_string(),
            operation,
            message,
        }
        .into())
    }

    fn bulk_body(operations: &[BulkIndexOperation]) -> Result<String, InternalError> {
        let mut body = String::new();

        for op in operations {
            let action = serde_json::json!({
                "index": {
                    "_index": op.index_name,
                    "_type": op.doc_type,
                    "_id": op.id,
                }
            });
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&serde_json::to_string(&op.document).int_err()?);
            body.push('\n');
        }

        Ok(body)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl SearchEngine for ElasticsearchSearchEngine {
    #[tracing::instrument(level = "debug", skip_all, fields(%host, %index_name))]
    async fn index_exists(&self, host: &Url, index_name: &str) -> Result<bool, SearchError> {
        self.probe(Self::url(host, &[index_name, ""])?).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%host, %index_name))]
    async fn delete_index(&self, host: &Url, index_name: &str) -> Result<(), SearchError> {
        let url = self.index_url(host, index_name)?;

        let response = self.client.delete(url).send().await.int_err()?;

        Self::expect_acknowledged(response, index_name, IndexOperation::Delete).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%host, %index_name))]
    async fn create_index(
        &self,
        host: &Url,
        index_name: &str,
        body: serde_json::Value,
    ) -> Result<(), SearchError> {
        let url = self.index_url(host, index_name)?;
        tracing::debug!(%url, %body, "Creating index");

        let response = self.client.put(url).json(&body).send().await.int_err()?;

        Self::expect_acknowledged(response, index_name, IndexOperation::Create).await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(index_name = %endpoint.index_name, doc_type = %endpoint.doc_type)
    )]
    async fn count(
        &self,
        endpoint: &SearchEndpoint,
        body: serde_json::Value,
    ) -> Result<u64, SearchError> {
        let url = Self::doc_type_url(endpoint, "_count")?;
        tracing::debug!(%url, %body, "Sending count request");

        let response = self.client.post(url).json(&body).send().await.int_err()?;

        let count: es_client::CountResponse = Self::read_json(response).await?;
        Ok(count.count)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(index_name = %endpoint.index_name, doc_type = %endpoint.doc_type, ?page)
    )]
    async fn search(
        &self,
        endpoint: &SearchEndpoint,
        body: serde_json::Value,
        page: SearchPage,
    ) -> Result<SearchHits, SearchError> {
        let mut url = Self::doc_type_url(endpoint, "_search")?;
        url.query_pairs_mut()
            .append_pair("size", &page.size.to_string())
            .append_pair("from", &page.from.to_string());
        tracing::debug!(%url, %body, "Sending search request");

        let response = self.client.post(url).json(&body).send().await.int_err()?;

        let search: es_client::SearchResponse = Self::read_json(response).await?;
        Ok(search.into())
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(index_name = %endpoint.index_name, doc_type = %endpoint.doc_type, %id)
    )]
    async fn put_document(
        &self,
        endpoint: &SearchEndpoint,
        id: &str,
        document: SearchDocument,
    ) -> Result<(), SearchError> {
        let url = Self::doc_type_url(endpoint, id)?;

        let response = self
            .client
            .put(url)
            .json(&document)
            .send()
            .await
            .int_err()?;

        Self::check_status(response, false).await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(index_name = %endpoint.index_name, doc_type = %endpoint.doc_type, %id)
    )]
    async fn document_exists(
        &self,
        endpoint: &SearchEndpoint,
        id: &str,
    ) -> Result<bool, SearchError> {
        self.probe(Self::doc_type_url(endpoint, id)?).await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(index_name = %endpoint.index_name, doc_type = %endpoint.doc_type, %id)
    )]
    async fn delete_document(
        &self,
        endpoint: &SearchEndpoint,
        id: &str,
    ) -> Result<(), SearchError> {
        let url = Self::doc_type_url(endpoint, id)?;

        let response = self.client.delete(url).send().await.int_err()?;

        Self::check_status(response, true).await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(%host, num_operations = operations.len())
    )]
    async fn bulk(
        &self,
        host: &Url,
        operations: Vec<BulkIndexOperation>,
    ) -> Result<(), SearchError> {
        let url = Self::url(host, &["_bulk"])?;
        let body = Self::bulk_body(&operations)?;

        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .int_err()?;

        let status = response.status();
        let bulk: es_client::BulkResponse = Self::read_json(response).await?;

        if let Some(message) = bulk.failure_summary() {
            return Err(BackendError {
                status: Some(status.as_u16()),
                message,
            }
            .into());
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
