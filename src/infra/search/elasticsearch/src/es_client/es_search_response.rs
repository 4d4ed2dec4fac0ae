// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, serde::Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHitsResponse,
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchHitsResponse {
    pub total: SearchHitsTotalResponse,
    pub hits: Vec<SearchHitResponse>,
}

/// Older engines report a bare number, newer ones an object
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum SearchHitsTotalResponse {
    Count(u64),
    Detailed { value: u64 },
}

impl SearchHitsTotalResponse {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(value) | Self::Detailed { value } => *value,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchHitResponse {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_score")]
    pub score: Option<f64>,
}

impl From<SearchResponse> for docsearch::SearchHits {
    fn from(value: SearchResponse) -> Self {
        Self {
            total: value.hits.total.value(),
            hits: value
                .hits
                .hits
                .into_iter()
                .map(|hit| docsearch::SearchHit {
                    id: hit.id,
                    score: hit.score,
                })
                .collect(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, serde::Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, serde::Deserialize)]
pub struct AcknowledgedResponse {
    #[serde(default)]
    pub acknowledged: bool,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
