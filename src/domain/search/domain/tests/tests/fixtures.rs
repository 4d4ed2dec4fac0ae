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

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Article {
    pub(crate) id: u64,
    pub(crate) title: String,
    pub(crate) rank: i64,
}

impl Article {
    pub(crate) fn new(id: u64, title: &str, rank: i64) -> Self {
        Self {
            id,
            title: title.to_string(),
            rank,
        }
    }
}

impl SearchRecord for Article {
    fn record_id(&self) -> RecordId {
        self.id.to_string()
    }

    fn field_value(&self, field_name: &str) -> serde_json::Value {
        match field_name {
            "title" => self.title.clone().into(),
            "rank" => self.rank.into(),
            _ => serde_json::Value::Null,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn article_schema() -> Arc<SearchSchema<Article>> {
    Arc::new(
        SearchSchema::builder("news", "Article")
            .field("title", FieldDescriptor::text())
            .field("rank", FieldDescriptor::long())
            .build(&SearchTargetConfig::default())
            .unwrap(),
    )
}

/// Articles 1..=n with descending scores: article 1 is the best match
pub(crate) fn articles(n: u64) -> Vec<Article> {
    (1..=n)
        .map(|id| Article::new(id, &format!("Cat #{id}"), i64::try_from(id).unwrap()))
        .collect()
}

pub(crate) fn hits_for(ids: &[u64], total: u64) -> SearchHits {
    SearchHits {
        total,
        hits: ids
            .iter()
            .map(|id| SearchHit {
                id: id.to_string(),
                score: Some(1.0 / f64::from(u32::try_from(*id).unwrap())),
            })
            .collect(),
    }
}

/// Fake lookup honoring the first ordering only. Unordered lookups come back
/// in reverse id order so that relevance sorting is observable.
pub(crate) fn lookup_returning(
    lookup: &mut MockRecordLookup<Article>,
    all: Vec<Article>,
    times: usize,
) {
    lookup
        .expect_find_by_ids()
        .times(times)
        .returning(move |ids, ordering, _| {
            let mut found = all
                .iter()
                .filter(|article| ids.contains(&article.record_id()))
                .cloned()
                .collect::<Vec<_>>();

            found.sort_by_key(|article| std::cmp::Reverse(article.id));

            if let Some(order) = ordering.first() {
                match order.field.as_str() {
                    "rank" => found.sort_by_key(|article| article.rank),
                    "title" => found.sort_by(|a, b| a.title.cmp(&b.title)),
                    _ => {}
                }
                if order.descending {
                    found.reverse();
                }
            }

            Ok(found)
        });
}

pub(crate) fn result_set(
    query: &str,
    engine: MockSearchEngine,
    lookup: MockRecordLookup<Article>,
) -> SearchResultSet<Article> {
    Searcher::new(article_schema(), Arc::new(engine), Arc::new(lookup)).search(query)
}

pub(crate) fn ids(records: &[Article]) -> Vec<u64> {
    records.iter().map(|article| article.id).collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
