// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{RecordOrdering, SearchSchema};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ordering key standing for the engine-computed relevance score
pub const RELEVANCE_FIELD: &str = "_score";
pub const RELEVANCE_FIELD_ALIAS: &str = "score";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One parsed ordering token, e.g. `"-rank"` or `"_score"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortDirective {
    Relevance { descending: bool },
    Field { name: String, descending: bool },
}

impl SortDirective {
    /// A leading `-` requests descending order, except for relevance, where
    /// high is best: there a bare name means descending and `-` ascending.
    pub fn parse(token: &str) -> Option<Self> {
        let (name, minus) = match token.strip_prefix('-') {
            Some(name) => (name, true),
            None => (token, false),
        };

        if name.is_empty() {
            return None;
        }

        if name == RELEVANCE_FIELD || name == RELEVANCE_FIELD_ALIAS {
            Some(Self::Relevance { descending: !minus })
        } else {
            Some(Self::Field {
                name: name.to_string(),
                descending: minus,
            })
        }
    }

    pub fn parse_all<S: AsRef<str>>(tokens: &[S]) -> Vec<Self> {
        tokens
            .iter()
            .filter_map(|token| Self::parse(token.as_ref()))
            .collect()
    }

    pub fn is_relevance(&self) -> bool {
        matches!(self, Self::Relevance { .. })
    }

    pub fn to_record_ordering(&self) -> Option<RecordOrdering> {
        match self {
            Self::Relevance { .. } => None,
            Self::Field { name, descending } => Some(RecordOrdering {
                field: name.clone(),
                descending: *descending,
            }),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SearchQueryBuilder {}

impl SearchQueryBuilder {
    /// Request body for either the `_search` or the `_count` endpoint. The
    /// count endpoint rejects sorting and source filtering, so neither is
    /// emitted when `for_count` is set.
    pub fn build_query<R, S: AsRef<str>>(
        query_text: &str,
        ordering: &[S],
        schema: &SearchSchema<R>,
        for_count: bool,
    ) -> serde_json::Value {
        let mut query_json = serde_json::json!({
            "query": Self::query_argument(query_text),
        });

        if for_count {
            return query_json;
        }

        query_json["_source"] = serde_json::json!(false);

        if let Some(sort_json) = Self::sort_argument(ordering, schema) {
            query_json["sort"] = sort_json;
        }

        query_json
    }

    fn query_argument(query_text: &str) -> serde_json::Value {
        serde_json::json!({
            "query_string": {
                "query": query_text,
                "analyze_wildcard": true,
            }
        })
    }

    /// Undeclared fields are dropped rather than rejected
    fn sort_argument<R, S: AsRef<str>>(
        ordering: &[S],
        schema: &SearchSchema<R>,
    ) -> Option<serde_json::Value> {
        fn order(descending: bool) -> &'static str {
            if descending { "desc" } else { "asc" }
        }

        let parts = SortDirective::parse_all(ordering)
            .into_iter()
            .filter_map(|directive| match directive {
                SortDirective::Relevance { descending } => Some(serde_json::json!({
                    RELEVANCE_FIELD: { "order": order(descending) }
                })),
                SortDirective::Field { name, descending } => {
                    let Some(field) = schema.field_by_name(&name) else {
                        tracing::debug!(field = %name, "Dropping undeclared sort field");
                        return None;
                    };
                    Some(serde_json::json!({
                        field.sort_target(&name): { "order": order(descending) }
                    }))
                }
            })
            .collect::<Vec<_>>();

        if parts.is_empty() {
            None
        } else {
            Some(serde_json::Value::Array(parts))
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
