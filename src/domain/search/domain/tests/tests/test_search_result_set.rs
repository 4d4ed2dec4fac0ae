// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use docsearch::*;
use pretty_assertions::assert_eq;

use super::fixtures::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_no_ordering_sorts_by_descending_score() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(2));
    engine
        .expect_search()
        .withf(|endpoint, body, page| {
            endpoint.doc_type == "news_article"
                && body.get("sort").is_none()
                && body["_source"] == serde_json::json!(false)
                && *page == SearchPage { from: 0, size: 2 }
        })
        .times(1)
        .returning(|_, _, _| {
            Ok(SearchHits {
                total: 2,
                hits: vec![
                    SearchHit {
                        id: "2".to_string(),
                        score: Some(0.5),
                    },
                    SearchHit {
                        id: "1".to_string(),
                        score: Some(0.9),
                    },
                ],
            })
        });

    let mut lookup = MockRecordLookup::new();
    lookup
        .expect_find_by_ids()
        .withf(|ids, ordering, deferred| {
            ids == ["2".to_string(), "1".to_string()] && ordering.is_empty() && deferred.is_empty()
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![Article::new(2, "Dog", 1), Article::new(1, "Cat", 2)]));

    let results = result_set("cat", engine, lookup);
    assert!(!results.is_cached());

    let records = results.fill().await.unwrap();
    assert_eq!(ids(records), [1, 2]);
    assert_eq!(results.len().await.unwrap(), 2);
    assert_eq!(results.score_of("1"), Some(0.9));
    assert_eq!(results.score_of("3"), None);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_field_ordering_is_delegated_to_lookup() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(2));
    engine
        .expect_search()
        .withf(|_, body, _| body["sort"] == serde_json::json!([{ "rank": { "order": "asc" } }]))
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[1, 2], 2)));

    let mut lookup = MockRecordLookup::new();
    lookup
        .expect_find_by_ids()
        .withf(|_, ordering, _| {
            ordering
                == [RecordOrdering {
                    field: "rank".to_string(),
                    descending: false,
                }]
        })
        .times(1)
        .returning(|_, _, _| Ok(vec![Article::new(2, "Dog", 1), Article::new(1, "Cat", 2)]));

    let results = result_set("cat", engine, lookup).order_by(["rank"]);

    // Lookup order wins over the better score of article 1
    assert_eq!(ids(results.fill().await.unwrap()), [2, 1]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_relevance_in_ordering_sorts_by_score() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(3));
    engine
        .expect_search()
        .withf(|_, body, _| {
            body["sort"]
                == serde_json::json!([
                    { "rank": { "order": "desc" } },
                    { "_score": { "order": "desc" } },
                ])
        })
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[3, 1, 2], 3)));

    let mut lookup = MockRecordLookup::new();
    lookup_returning(&mut lookup, articles(3), 1);

    let results = result_set("cat", engine, lookup).order_by(["-rank", "_score"]);

    assert_eq!(ids(results.fill().await.unwrap()), [1, 2, 3]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_descending_text_ordering_uses_raw_subfield() {
    let results = result_set("cat", MockSearchEngine::new(), MockRecordLookup::new())
        .order_by(["-title"]);

    assert_eq!(
        results.build_query(false)["sort"],
        serde_json::json!([{ "title.raw": { "order": "desc" } }])
    );
    assert!(results.build_query(true).get("sort").is_none());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_undeclared_ordering_field_reaches_lookup_only() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(1));
    engine
        .expect_search()
        .withf(|_, body, _| body.get("sort").is_none())
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[1], 1)));

    let mut lookup = MockRecordLookup::new();
    lookup
        .expect_find_by_ids()
        .withf(|_, ordering, _| ordering.len() == 1 && ordering[0].field == "created_at")
        .times(1)
        .returning(|_, _, _| Ok(vec![Article::new(1, "Cat", 1)]));

    let results = result_set("cat", engine, lookup).order_by(["created_at"]);

    assert_eq!(ids(results.fill().await.unwrap()), [1]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_count_backend_error_is_surfaced() {
    let mut engine = MockSearchEngine::new();
    engine
        .expect_count()
        .withf(|_, body| body.get("sort").is_none() && body.get("_source").is_none())
        .times(1)
        .returning(|_, _| {
            Err(BackendError {
                status: Some(404),
                message: "index_not_found".to_string(),
            }
            .into())
        });

    let results = result_set("cat", engine, MockRecordLookup::new());

    let err = results.len().await.unwrap_err();
    assert!(
        matches!(&err, SearchError::Backend(e) if e.status == Some(404)),
        "{err:?}"
    );
    assert!(err.to_string().contains("index_not_found"), "{err}");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_negative_index_fails_without_network() {
    // No expectations: any engine or lookup call would panic
    let results = result_set("cat", MockSearchEngine::new(), MockRecordLookup::new());

    let err = results.get(-1).await.unwrap_err();
    assert!(matches!(err, SearchError::InvalidArgument(_)), "{err:?}");
    assert_eq!(err.to_string(), "Negative indexing is not supported");

    assert!(!results.is_cached());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_index_past_total_is_out_of_range() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(2));
    engine
        .expect_search()
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[1, 2], 2)));

    let mut lookup = MockRecordLookup::new();
    lookup_returning(&mut lookup, articles(2), 1);

    let results = result_set("cat", engine, lookup);

    assert_eq!(results.get(1).await.unwrap().id, 2);

    let err = results.get(2).await.unwrap_err();
    assert!(
        matches!(err, SearchError::OutOfRange(OutOfRangeError { index: 2, len: 2 })),
        "{err:?}"
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_reiteration_reuses_cache() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(3));
    engine
        .expect_search()
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[1, 2, 3], 3)));

    let mut lookup = MockRecordLookup::new();
    lookup_returning(&mut lookup, articles(3), 1);

    let results = result_set("cat", engine, lookup);

    let first = results.iter().await.unwrap().cloned().collect::<Vec<_>>();
    let second = results.iter().await.unwrap().cloned().collect::<Vec<_>>();

    assert_eq!(ids(&first), [1, 2, 3]);
    assert_eq!(first, second);
    assert_eq!(results.to_vec().await.unwrap(), first);
    assert!(results.is_cached());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_empty_count_skips_search() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(0));

    let results = result_set("nothing", engine, MockRecordLookup::new());

    assert!(results.is_empty().await.unwrap());
    assert_eq!(results.iter().await.unwrap().count(), 0);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_chaining_leaves_receiver_untouched() {
    let results = result_set("cat", MockSearchEngine::new(), MockRecordLookup::new());

    let ordered = results.order_by(["-rank"]);
    let reordered = ordered.order_by(["title"]);

    assert!(results.ordering().is_empty());
    assert_eq!(ordered.ordering(), ["-rank"]);
    assert_eq!(reordered.ordering(), ["title"]);
    assert_eq!(reordered.query(), "cat");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_deferred_fields_are_forwarded() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(1));
    engine
        .expect_search()
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[1], 1)));

    let mut lookup = MockRecordLookup::new();
    lookup
        .expect_find_by_ids()
        .withf(|_, _, deferred| deferred == ["body".to_string(), "summary".to_string()])
        .times(1)
        .returning(|_, _, _| Ok(vec![Article::new(1, "Cat", 1)]));

    let results = result_set("cat", engine, lookup)
        .defer(["body"])
        .defer(["summary"]);

    assert_eq!(results.len().await.unwrap(), 1);
    assert_eq!(ids(results.fill().await.unwrap()), [1]);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_debug_never_materializes() {
    let mut engine = MockSearchEngine::new();
    engine.expect_count().times(1).returning(|_, _| Ok(2));
    engine
        .expect_search()
        .times(1)
        .returning(|_, _, _| Ok(hits_for(&[1, 2], 2)));

    let mut lookup = MockRecordLookup::new();
    lookup_returning(&mut lookup, articles(2), 1);

    let results = result_set("cat", engine, lookup);
    assert_eq!(format!("{results:?}"), "<ArticleSearchResultSet: [uncached]>");

    results.fill().await.unwrap();
    assert_eq!(format!("{results:?}"), "<ArticleSearchResultSet: 2 record(s)>");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
