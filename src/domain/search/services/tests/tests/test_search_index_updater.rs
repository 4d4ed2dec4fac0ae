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
use docsearch_services::*;
use pretty_assertions::assert_eq;

use super::fixtures::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn comment(id: u64, published: bool) -> Comment {
    Comment {
        id,
        text: "Meow",
        published,
    }
}

fn updater(engine: MockSearchEngine) -> SearchIndexUpdater<Comment> {
    SearchIndexUpdater::new(
        comment_schema("forum", &SearchTargetConfig::default()),
        Arc::new(engine),
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_put_one_sends_full_document() {
    let mut engine = MockSearchEngine::new();
    engine
        .expect_put_document()
        .withf(|endpoint, id, document| {
            endpoint.doc_type == "forum_comment"
                && id == "c3"
                && serde_json::Value::Object(document.clone())
                    == serde_json::json!({ "text": "Meow", "text.raw": "Meow" })
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    updater(engine).put_one(&comment(3, true)).await.unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_saved_published_record_is_indexed() {
    let mut engine = MockSearchEngine::new();
    engine
        .expect_put_document()
        .times(1)
        .returning(|_, _, _| Ok(()));
    engine.expect_document_exists().never();

    let outcome = updater(engine)
        .on_record_saved(&comment(1, true))
        .await
        .unwrap();

    assert_eq!(outcome, IndexUpdateOutcome::Indexed);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_saved_unpublished_record_is_removed_when_indexed() {
    let mut engine = MockSearchEngine::new();
    engine.expect_put_document().never();
    engine
        .expect_document_exists()
        .withf(|_, id| id == "c1")
        .times(1)
        .returning(|_, _| Ok(true));
    engine
        .expect_delete_document()
        .withf(|_, id| id == "c1")
        .times(1)
        .returning(|_, _| Ok(()));

    let outcome = updater(engine)
        .on_record_saved(&comment(1, false))
        .await
        .unwrap();

    assert_eq!(outcome, IndexUpdateOutcome::Removed);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_saved_unpublished_record_is_left_alone_when_absent() {
    let mut engine = MockSearchEngine::new();
    engine
        .expect_document_exists()
        .times(1)
        .returning(|_, _| Ok(false));
    engine.expect_delete_document().never();

    let outcome = updater(engine)
        .on_record_saved(&comment(1, false))
        .await
        .unwrap();

    assert_eq!(outcome, IndexUpdateOutcome::Unchanged);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_deleted_record_is_removed() {
    let mut engine = MockSearchEngine::new();
    engine
        .expect_delete_document()
        .withf(|endpoint, id| endpoint.index_name == "docsearch" && id == "c9")
        .times(1)
        .returning(|_, _| Ok(()));

    updater(engine)
        .on_record_deleted(&comment(9, true))
        .await
        .unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_put_failure_is_surfaced() {
    let mut engine = MockSearchEngine::new();
    engine.expect_put_document().times(1).returning(|_, _, _| {
        Err(BackendError {
            status: Some(400),
            message: "mapper_parsing_exception".to_string(),
        }
        .into())
    });

    let err = updater(engine)
        .on_record_saved(&comment(1, true))
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Backend(_)), "{err:?}");
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
