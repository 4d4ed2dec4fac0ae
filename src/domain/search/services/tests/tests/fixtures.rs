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

#[derive(Debug, Clone)]
pub(crate) struct Article {
    pub(crate) id: u64,
    pub(crate) title: &'static str,
}

impl SearchRecord for Article {
    fn record_id(&self) -> RecordId {
        self.id.to_string()
    }

    fn field_value(&self, field_name: &str) -> serde_json::Value {
        match field_name {
            "title" => self.title.into(),
            _ => serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Comment {
    pub(crate) id: u64,
    pub(crate) text: &'static str,
    pub(crate) published: bool,
}

impl SearchRecord for Comment {
    fn record_id(&self) -> RecordId {
        format!("c{}", self.id)
    }

    fn field_value(&self, field_name: &str) -> serde_json::Value {
        match field_name {
            "text" => self.text.into(),
            _ => serde_json::Value::Null,
        }
    }

    fn is_published(&self) -> bool {
        self.published
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn article_schema(config: &SearchTargetConfig) -> Arc<SearchSchema<Article>> {
    Arc::new(
        SearchSchema::builder("news", "article")
            .title_field()
            .build(config)
            .unwrap(),
    )
}

pub(crate) fn comment_schema(
    namespace: &str,
    config: &SearchTargetConfig,
) -> Arc<SearchSchema<Comment>> {
    Arc::new(
        SearchSchema::builder(namespace, "comment")
            .field("text", FieldDescriptor::text())
            .listing(RecordListing::PublishedOnly)
            .build(config)
            .unwrap(),
    )
}

pub(crate) fn binding_of<R: SearchRecord + Clone + 'static>(
    schema: Arc<SearchSchema<R>>,
    records: Vec<R>,
) -> Arc<dyn SearchIndexBinding> {
    let mut source = MockRecordSource::<R>::new();
    source
        .expect_list_records()
        .returning(move |_| Ok(records.clone()));

    SchemaIndexBinding::new(schema, Arc::new(source)).into_dyn()
}

/// Binding whose source must never be asked for records
pub(crate) fn idle_binding_of<R: SearchRecord + 'static>(
    schema: Arc<SearchSchema<R>>,
) -> Arc<dyn SearchIndexBinding> {
    SchemaIndexBinding::new(schema, Arc::new(MockRecordSource::<R>::new())).into_dyn()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
