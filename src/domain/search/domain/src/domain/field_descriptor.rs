// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::{SearchDocument, SearchRecord};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Analyzer every declared field is bound to. Defined by the index analysis
/// settings, see [`crate::SearchAnalysisConfig`].
pub const SEARCH_ANALYZER: &str = "docsearch_analyzer";

/// Exact-match sub-field of text fields, used for sorting only
pub const FIELD_SUFFIX_RAW: &str = "raw";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFieldType {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Null,
    Text,
}

impl SearchFieldType {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Text => "text",
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type FieldValueTransform<R> = Arc<dyn Fn(&R) -> serde_json::Value + Send + Sync>;

/// Describes one searchable attribute of a record type `R`
pub struct FieldDescriptor<R> {
    field_type: SearchFieldType,
    options: serde_json::Map<String, serde_json::Value>,
    transform: Option<FieldValueTransform<R>>,
}

impl<R> FieldDescriptor<R> {
    pub fn new(field_type: SearchFieldType) -> Self {
        Self {
            field_type,
            options: serde_json::Map::new(),
            transform: None,
        }
    }

    pub fn integer() -> Self {
        Self::new(SearchFieldType::Integer)
    }

    pub fn long() -> Self {
        Self::new(SearchFieldType::Long)
    }

    pub fn float() -> Self {
        Self::new(SearchFieldType::Float)
    }

    pub fn double() -> Self {
        Self::new(SearchFieldType::Double)
    }

    pub fn boolean() -> Self {
        Self::new(SearchFieldType::Boolean)
    }

    pub fn null() -> Self {
        Self::new(SearchFieldType::Null)
    }

    pub fn text() -> Self {
        Self::new(SearchFieldType::Text)
    }

    /// Merges an extra option into the index-time fragment
    pub fn with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_boost(self, boost: f64) -> Self {
        self.with_option("boost", boost)
    }

    /// Replaces the record's own attribute value with a computed one
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&R) -> serde_json::Value + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn field_type(&self) -> SearchFieldType {
        self.field_type
    }

    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    pub fn index_fragment(&self) -> serde_json::Value {
        let mut fragment = serde_json::Map::new();
        fragment.insert("type".to_string(), self.field_type.wire_name().into());
        fragment.insert("analyzer".to_string(), SEARCH_ANALYZER.into());
        fragment.extend(self.options.clone());

        if self.field_type == SearchFieldType::Text {
            fragment.insert(
                "fields".to_string(),
                serde_json::json!({
                    FIELD_SUFFIX_RAW: {
                        "type": "keyword",
                    }
                }),
            );
        }

        serde_json::Value::Object(fragment)
    }

    /// Both the query-time and the sort-time representation of one value
    pub fn document_value(&self, name: &str, value: serde_json::Value) -> SearchDocument {
        let mut document = SearchDocument::new();
        if self.field_type == SearchFieldType::Text {
            document.insert(self.sort_target(name), value.clone());
        }
        document.insert(name.to_string(), value);
        document
    }

    pub fn sort_target(&self, name: &str) -> String {
        match self.field_type {
            SearchFieldType::Text => format!("{name}.{FIELD_SUFFIX_RAW}"),
            _ => name.to_string(),
        }
    }
}

impl<R: SearchRecord> FieldDescriptor<R> {
    pub fn extract_value(&self, name: &str, record: &R) -> serde_json::Value {
        match &self.transform {
            Some(transform) => transform(record),
            None => record.field_value(name),
        }
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            field_type: self.field_type,
            options: self.options.clone(),
            transform: self.transform.clone(),
        }
    }
}

impl<R> std::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("field_type", &self.field_type)
            .field("options", &self.options)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
