// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use url::Url;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const TITLE_FIELD: &str = "title";
pub const TITLE_FIELD_BOOST: f64 = 4.0;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Coordinates of one record type inside the search engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEndpoint {
    pub host: Url,
    pub index_name: String,
    pub doc_type: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Searchable attributes of one record type, in declaration order
pub struct SearchSchema<R> {
    type_name: String,
    fields: Vec<(String, FieldDescriptor<R>)>,
    endpoint: SearchEndpoint,
    listing: RecordListing,
}

impl<R> SearchSchema<R> {
    pub fn builder(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> SearchSchemaBuilder<R> {
        SearchSchemaBuilder {
            namespace: namespace.into(),
            type_name: type_name.into(),
            fields: Vec::new(),
            listing: RecordListing::All,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor<R>)> {
        self.fields
            .iter()
            .map(|(name, field)| (name.as_str(), field))
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    pub fn endpoint(&self) -> &SearchEndpoint {
        &self.endpoint
    }

    pub fn doc_type(&self) -> &str {
        &self.endpoint.doc_type
    }

    pub fn listing(&self) -> RecordListing {
        self.listing
    }

    /// Mapping document of this record type, keyed by its document type
    pub fn mapping(&self) -> serde_json::Value {
        let properties = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.index_fragment()))
            .collect::<serde_json::Map<_, _>>();

        serde_json::json!({
            self.endpoint.doc_type.as_str(): {
                "_all": { "analyzer": SEARCH_ANALYZER },
                "properties": properties,
            }
        })
    }
}

impl<R: SearchRecord> SearchSchema<R> {
    pub fn document(&self, record: &R) -> SearchDocument {
        let mut document = SearchDocument::new();
        for (name, field) in &self.fields {
            let value = field.extract_value(name, record);
            document.extend(field.document_value(name, value));
        }
        document
    }
}

impl<R> std::fmt::Debug for SearchSchema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("endpoint", &self.endpoint)
            .field("listing", &self.listing)
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SearchSchemaBuilder<R> {
    namespace: String,
    type_name: String,
    fields: Vec<(String, FieldDescriptor<R>)>,
    listing: RecordListing,
}

impl<R> SearchSchemaBuilder<R> {
    pub fn field(mut self, name: impl Into<String>, field: FieldDescriptor<R>) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Boosted text field holding the record's title
    pub fn title_field(self) -> Self {
        self.field(
            TITLE_FIELD,
            FieldDescriptor::text().with_boost(TITLE_FIELD_BOOST),
        )
    }

    pub fn listing(mut self, listing: RecordListing) -> Self {
        self.listing = listing;
        self
    }

    pub fn build(
        self,
        config: &SearchTargetConfig,
    ) -> Result<SearchSchema<R>, SchemaDeclarationError> {
        if self.namespace.trim().is_empty() {
            return Err(SchemaDeclarationError::EmptyRecordType { part: "namespace" });
        }
        if self.type_name.trim().is_empty() {
            return Err(SchemaDeclarationError::EmptyRecordType { part: "type name" });
        }

        let mut seen = std::collections::HashSet::new();
        for (name, _) in &self.fields {
            if !seen.insert(name.as_str()) {
                return Err(SchemaDeclarationError::DuplicateField {
                    field_name: name.clone(),
                });
            }
        }

        let doc_type = format!("{}_{}", self.namespace, self.type_name).to_lowercase();

        Ok(SearchSchema {
            type_name: self.type_name,
            fields: self.fields,
            endpoint: SearchEndpoint {
                host: config.url.clone(),
                index_name: config.index_name.clone(),
                doc_type,
            },
            listing: self.listing,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
