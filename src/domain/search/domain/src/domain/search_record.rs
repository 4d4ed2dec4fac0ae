// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub type RecordId = String;

/// Document as stored in the search index: field name to value
pub type SearchDocument = serde_json::Map<String, serde_json::Value>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A system-of-record entity that can be indexed and resolved back from
/// search hits
pub trait SearchRecord: Send + Sync {
    fn record_id(&self) -> RecordId;

    /// Value of the named attribute, as it should be stored in the index
    fn field_value(&self, field_name: &str) -> serde_json::Value;

    /// Consulted only by schemas with [`RecordListing::PublishedOnly`]
    fn is_published(&self) -> bool {
        true
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Which records of a type are eligible for indexing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecordListing {
    #[default]
    All,
    PublishedOnly,
}

impl RecordListing {
    pub fn admits<R: SearchRecord>(self, record: &R) -> bool {
        match self {
            Self::All => true,
            Self::PublishedOnly => record.is_published(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ordering request forwarded to the record lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOrdering {
    pub field: String,
    pub descending: bool,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
