// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    NotAcknowledged(#[from] NotAcknowledgedError),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgumentError),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// The search engine answered with an error status
#[derive(Debug, Error)]
#[error("Search backend error: {message}")]
pub struct BackendError {
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOperation {
    Create,
    Delete,
}

impl std::fmt::Display for IndexOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "creation"),
            Self::Delete => write!(f, "deletion"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Index '{index_name}' {operation} was not acknowledged: {message}")]
pub struct NotAcknowledgedError {
    pub index_name: String,
    pub operation: IndexOperation,
    pub message: String,
}

#[derive(Debug, Error)]
#[error("{reason}")]
pub struct InvalidArgumentError {
    pub reason: String,
}

impl InvalidArgumentError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn negative_index() -> Self {
        Self::new("Negative indexing is not supported")
    }
}

#[derive(Debug, Error)]
#[error("Index {index} is out of range for {len} result(s)")]
pub struct OutOfRangeError {
    pub index: usize,
    pub len: usize,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum SchemaDeclarationError {
    #[error("Field '{field_name}' is declared more than once")]
    DuplicateField { field_name: String },

    #[error("Record type is missing a {part}")]
    EmptyRecordType { part: &'static str },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
